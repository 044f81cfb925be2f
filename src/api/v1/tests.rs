//! Router-level tests: the full middleware stack over in-memory state.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::app::build_router;
use crate::config::Config;
use crate::domain::{User, UserRole, UserType};
use crate::repos::memory::{InMemoryPetRepository, InMemoryUserRepository};
use crate::repos::PetRepository;
use crate::services::auth::TokenService;
use crate::services::password::fake::PlainHasher;
use crate::services::uploads::UploadStore;
use crate::state::AppState;

const ADMIN_KEY: &str = "test-admin-key";
const PASSWORD: &str = "Senha@123A";

struct Harness {
    app: Router,
    users: Arc<InMemoryUserRepository>,
    pets: Arc<InMemoryPetRepository>,
    tokens: Arc<TokenService>,
    uploads: TempDir,
}

impl Harness {
    fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let users = Arc::new(InMemoryUserRepository::new());
        let pets = Arc::new(InMemoryPetRepository::new());
        let tokens = Arc::new(TokenService::new("test-secret", 3600));

        let state = AppState::new(
            users.clone(),
            pets.clone(),
            Arc::new(PlainHasher),
            tokens.clone(),
            UploadStore::new(uploads.path()),
            ADMIN_KEY,
        );
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://unused".to_string()),
            _ => None,
        })
        .unwrap();

        Self {
            app: build_router(state, &config),
            users,
            pets,
            tokens,
            uploads,
        }
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn seed_user(&self, id: i64, user_type: UserType) -> User {
        let user = User {
            id,
            name: format!("Usuário {id}"),
            cpf: format!("000.000.000-{id:02}"),
            user_type,
            email: format!("user{id}@meupet.com"),
            phone: "(11) 98765-4321".into(),
            address: None,
            password_hash: format!("hashed:{PASSWORD}"),
            role: UserRole::User,
            crmv: None,
            clinic_address: None,
            professional_id_doc_path: None,
            diploma_doc_path: None,
            created_at: Utc::now(),
        };
        self.users.insert_raw(user.clone()).await;
        user
    }

    fn bearer(&self, user_id: i64) -> String {
        format!("Bearer {}", self.tokens.issue(user_id).unwrap())
    }
}

fn admin(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-admin-key", ADMIN_KEY);
    with_json(builder, body)
}

fn authed(method: &str, uri: &str, bearer: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer);
    with_json(builder, body)
}

fn with_json(builder: axum::http::request::Builder, body: Option<Value>) -> Request<Body> {
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn multipart(uri: &str, auth: (&str, &str), file_name: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "meupet-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(auth.0, auth.1)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn tutor_body() -> Value {
    json!({
        "name": "Maria Souza",
        "cpf": "123.456.789-09",
        "type": "Tutor",
        "email": "maria@meupet.com",
        "phone": "(11) 98765-4321",
        "password": PASSWORD
    })
}

#[tokio::test]
async fn health_is_public_and_carries_common_headers() {
    let h = Harness::new();

    let res = h
        .app
        .clone()
        .oneshot(
            Request::get("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn admin_routes_require_the_key() {
    let h = Harness::new();

    let missing = Request::get("/api/v1/admin/users")
        .body(Body::empty())
        .unwrap();
    let (status, body) = h.send(missing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let wrong = Request::get("/api/v1/admin/users")
        .header("x-admin-key", "nope")
        .body(Body::empty())
        .unwrap();
    let (status, _) = h.send(wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_creates_and_lists_users_without_hashes() {
    let h = Harness::new();

    let (status, created) = h
        .send(admin("POST", "/api/v1/admin/users", Some(tutor_body())))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "Tutor");
    assert_eq!(created["role"], "user");
    assert!(created.get("passwordHash").is_none());
    assert!(created.get("password_hash").is_none());

    let (status, list) = h
        .send(admin("GET", "/api/v1/admin/users?type=Tutor&q=maria", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, list) = h
        .send(admin("GET", "/api/v1/admin/users?type=Veterin%C3%A1rio", None))
        .await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn admin_user_list_is_sorted_by_name_ignoring_case() {
    let h = Harness::new();
    for (id, name) in [(1, "bruno"), (2, "Ana"), (3, "carla")] {
        let mut user = h.seed_user(id, UserType::Tutor).await;
        user.name = name.into();
        h.users.insert_raw(user).await;
    }

    let (status, list) = h.send(admin("GET", "/api/v1/admin/users", None)).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ana", "bruno", "carla"]);
}

#[tokio::test]
async fn vet_without_documents_reports_every_missing_field() {
    let h = Harness::new();
    let mut body = tutor_body();
    body["type"] = json!("Veterinário");

    let (status, res) = h
        .send(admin("POST", "/api/v1/admin/users", Some(body)))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = &res["error"]["fields"];
    assert!(fields.get("crmv").is_some());
    assert!(fields.get("professionalIdDoc").is_some());
    assert!(fields.get("diplomaDoc").is_some());
    assert_eq!(h.users.len().await, 0);
}

#[tokio::test]
async fn admin_update_handles_missing_user_and_explicit_null() {
    let h = Harness::new();
    let mut body = tutor_body();
    body["address"] = json!("Rua das Flores, 10");
    let (_, created) = h
        .send(admin("POST", "/api/v1/admin/users", Some(body)))
        .await;
    assert_eq!(created["address"], "Rua das Flores, 10");
    let id = created["id"].as_i64().unwrap();

    let (status, _) = h
        .send(admin(
            "PUT",
            "/api/v1/admin/users/999",
            Some(json!({"name": "Outro Nome"})),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = h
        .send(admin(
            "PUT",
            &format!("/api/v1/admin/users/{id}"),
            Some(json!({"address": null, "phone": "(21) 91234-5678"})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["address"], Value::Null);
    assert_eq!(updated["phone"], "(21) 91234-5678");
    assert_eq!(updated["email"], "maria@meupet.com");
}

#[tokio::test]
async fn admin_delete_removes_documents() {
    let h = Harness::new();

    let (status, upload) = h
        .send(multipart(
            "/api/v1/admin/uploads",
            ("x-admin-key", ADMIN_KEY),
            "diploma.pdf",
            b"%PDF-1.4",
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let diploma = upload["path"].as_str().unwrap().to_string();
    let file_name = diploma.trim_start_matches("/uploads/").to_string();
    assert!(file_name.ends_with(".pdf"));
    assert!(h.uploads.path().join(&file_name).exists());

    let mut vet = h.seed_user(1, UserType::Veterinario).await;
    vet.crmv = Some("SP-12345".into());
    vet.professional_id_doc_path = Some("/uploads/missing.pdf".into());
    vet.diploma_doc_path = Some(diploma);
    h.users.insert_raw(vet).await;

    let (status, _) = h.send(admin("DELETE", "/api/v1/admin/users/1", None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!h.uploads.path().join(&file_name).exists());
    assert_eq!(h.users.len().await, 0);

    let (status, _) = h.send(admin("DELETE", "/api/v1/admin/users/1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_issues_a_token_for_valid_credentials() {
    let h = Harness::new();
    h.seed_user(3, UserType::Tutor).await;

    let req = Request::post("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "user3@meupet.com", "password": PASSWORD}).to_string(),
        ))
        .unwrap();
    let (status, body) = h.send(req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["id"], 3);
    let token = body["accessToken"].as_str().unwrap();
    assert_eq!(h.tokens.verify(token).unwrap(), 3);

    let req = Request::post("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "user3@meupet.com", "password": "Errada@123"}).to_string(),
        ))
        .unwrap();
    let (status, _) = h.send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn pets_require_a_valid_token_of_a_tutor() {
    let h = Harness::new();
    h.seed_user(1, UserType::Veterinario).await;

    let (status, _) = h
        .send(Request::get("/api/v1/pets").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = h
        .send(authed("GET", "/api/v1/pets", "Bearer not-a-jwt", None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // token for a user that no longer exists
    let ghost = h.bearer(42);
    let (status, _) = h.send(authed("GET", "/api/v1/pets", &ghost, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let vet = h.bearer(1);
    let (status, body) = h.send(authed("GET", "/api/v1/pets", &vet, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn tutor_manages_only_their_own_pets() {
    let h = Harness::new();
    h.seed_user(1, UserType::Tutor).await;
    h.seed_user(2, UserType::Tutor).await;
    let owner = h.bearer(1);
    let other = h.bearer(2);

    let (status, pet) = h
        .send(authed(
            "POST",
            "/api/v1/pets",
            &owner,
            Some(json!({"name": "Rex", "species": "Cachorro", "ownerId": 2, "sex": "Macho"})),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pet["ownerId"], 1);
    let pet_id = pet["id"].as_i64().unwrap();

    let (status, list) = h
        .send(authed("GET", "/api/v1/pets?name=rex", &owner, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, list) = h.send(authed("GET", "/api/v1/pets", &other, None)).await;
    assert!(list.as_array().unwrap().is_empty());

    let uri = format!("/api/v1/pets/{pet_id}");
    let (status, _) = h
        .send(authed("PUT", &uri, &other, Some(json!({"name": "Roubado"}))))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = h.send(authed("DELETE", &uri, &other, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = h
        .send(authed(
            "PUT",
            &uri,
            &owner,
            Some(json!({"breed": "Labrador", "sex": null})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["breed"], "Labrador");
    assert_eq!(updated["sex"], Value::Null);
    assert_eq!(updated["name"], "Rex");

    let (status, _) = h.send(authed("DELETE", &uri, &owner, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(h.pets.find_by_id(pet_id).await.unwrap(), None);
}

#[tokio::test]
async fn invalid_pet_reports_fields() {
    let h = Harness::new();
    h.seed_user(1, UserType::Tutor).await;
    let owner = h.bearer(1);

    let (status, body) = h
        .send(authed(
            "POST",
            "/api/v1/pets",
            &owner,
            Some(json!({"name": "Rex", "species": "Pássaro"})),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"], json!({"species": "Espécie inválida"}));
    assert_eq!(h.pets.len().await, 0);
}

#[tokio::test]
async fn tutor_uploads_a_photo() {
    let h = Harness::new();
    h.seed_user(1, UserType::Tutor).await;
    let owner = h.bearer(1);

    let (status, body) = h
        .send(multipart(
            "/api/v1/pets/photos",
            (header::AUTHORIZATION.as_str(), owner.as_str()),
            "rex.PNG",
            b"\x89PNG",
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let path = body["path"].as_str().unwrap();
    assert!(path.starts_with("/uploads/pet-"));
    assert!(path.ends_with(".png"));

    let stored = h.uploads.path().join(path.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(stored).unwrap(), b"\x89PNG");
}
