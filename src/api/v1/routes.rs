/*
 * Responsibility
 * - v1 の URL 構造を定義
 *   - /health, /auth/login は認証なし
 *   - /admin 以下は x-admin-key
 *   - /pets 以下は Bearer (Tutor のみ、判定は handler)
 * - guard は route group ごとに layer で掛ける
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::api::v1::handlers::{
    admin_users::{create_user, delete_user, get_user, list_users, update_user},
    auth::login,
    health::health,
    pets::{create_pet, delete_pet, list_pets, update_pet, upload_photo},
    uploads::upload_document,
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/uploads", post(upload_document));
    let admin = middleware::admin_key::apply(admin, state.clone());

    let pets = Router::new()
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/photos", post(upload_photo))
        .route("/pets/{pet_id}", put(update_pet).delete(delete_pet));
    let pets = middleware::auth::access::apply(pets, state);

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .nest("/admin", admin)
        .merge(pets)
}
