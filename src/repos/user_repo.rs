/*
 * Responsibility
 * - UserRepository (use-case が依存する保存先の契約)
 * - users テーブル向け SQLx 実装 (PgUserRepository)
 * - DB の文字列 enum はここでドメイン型に戻す
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::domain::{NewUser, User, UserChanges, UserFilter, UserRole, UserType};
use crate::repos::error::{RepoError, RepoResult};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> RepoResult<User>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;
    async fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Ordered by name, case-insensitive.
    async fn find_all(&self, filter: &UserFilter) -> RepoResult<Vec<User>>;
    /// `None` when no row has this id.
    async fn update(&self, id: i64, changes: UserChanges) -> RepoResult<Option<User>>;
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    cpf: String,
    user_type: String,
    email: String,
    phone: String,
    address: Option<String>,
    password_hash: String,
    role: String,
    crmv: Option<String>,
    clinic_address: Option<String>,
    professional_id_doc_path: Option<String>,
    diploma_doc_path: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user_type = row
            .user_type
            .parse::<UserType>()
            .map_err(|e| RepoError::CorruptRow(format!("users.user_type (id {}): {e}", row.id)))?;
        let role = row
            .role
            .parse::<UserRole>()
            .map_err(|e| RepoError::CorruptRow(format!("users.role (id {}): {e}", row.id)))?;

        Ok(User {
            id: row.id,
            name: row.name,
            cpf: row.cpf,
            user_type,
            email: row.email,
            phone: row.phone,
            address: row.address,
            password_hash: row.password_hash,
            role,
            crmv: row.crmv,
            clinic_address: row.clinic_address,
            professional_id_doc_path: row.professional_id_doc_path,
            diploma_doc_path: row.diploma_doc_path,
            created_at: row.created_at,
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> RepoResult<Vec<User>> {
    rows.into_iter().map(User::try_from).collect()
}

const USER_COLUMNS: &str = r#"
    id, name, cpf, user_type, email, phone, address, password_hash, role,
    crmv, clinic_address, professional_id_doc_path, diploma_doc_path, created_at
"#;

#[derive(Clone, Debug)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one_by(&self, column: &str, value: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (
                name, cpf, user_type, email, phone, address, password_hash, role,
                crmv, clinic_address, professional_id_doc_path, diploma_doc_path
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.name)
            .bind(&user.cpf)
            .bind(user.user_type.as_str())
            .bind(&user.email)
            .bind(&user.phone)
            .bind(user.address.as_deref())
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.crmv.as_deref())
            .bind(user.clinic_address.as_deref())
            .bind(user.professional_id_doc_path.as_deref())
            .bind(user.diploma_doc_path.as_deref())
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<User>> {
        self.find_one_by("cpf", cpf).await
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_one_by("email", email).await
    }

    async fn find_all(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        // $1: type (NULL = any), $2: "%q%" (NULL = any)
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::text IS NULL OR user_type = $1)
              AND ($2::text IS NULL OR name ILIKE $2 ESCAPE '\' OR cpf ILIKE $2 ESCAPE '\')
            ORDER BY LOWER(name) ASC, id ASC
            "#
        );
        let like = filter.q.as_deref().map(super::contains_pattern);
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(filter.user_type.map(|t| t.as_str()))
            .bind(like)
            .fetch_all(&self.pool)
            .await?;

        into_users(rows)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> RepoResult<Option<User>> {
        // Nullable columns take a (flag, value) pair:
        // - flag false     -> keep column
        // - flag true, NULL -> set NULL
        // - flag true, v    -> set v
        let sql = format!(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                cpf = COALESCE($3, cpf),
                user_type = COALESCE($4, user_type),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                address = CASE WHEN $7::boolean THEN $8::text ELSE address END,
                password_hash = COALESCE($9, password_hash),
                role = COALESCE($10, role),
                crmv = CASE WHEN $11::boolean THEN $12::text ELSE crmv END,
                clinic_address = CASE WHEN $13::boolean THEN $14::text ELSE clinic_address END,
                professional_id_doc_path = CASE WHEN $15::boolean THEN $16::text ELSE professional_id_doc_path END,
                diploma_doc_path = CASE WHEN $17::boolean THEN $18::text ELSE diploma_doc_path END
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let address = changes.address.into_option();
        let crmv = changes.crmv.into_option();
        let clinic_address = changes.clinic_address.into_option();
        let professional_id_doc_path = changes.professional_id_doc_path.into_option();
        let diploma_doc_path = changes.diploma_doc_path.into_option();

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.cpf)
            .bind(changes.user_type.map(|t| t.as_str()))
            .bind(changes.email)
            .bind(changes.phone)
            .bind(address.is_some())
            .bind(address.flatten())
            .bind(changes.password_hash)
            .bind(changes.role.map(|r| r.as_str()))
            .bind(crmv.is_some())
            .bind(crmv.flatten())
            .bind(clinic_address.is_some())
            .bind(clinic_address.flatten())
            .bind(professional_id_doc_path.is_some())
            .bind(professional_id_doc_path.flatten())
            .bind(diploma_doc_path.is_some())
            .bind(diploma_doc_path.flatten())
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
