/*
 * Responsibility
 * - POST /auth/login (e-mail + password → HS256 access token)
 * - 失敗理由 (ユーザー不在 / パスワード不一致) はレスポンスで区別しない
 */
use axum::{Json, extract::State};

use crate::api::v1::dto::auth::{LoginRequest, LoginResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Unauthorized);
    }

    let Some(user) = state.users.find_by_email(email).await? else {
        tracing::warn!("login failed: unknown e-mail");
        return Err(AppError::Unauthorized);
    };

    if !state.hasher.verify(&req.password, &user.password_hash) {
        tracing::warn!(user_id = user.id, "login failed: wrong password");
        return Err(AppError::Unauthorized);
    }

    let access_token = state.tokens.issue(user.id).map_err(|e| {
        tracing::error!(error = %e, "failed to issue access token");
        AppError::Internal
    })?;

    tracing::info!(user_id = user.id, "login succeeded");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.tokens.ttl_seconds(),
        user: user.into(),
    }))
}
