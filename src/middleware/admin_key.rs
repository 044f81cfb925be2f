//! `x-admin-key` shared-secret guard for the admin surface.
//!
//! The admin panel has no user session; every request carries the key.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, admin_key_middleware))
}

async fn admin_key_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let presented = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(key) if key.as_bytes() == state.admin_key.as_bytes() => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "admin key mismatch");
            Err(AppError::Unauthorized)
        }
        None => {
            tracing::warn!(path = %req.uri().path(), "admin key missing");
            Err(AppError::Unauthorized)
        }
    }
}
