//! Bearer access token (HS256 JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を検証して `sub` (user id) を取り出す
//! - トークンが有効でもユーザーが削除済みなら 401
//! - user_type / role はトークンではなく DB の現在値を使う (変更が即反映される)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let user_id = match state.tokens.verify(token) {
        Ok(user_id) => user_id,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    let Some(user) = state.users.find_by_id(user_id).await? else {
        tracing::warn!(user_id, "access token for unknown user");
        return Err(AppError::Unauthorized);
    };

    let ctx = AuthCtx::new(user.id, user.user_type, user.role);
    tracing::debug!(user_id = ctx.user_id, user_type = %ctx.user_type, role = %ctx.role, "authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
