/*
 * Responsibility
 * - /admin/users 系 CRUD handler (x-admin-key は middleware で検証済み)
 * - 作成 / 更新は use-case に委譲、取得 / 一覧 / 削除は repository を直接使う
 * - response から password_hash を落とすのは UserResponse の責務
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::v1::dto::users::{
    CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserResponse,
};
use crate::domain::{UserFilter, UserType};
use crate::error::AppError;
use crate::state::AppState;
use crate::usecases::{CreateUser, UpdateUser};
use crate::validation::trim_or_none;

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    // unknown type values are ignored rather than rejected
    let filter = UserFilter {
        user_type: query
            .user_type
            .as_deref()
            .and_then(|t| t.parse::<UserType>().ok()),
        q: query.q.as_deref().and_then(trim_or_none),
    };

    let users = state.users.find_all(&filter).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = CreateUser::new(state.users.clone(), state.hasher.clone())
        .execute(req.into_input())
        .await
        .map_err(|e| AppError::from_usecase(e, "user"))?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UpdateUser::new(state.users.clone(), state.hasher.clone())
        .execute(req.into_input(user_id))
        .await
        .map_err(|e| AppError::from_usecase(e, "user"))?;

    Ok(Json(user.into()))
}

/// Removes the user's documents (best-effort) and then the row. Pets are
/// left in place.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    for path in user.document_paths() {
        state.uploads.remove(path).await;
    }

    if !state.users.delete(user.id).await? {
        return Err(AppError::not_found("user"));
    }

    tracing::info!(user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
