/*
 * Responsibility
 * - /pets 系 handler (Bearer は middleware で検証済み、AuthCtx を受け取る)
 * - Tutor 以外は 403
 * - 他人の pet は存在しないものとして 404 (use-case を呼ぶ前に照合)
 */
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};

use crate::api::v1::dto::pets::{CreatePetRequest, ListPetsQuery, PetResponse, UpdatePetRequest};
use crate::api::v1::dto::uploads::UploadResponse;
use crate::api::v1::extractors::{AuthCtx, AuthCtxExtractor};
use crate::api::v1::handlers::uploads::store_first_file;
use crate::domain::Pet;
use crate::error::AppError;
use crate::state::AppState;
use crate::usecases::{CreatePet, DeletePet, ListPets, UpdatePet};

const PHOTO_PREFIX: &str = "pet-";
const PHOTO_DEFAULT_EXT: &str = "jpg";

fn require_tutor(ctx: &AuthCtx) -> Result<(), AppError> {
    if ctx.is_tutor() {
        Ok(())
    } else {
        tracing::warn!(user_id = ctx.user_id, user_type = %ctx.user_type, "pets access denied");
        Err(AppError::Forbidden)
    }
}

async fn owned_pet(state: &AppState, ctx: &AuthCtx, pet_id: i64) -> Result<Pet, AppError> {
    match state.pets.find_by_id(pet_id).await? {
        Some(pet) if pet.owner_id == ctx.user_id => Ok(pet),
        _ => Err(AppError::not_found("pet")),
    }
}

pub async fn list_pets(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<ListPetsQuery>,
) -> Result<Json<Vec<PetResponse>>, AppError> {
    require_tutor(&ctx)?;

    let pets = ListPets::new(state.pets.clone())
        .execute(ctx.user_id, query.into())
        .await
        .map_err(|e| AppError::from_usecase(e, "pet"))?;

    Ok(Json(pets.into_iter().map(PetResponse::from).collect()))
}

pub async fn create_pet(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreatePetRequest>,
) -> Result<(StatusCode, Json<PetResponse>), AppError> {
    require_tutor(&ctx)?;

    let pet = CreatePet::new(state.pets.clone())
        .execute(req.into_input(ctx.user_id))
        .await
        .map_err(|e| AppError::from_usecase(e, "pet"))?;

    Ok((StatusCode::CREATED, Json(pet.into())))
}

pub async fn update_pet(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(pet_id): Path<i64>,
    Json(req): Json<UpdatePetRequest>,
) -> Result<Json<PetResponse>, AppError> {
    require_tutor(&ctx)?;
    let pet = owned_pet(&state, &ctx, pet_id).await?;

    let updated = UpdatePet::new(state.pets.clone())
        .execute(req.into_input(pet.id))
        .await
        .map_err(|e| AppError::from_usecase(e, "pet"))?;

    Ok(Json(updated.into()))
}

pub async fn delete_pet(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(pet_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_tutor(&ctx)?;
    let pet = owned_pet(&state, &ctx, pet_id).await?;

    DeletePet::new(state.pets.clone())
        .execute(pet.id)
        .await
        .map_err(|e| AppError::from_usecase(e, "pet"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn upload_photo(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    require_tutor(&ctx)?;

    let path = store_first_file(&state, multipart, PHOTO_PREFIX, PHOTO_DEFAULT_EXT).await?;
    tracing::info!(user_id = ctx.user_id, path = %path, "pet photo uploaded");
    Ok((StatusCode::CREATED, Json(UploadResponse { path })))
}
