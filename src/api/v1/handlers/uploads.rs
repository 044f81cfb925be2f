/*
 * Responsibility
 * - multipart アップロードの受け取り → UploadStore に保存 → 公開パスを返す
 * - 最初のファイルフィールドだけを保存する (テキストフィールドは読み飛ばす)
 * - POST /admin/uploads (獣医の書類) と POST /pets/photos で共用
 */
use axum::{Json, extract::Multipart, extract::State, http::StatusCode};

use crate::api::v1::dto::uploads::UploadResponse;
use crate::error::AppError;
use crate::state::AppState;

const DOCUMENT_PREFIX: &str = "doc-";
const DOCUMENT_DEFAULT_EXT: &str = "bin";

pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let path = store_first_file(&state, multipart, DOCUMENT_PREFIX, DOCUMENT_DEFAULT_EXT).await?;
    tracing::info!(path = %path, "document uploaded");
    Ok((StatusCode::CREATED, Json(UploadResponse { path })))
}

pub(crate) async fn store_first_file(
    state: &AppState,
    mut multipart: Multipart,
    prefix: &str,
    default_ext: &str,
) -> Result<String, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request("INVALID_MULTIPART", e.body_text()))?
    {
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request("INVALID_MULTIPART", e.body_text()))?;
        if bytes.is_empty() {
            return Err(AppError::bad_request("EMPTY_FILE", "uploaded file is empty"));
        }

        return state
            .uploads
            .save(prefix, Some(&file_name), default_ext, &bytes)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to store upload");
                AppError::Internal
            });
    }

    Err(AppError::bad_request("FILE_REQUIRED", "no file in request"))
}
