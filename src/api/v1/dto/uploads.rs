use serde::Serialize;

/// Public path of a stored upload, to be sent back in a later create/update.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub path: String,
}
