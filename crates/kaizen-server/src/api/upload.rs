// ABOUTME: Handler for POST /upload, storing multipart files and returning any extracted text.
// ABOUTME: The returned file_contents can be passed straight into the /analyze request.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use kaizen_store::StoredUpload;
use serde::Serialize;

use super::ApiError;
use crate::app_state::SharedState;

/// Maximum size of a whole `/upload` request body.
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uploaded_files: Vec<StoredUpload>,
    pub file_contents: Vec<String>,
    pub message: String,
}

/// POST /upload
///
/// Every multipart part that carries a file name is stored; other parts are
/// ignored. The request body is capped at [`UPLOAD_BODY_LIMIT`] bytes.
pub async fn upload_files(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart?;
    let mut uploaded_files = Vec::new();
    let mut file_contents = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;

        let mut stored = state.uploads.save(&filename, &bytes).await?;
        if let Some(text) = stored.content.take() {
            file_contents.push(text);
        }
        uploaded_files.push(stored);
    }

    let message = format!("Successfully uploaded {} file(s)", uploaded_files.len());
    Ok(Json(UploadResponse {
        uploaded_files,
        file_contents,
        message,
    }))
}
