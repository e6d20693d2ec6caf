use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::document::DocumentUpload;
use crate::models::verification::{SubmitResponse, TaskStatusResponse, UploadForm};
use crate::services::task_store::TaskStoreError;

/// POST /api/kyc/upload-doc: Upload an identity document for verification.
///
/// Multipart fields: `file` (required) and `docType` (optional, e.g. "pan").
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SubmitResponse>, ApiError> {
    let mut file: Option<(Vec<u8>, Option<String>, Option<String>)> = None;
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, state.max_upload_bytes))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| upload_error(e, state.max_upload_bytes))?;
                file = Some((data.to_vec(), filename, content_type));
            }
            Some("docType") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| upload_error(e, state.max_upload_bytes))?;
                form.doc_type = Some(value.trim().to_lowercase()).filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    form.validate()
        .map_err(|e| ApiError::bad_request("INVALID_DOC_TYPE", e.to_string()))?;

    let (bytes, filename, content_type) =
        file.ok_or_else(|| ApiError::bad_request("NO_FILE", "No file uploaded"))?;

    if bytes.len() > state.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge {
            max_bytes: state.max_upload_bytes,
        });
    }

    // Validate image format using the `image` crate
    let format = image::guess_format(&bytes).map_err(|_| ApiError::UnsupportedMediaType)?;

    let document = DocumentUpload {
        bytes,
        filename: filename.unwrap_or_else(|| "document".to_string()),
        mime_type: content_type.unwrap_or_else(|| format.to_mime_type().to_string()),
        selected_type: form.doc_type,
    };

    let task_id = state.pipeline.submit(document);

    Ok(Json(SubmitResponse::queued(task_id)))
}

/// The body limit can trip while reading any part of the form.
fn upload_error(e: MultipartError, max_bytes: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { max_bytes }
    } else {
        ApiError::bad_request("INVALID_UPLOAD", e.body_text())
    }
}

/// GET /api/kyc/status/{task_id}: Check verification task status.
pub async fn get_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStatusResponse>, ApiError> {
    let task = state.pipeline.status(&task_id).map_err(|e| match e {
        TaskStoreError::NotFound(_) => ApiError::NotFound(task_id.clone()),
        other => ApiError::from(other),
    })?;

    Ok(Json(task.into()))
}
