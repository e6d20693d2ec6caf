use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::app_state::AppState;

pub mod health;
pub mod metrics;
pub mod verify;

/// Room for multipart framing and the text fields around the file.
pub const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// API routes with the upload body limit applied.
///
/// The limit is enforced by the multipart extractor, so an oversized body
/// surfaces as a handler error and gets the JSON error envelope.
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/kyc/upload-doc", post(verify::upload_document))
        .route("/api/kyc/status/{task_id}", get(verify::get_task_status))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
