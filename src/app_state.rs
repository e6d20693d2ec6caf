use std::sync::Arc;

use crate::services::pipeline::VerificationPipeline;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<VerificationPipeline>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: VerificationPipeline, max_upload_bytes: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            max_upload_bytes,
        }
    }
}
