use garde::Validate;
use serde::{Deserialize, Serialize};

/// A document accepted for verification.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    /// Document type the user claims to have uploaded (e.g. "pan").
    pub selected_type: Option<String>,
}

/// Answer from the document recognition service.
///
/// Anything that does not deserialize into this shape, or fails validation,
/// is treated as a service error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecognitionResponse {
    #[garde(skip)]
    pub accepted: bool,

    #[serde(default)]
    #[garde(length(max = 64))]
    pub code: Option<String>,

    #[serde(default)]
    #[garde(skip)]
    pub reason: Option<String>,

    #[serde(default)]
    #[garde(length(max = 64))]
    pub detected_type: Option<String>,

    #[serde(default)]
    #[garde(length(max = 128))]
    pub detected_id: Option<String>,

    #[serde(default)]
    #[garde(skip)]
    pub extracted: Option<serde_json::Map<String, serde_json::Value>>,

    #[serde(default)]
    #[garde(range(min = 0.0, max = 1.0))]
    pub confidence: Option<f64>,

    #[serde(default)]
    #[garde(length(max = 1024))]
    pub phash: Option<String>,
}
