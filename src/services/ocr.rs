use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use std::time::Duration;

use crate::models::document::{DocumentUpload, RecognitionResponse};

/// External document recognition (OCR + classification + pHash).
///
/// Implementations must be thread-safe; one instance is shared by every
/// in-flight verification.
#[async_trait]
pub trait DocumentRecognizer: Send + Sync {
    /// Submit a document and return the service's structured answer.
    async fn analyze(&self, document: &DocumentUpload) -> Result<RecognitionResponse, RecognitionError>;

    /// Check that the service is reachable.
    async fn health_check(&self) -> Result<(), RecognitionError> {
        Ok(())
    }
}

/// HTTP client for the document recognition service.
pub struct RecognitionClient {
    http: Client,
    analyze_url: Url,
}

impl RecognitionClient {
    pub fn new(analyze_url: &str, timeout: Duration) -> Result<Self, RecognitionError> {
        let analyze_url = Url::parse(analyze_url)
            .map_err(|e| RecognitionError::Config(format!("invalid OCR_URL {analyze_url:?}: {e}")))?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RecognitionError::Http)?;

        Ok(Self { http, analyze_url })
    }

    fn root_url(&self) -> Url {
        let mut root = self.analyze_url.clone();
        root.set_path("/");
        root.set_query(None);
        root
    }
}

#[async_trait]
impl DocumentRecognizer for RecognitionClient {
    async fn analyze(&self, document: &DocumentUpload) -> Result<RecognitionResponse, RecognitionError> {
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.filename.clone())
            .mime_str(&document.mime_type)
            .map_err(RecognitionError::Http)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.analyze_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(RecognitionError::Http)?
            .error_for_status()
            .map_err(RecognitionError::Http)?;

        let body = response.bytes().await.map_err(RecognitionError::Http)?;

        serde_json::from_slice(&body).map_err(RecognitionError::Parse)
    }

    async fn health_check(&self) -> Result<(), RecognitionError> {
        let response = self
            .http
            .get(self.root_url())
            .send()
            .await
            .map_err(RecognitionError::Http)?;

        if !response.status().is_success() {
            return Err(RecognitionError::Unavailable(format!(
                "health probe returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse recognition response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Recognition response failed validation: {0}")]
    Invalid(#[from] garde::Report),

    #[error("Recognition service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Recognition service unavailable: {0}")]
    Unavailable(String),

    #[error("Recognition client configuration error: {0}")]
    Config(String),
}
