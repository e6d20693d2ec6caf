use serde::Deserialize;
use std::time::Duration;

use crate::services::pipeline::PipelineSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:4000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Document recognition endpoint that accepts the multipart upload.
    #[serde(default = "default_ocr_url")]
    pub ocr_url: String,

    /// Upper bound on a single recognition call, in seconds.
    #[serde(default = "default_ocr_timeout_secs")]
    pub ocr_timeout_secs: u64,

    /// Maximum Hamming distance (in bits) at which two images count as duplicates.
    #[serde(default = "default_phash_duplicate_threshold")]
    pub phash_duplicate_threshold: u32,

    /// Largest accepted document upload, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:4000".to_string()
}

fn default_ocr_url() -> String {
    "http://localhost:8001/analyze-document".to_string()
}

fn default_ocr_timeout_secs() -> u64 {
    30
}

fn default_phash_duplicate_threshold() -> u32 {
    8
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build from explicit key/value pairs (upper-case keys, as in the environment).
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.ocr_timeout_secs)
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            duplicate_threshold: self.phash_duplicate_threshold,
            service_timeout: self.ocr_timeout(),
        }
    }
}
