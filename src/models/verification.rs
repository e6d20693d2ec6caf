use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::task::{RejectCode, Task, TaskStatus};

/// Text fields sent alongside the document in the upload form.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UploadForm {
    #[garde(length(max = 64))]
    pub doc_type: Option<String>,
}

/// Response after submitting a document for verification.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub ok: bool,
    #[serde(rename = "taskId")]
    pub task_id: Uuid,
    pub status: TaskStatus,
    pub message: String,
}

impl SubmitResponse {
    pub fn queued(task_id: Uuid) -> Self {
        Self {
            ok: true,
            task_id,
            status: TaskStatus::Pending,
            message: "File received and queued for validation".to_string(),
        }
    }
}

/// Response for querying task status.
///
/// Id and timestamps are camelCase; recognition fields keep snake_case.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub ok: bool,
    #[serde(rename = "taskId")]
    pub task_id: Uuid,
    pub status: TaskStatus,
    pub code: Option<RejectCode>,
    pub reason: Option<String>,
    pub extracted: Option<serde_json::Map<String, serde_json::Value>>,
    pub confidence: Option<f64>,
    pub phash: Option<String>,
    pub detected_type: Option<String>,
    pub detected_id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskStatusResponse {
    fn from(task: Task) -> Self {
        Self {
            ok: true,
            task_id: task.id,
            status: task.status,
            code: task.code,
            reason: task.reason,
            extracted: task.fields.extracted,
            confidence: task.fields.confidence,
            phash: task.fields.phash,
            detected_type: task.fields.detected_type,
            detected_id: task.fields.detected_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
