use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};
use uuid::Uuid;

/// Lifecycle status of a verification task.
///
/// `Pending` is the only non-terminal state; a task leaves it at most once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    Accept,
    Reject,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

/// Machine-readable rejection code attached to a rejected task.
///
/// Codes raised locally have their own variants; codes reported by the
/// recognition service (e.g. `BLUR`, `OCR_MISMATCH`) pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RejectCode {
    TypeMismatch,
    Duplicate,
    ServiceError,
    Upstream(String),
}

impl RejectCode {
    pub fn as_str(&self) -> &str {
        match self {
            RejectCode::TypeMismatch => "TYPE_MISMATCH",
            RejectCode::Duplicate => "DUPLICATE",
            RejectCode::ServiceError => "SERVICE_ERROR",
            RejectCode::Upstream(code) => code,
        }
    }
}

impl From<String> for RejectCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "TYPE_MISMATCH" => RejectCode::TypeMismatch,
            "DUPLICATE" => RejectCode::Duplicate,
            "SERVICE_ERROR" => RejectCode::ServiceError,
            _ => RejectCode::Upstream(code),
        }
    }
}

impl From<RejectCode> for String {
    fn from(code: RejectCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for RejectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data attached to a task from the recognition service's answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFields {
    pub extracted: Option<serde_json::Map<String, serde_json::Value>>,
    pub confidence: Option<f64>,
    pub phash: Option<String>,
    pub detected_type: Option<String>,
    pub detected_id: Option<String>,
}

/// Final outcome of one verification run, applied to a task exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub reason: String,
    pub fields: TaskFields,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accept,
    Reject(Option<RejectCode>),
}

impl Verdict {
    pub fn accept(reason: impl Into<String>, fields: TaskFields) -> Self {
        Self {
            outcome: Outcome::Accept,
            reason: reason.into(),
            fields,
        }
    }

    pub fn reject(code: Option<RejectCode>, reason: impl Into<String>, fields: TaskFields) -> Self {
        Self {
            outcome: Outcome::Reject(code),
            reason: reason.into(),
            fields,
        }
    }

    /// Rejection for any failure to obtain a usable recognition result.
    pub fn service_error(reason: impl Into<String>) -> Self {
        Self::reject(Some(RejectCode::ServiceError), reason, TaskFields::default())
    }

    pub fn status(&self) -> TaskStatus {
        match self.outcome {
            Outcome::Accept => TaskStatus::Accept,
            Outcome::Reject(_) => TaskStatus::Reject,
        }
    }

    pub fn code(&self) -> Option<&RejectCode> {
        match &self.outcome {
            Outcome::Accept => None,
            Outcome::Reject(code) => code.as_ref(),
        }
    }
}

/// One verification attempt as held by the task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub status: TaskStatus,
    pub code: Option<RejectCode>,
    pub reason: Option<String>,
    #[serde(flatten)]
    pub fields: TaskFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn pending(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: TaskStatus::Pending,
            code: None,
            reason: None,
            fields: TaskFields::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_value(TaskStatus::Pending).unwrap(), "PENDING");
        assert_eq!(TaskStatus::Reject.to_string(), "REJECT");
        assert_eq!("ACCEPT".parse::<TaskStatus>().unwrap(), TaskStatus::Accept);
    }

    #[test]
    fn test_upstream_codes_pass_through() {
        let code = RejectCode::from("BLUR".to_string());
        assert_eq!(code, RejectCode::Upstream("BLUR".to_string()));
        assert_eq!(serde_json::to_value(&code).unwrap(), "BLUR");

        let known: RejectCode = serde_json::from_str("\"DUPLICATE\"").unwrap();
        assert_eq!(known, RejectCode::Duplicate);
    }

    #[test]
    fn test_accept_verdict_carries_no_code() {
        let verdict = Verdict::accept("OK", TaskFields::default());
        assert_eq!(verdict.status(), TaskStatus::Accept);
        assert!(verdict.code().is_none());

        let verdict = Verdict::service_error("OCR service error");
        assert_eq!(verdict.status(), TaskStatus::Reject);
        assert_eq!(verdict.code(), Some(&RejectCode::ServiceError));
    }
}
