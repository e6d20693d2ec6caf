use garde::Validate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use strum::Display;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::document::{DocumentUpload, RecognitionResponse};
use crate::models::task::{RejectCode, Task, TaskFields, Verdict};
use crate::services::ocr::{DocumentRecognizer, RecognitionError};
use crate::services::phash_index::{DuplicateCheck, PhashIndex};
use crate::services::task_store::{TaskStore, TaskStoreError};
use crate::services::type_policy::{self, PolicyDecision};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Inclusive Hamming distance at or below which an image is a duplicate.
    pub duplicate_threshold: u32,
    /// Bound on a single recognition call.
    pub service_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            duplicate_threshold: 8,
            service_timeout: Duration::from_secs(30),
        }
    }
}

/// Steps of a single verification run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Started,
    ServiceCalled,
    PolicyEvaluated,
    Finalized,
}

fn enter(task_id: Uuid, stage: Stage) {
    debug!(task_id = %task_id, stage = %stage, "Verification stage");
}

/// Asynchronous document verification.
///
/// `submit` records a `PENDING` task and hands the document to a background
/// tokio task. That background run talks to the recognizer, applies the type
/// policy and the duplicate index, and finalizes the task exactly once. Its
/// only output is the task store.
pub struct VerificationPipeline {
    tasks: Arc<TaskStore>,
    index: Arc<PhashIndex>,
    recognizer: Arc<dyn DocumentRecognizer>,
    settings: PipelineSettings,
}

impl VerificationPipeline {
    pub fn new(
        tasks: Arc<TaskStore>,
        index: Arc<PhashIndex>,
        recognizer: Arc<dyn DocumentRecognizer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            tasks,
            index,
            recognizer,
            settings,
        }
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn index(&self) -> &PhashIndex {
        &self.index
    }

    pub fn recognizer(&self) -> &dyn DocumentRecognizer {
        self.recognizer.as_ref()
    }

    /// Register a document for verification and return its task id.
    ///
    /// Must be called from within a tokio runtime; verification continues
    /// after this returns.
    pub fn submit(self: &Arc<Self>, document: DocumentUpload) -> Uuid {
        let task_id = self.tasks.create();
        enter(task_id, Stage::Started);
        metrics::counter!("kyc_tasks_submitted_total").increment(1);

        info!(
            task_id = %task_id,
            filename = %document.filename,
            size_bytes = document.bytes.len(),
            selected_type = document.selected_type.as_deref().unwrap_or(""),
            "Document queued for verification"
        );

        let pipeline = Arc::clone(self);
        tokio::spawn(async move { pipeline.run(task_id, document).await });

        task_id
    }

    /// Current snapshot of a task. Ids that do not parse are simply unknown.
    pub fn status(&self, task_id: &str) -> Result<Task, TaskStoreError> {
        let id = Uuid::parse_str(task_id).map_err(|_| TaskStoreError::NotFound(Uuid::nil()))?;
        self.tasks.get(&id)
    }

    async fn run(self: Arc<Self>, task_id: Uuid, document: DocumentUpload) {
        // The verification itself runs in its own task so a panic inside it
        // still ends with the task finalized.
        let worker = Arc::clone(&self);
        let verdict = match tokio::spawn(async move { worker.verify(task_id, &document).await }).await
        {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(task_id = %task_id, error = %e, "Verification aborted");
                Verdict::service_error("OCR service error")
            }
        };

        self.finalize(task_id, verdict);
    }

    /// Compute the verdict for one document without touching the task store.
    ///
    /// The duplicate index is updated when the document carries a hash and
    /// passes the type policy.
    pub async fn verify(&self, task_id: Uuid, document: &DocumentUpload) -> Verdict {
        let start = Instant::now();
        let response = self.recognize(document).await;
        metrics::histogram!("kyc_recognition_seconds").record(start.elapsed().as_secs_f64());
        enter(task_id, Stage::ServiceCalled);

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    task_id = %task_id,
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Recognition failed"
                );
                let reason = match e {
                    RecognitionError::Parse(_) | RecognitionError::Invalid(_) => {
                        "OCR returned invalid response"
                    }
                    _ => "OCR service error",
                };
                return Verdict::service_error(reason);
            }
        };

        debug!(
            task_id = %task_id,
            accepted = response.accepted,
            detected_type = response.detected_type.as_deref().unwrap_or(""),
            ocr_duration_ms = start.elapsed().as_millis() as u64,
            "Recognition complete"
        );

        self.decide(task_id, document.selected_type.as_deref(), response)
            .await
    }

    async fn recognize(&self, document: &DocumentUpload) -> Result<RecognitionResponse, RecognitionError> {
        let timeout = self.settings.service_timeout;
        let response = tokio::time::timeout(timeout, self.recognizer.analyze(document))
            .await
            .map_err(|_| RecognitionError::Timeout(timeout))??;
        response.validate()?;
        Ok(response)
    }

    async fn decide(
        &self,
        task_id: Uuid,
        selected_type: Option<&str>,
        response: RecognitionResponse,
    ) -> Verdict {
        let detected_type = response.detected_type.map(|t| t.to_lowercase());
        let phash = response
            .phash
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        let mut accepted = response.accepted;
        let mut code = response.code.filter(|c| !c.is_empty()).map(RejectCode::from);
        let mut reason = response.reason.filter(|r| !r.is_empty());

        let policy = type_policy::evaluate(
            selected_type,
            detected_type.as_deref(),
            response.detected_id.as_deref(),
        );
        enter(task_id, Stage::PolicyEvaluated);

        match policy {
            PolicyDecision::Reject {
                code: policy_code,
                reason: policy_reason,
            } => {
                info!(task_id = %task_id, reason = %policy_reason, "Document type rejected");
                accepted = false;
                code = Some(policy_code);
                reason = Some(policy_reason);
            }
            PolicyDecision::Pass => match phash.as_deref() {
                Some(hash) => {
                    let check = match self.check_duplicate(hash).await {
                        Ok(check) => check,
                        Err(e) => {
                            error!(task_id = %task_id, error = %e, "Duplicate check aborted");
                            return Verdict::service_error("OCR service error");
                        }
                    };
                    if check.is_duplicate {
                        let distance = check.min_distance.unwrap_or_default();
                        info!(task_id = %task_id, distance, "Duplicate document detected");
                        accepted = false;
                        code = Some(RejectCode::Duplicate);
                        reason = Some(format!(
                            "Document too similar to previous upload (distance={distance})"
                        ));
                    }
                }
                None => {
                    debug!(task_id = %task_id, "No perceptual hash returned, duplicate check skipped");
                }
            },
        }

        let fields = TaskFields {
            extracted: response.extracted,
            confidence: response.confidence,
            phash,
            detected_type,
            detected_id: response.detected_id,
        };

        if accepted {
            Verdict::accept(reason.unwrap_or_else(|| "OK".to_string()), fields)
        } else {
            let reason = reason
                .or_else(|| code.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| "Validation failed".to_string());
            Verdict::reject(code, reason, fields)
        }
    }

    /// The index scan is linear and holds a blocking lock, so it runs on the
    /// blocking pool.
    async fn check_duplicate(&self, hash: &str) -> Result<DuplicateCheck, JoinError> {
        let index = Arc::clone(&self.index);
        let candidate = hash.to_string();
        let threshold = self.settings.duplicate_threshold;
        tokio::task::spawn_blocking(move || index.check_and_register(&candidate, threshold)).await
    }

    fn finalize(&self, task_id: Uuid, verdict: Verdict) {
        let status = verdict.status();
        let code = verdict.code().map(ToString::to_string).unwrap_or_default();

        match self.tasks.finalize(task_id, verdict) {
            Ok(task) => {
                enter(task_id, Stage::Finalized);
                metrics::counter!(
                    "kyc_tasks_finalized_total",
                    "status" => status.to_string(),
                    "code" => code.clone()
                )
                .increment(1);
                info!(
                    task_id = %task_id,
                    status = %status,
                    code = %code,
                    reason = task.reason.as_deref().unwrap_or(""),
                    "Task finalized"
                );
            }
            Err(e) => {
                metrics::counter!("kyc_invariant_violations_total").increment(1);
                error!(
                    task_id = %task_id,
                    error = %e,
                    attempted_status = %status,
                    invariant_violation = true,
                    "Task finalization rejected by store"
                );
            }
        }
    }
}
