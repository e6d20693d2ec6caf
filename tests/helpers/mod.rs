//! Test helper utilities: stub recognizers and task polling.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use uuid::Uuid;

use kyc_doc_verify::models::document::{DocumentUpload, RecognitionResponse};
use kyc_doc_verify::models::task::Task;
use kyc_doc_verify::services::ocr::{DocumentRecognizer, RecognitionError};
use kyc_doc_verify::services::phash_index::PhashIndex;
use kyc_doc_verify::services::pipeline::{PipelineSettings, VerificationPipeline};
use kyc_doc_verify::services::task_store::TaskStore;

/// How a stub recognizer answers.
#[derive(Clone)]
pub enum Behavior {
    Respond(RecognitionResponse),
    /// The n-th call gets the n-th response; the last one repeats.
    Sequence(Vec<RecognitionResponse>),
    /// Answer only after the delay.
    Delay(Duration, RecognitionResponse),
    /// Arbitrary JSON body, parsed the way the HTTP client parses it.
    Raw(serde_json::Value),
    /// Connection-level failure; also fails the health probe.
    Fail,
    Panic,
}

pub struct StubRecognizer {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl StubRecognizer {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentRecognizer for StubRecognizer {
    async fn analyze(&self, _: &DocumentUpload) -> Result<RecognitionResponse, RecognitionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Respond(response) => Ok(response.clone()),
            Behavior::Sequence(responses) => {
                let response = responses
                    .get(call)
                    .or_else(|| responses.last())
                    .expect("empty response sequence");
                Ok(response.clone())
            }
            Behavior::Delay(delay, response) => {
                sleep(*delay).await;
                Ok(response.clone())
            }
            Behavior::Raw(body) => serde_json::from_value(body.clone()).map_err(RecognitionError::Parse),
            Behavior::Fail => Err(RecognitionError::Unavailable("connection refused".to_string())),
            Behavior::Panic => panic!("recognizer exploded"),
        }
    }

    async fn health_check(&self) -> Result<(), RecognitionError> {
        match self.behavior {
            Behavior::Fail => Err(RecognitionError::Unavailable("connection refused".to_string())),
            _ => Ok(()),
        }
    }
}

pub fn settings(duplicate_threshold: u32) -> PipelineSettings {
    PipelineSettings {
        duplicate_threshold,
        service_timeout: Duration::from_secs(5),
    }
}

/// Pipeline with fresh stores around the given recognizer.
pub fn pipeline_with(
    recognizer: Arc<StubRecognizer>,
    settings: PipelineSettings,
) -> Arc<VerificationPipeline> {
    Arc::new(VerificationPipeline::new(
        Arc::new(TaskStore::new()),
        Arc::new(PhashIndex::new()),
        recognizer,
        settings,
    ))
}

pub fn pipeline_for(behavior: Behavior) -> Arc<VerificationPipeline> {
    pipeline_with(Arc::new(StubRecognizer::new(behavior)), settings(8))
}

/// Minimal PNG signature; enough for format sniffing.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

pub fn document(selected_type: Option<&str>) -> DocumentUpload {
    DocumentUpload {
        bytes: PNG_BYTES.to_vec(),
        filename: "document.png".to_string(),
        mime_type: "image/png".to_string(),
        selected_type: selected_type.map(str::to_string),
    }
}

/// Poll the task store until the task leaves PENDING.
pub async fn wait_for_terminal(pipeline: &VerificationPipeline, task_id: Uuid, timeout: Duration) -> Task {
    let deadline = Instant::now() + timeout;
    loop {
        let task = pipeline
            .tasks()
            .get(&task_id)
            .expect("task disappeared from store");
        if task.status.is_terminal() {
            return task;
        }
        assert!(
            Instant::now() < deadline,
            "task {task_id} still pending after {timeout:?}"
        );
        sleep(Duration::from_millis(10)).await;
    }
}

pub async fn submit_and_wait(pipeline: &Arc<VerificationPipeline>, document: DocumentUpload) -> Task {
    let task_id = pipeline.submit(document);
    wait_for_terminal(pipeline, task_id, Duration::from_secs(10)).await
}
