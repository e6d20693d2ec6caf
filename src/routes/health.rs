use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::services::ocr::DocumentRecognizer;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
    pub stats: StoreStats,
}

#[derive(Serialize, Deserialize)]
pub struct HealthChecks {
    pub recognizer: ComponentHealth,
}

#[derive(Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

/// In-memory state sizes; nothing is evicted, so these only grow.
#[derive(Serialize, Deserialize)]
pub struct StoreStats {
    pub tasks_total: usize,
    pub tasks_pending: usize,
    pub tasks_accepted: usize,
    pub tasks_rejected: usize,
    pub phash_entries: usize,
}

/// GET /health: recognizer reachability plus store statistics.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let start = std::time::Instant::now();

    let recognizer = match state.pipeline.recognizer().health_check().await {
        Ok(_) => ComponentHealth {
            status: "ok".to_string(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Recognition service health check failed");
            ComponentHealth {
                status: "error".to_string(),
                latency_ms: None,
            }
        }
    };

    let counts = state.pipeline.tasks().counts();
    let stats = StoreStats {
        tasks_total: counts.total(),
        tasks_pending: counts.pending,
        tasks_accepted: counts.accepted,
        tasks_rejected: counts.rejected,
        phash_entries: state.pipeline.index().len(),
    };

    let healthy = recognizer.status == "ok";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { recognizer },
        stats,
    };

    (status_code, Json(response))
}
