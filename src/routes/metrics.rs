use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::services::pipeline::VerificationPipeline;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: Arc<PrometheusHandle>,
    pub pipeline: Arc<VerificationPipeline>,
}

/// GET /metrics: Prometheus text exposition.
///
/// Task gauges are sampled from the store at scrape time.
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    let counts = state.pipeline.tasks().counts();
    ::metrics::gauge!("kyc_tasks", "status" => "pending").set(counts.pending as f64);
    ::metrics::gauge!("kyc_tasks", "status" => "accept").set(counts.accepted as f64);
    ::metrics::gauge!("kyc_tasks", "status" => "reject").set(counts.rejected as f64);

    state.handle.render()
}
