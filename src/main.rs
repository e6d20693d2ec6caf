use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use kyc_doc_verify::app_state::AppState;
use kyc_doc_verify::config::AppConfig;
use kyc_doc_verify::routes::{self, metrics::MetricsState};
use kyc_doc_verify::services::{
    ocr::RecognitionClient, phash_index::PhashIndex, pipeline::VerificationPipeline,
    task_store::TaskStore,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!(
        ocr_url = %config.ocr_url,
        duplicate_threshold = config.phash_duplicate_threshold,
        ocr_timeout_secs = config.ocr_timeout_secs,
        "Initializing kyc-doc-verify server"
    );

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!(
        "kyc_tasks_submitted_total",
        "Total documents submitted for verification"
    );
    metrics::describe_counter!(
        "kyc_tasks_finalized_total",
        "Total verification tasks finalized, by status and code"
    );
    metrics::describe_counter!(
        "kyc_invariant_violations_total",
        "Finalize attempts on tasks that were not pending"
    );
    metrics::describe_histogram!(
        "kyc_recognition_seconds",
        "Time spent waiting on the document recognition service"
    );
    metrics::describe_gauge!(
        "kyc_phash_index_size",
        "Perceptual hashes registered for duplicate detection"
    );
    metrics::describe_gauge!("kyc_tasks", "Tasks currently held, by status");

    // Initialize document recognition client
    tracing::info!("Initializing document recognition client");
    let recognizer = RecognitionClient::new(&config.ocr_url, config.ocr_timeout())
        .expect("Failed to initialize recognition client");

    let pipeline = VerificationPipeline::new(
        Arc::new(TaskStore::new()),
        Arc::new(PhashIndex::new()),
        Arc::new(recognizer),
        config.pipeline_settings(),
    );

    // Create shared application state
    let state = AppState::new(pipeline, config.max_upload_bytes);
    let metrics_state = MetricsState {
        handle: prometheus_handle,
        pipeline: Arc::clone(&state.pipeline),
    };

    // Build API routes
    let app = Router::new()
        .merge(routes::router(state))
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(metrics_state),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting kyc-doc-verify on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
