//! Ingest server for the study survey.
//!
//! Accepts survey submissions, hands them to an observability sink, answers
//! liveness probes, and serves the built front end for every other path.
//! Structured logging goes through tracing; counters through Prometheus.

pub mod config;
pub mod error;
pub mod routes;
pub mod sink;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use common::{HEALTH_PATH, STUDY_DATA_PATH};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use routes::study_data::AppState;
use sink::{ObservabilitySink, TracingSink};

/// Creates the Axum application router with all routes and shared state.
///
/// Paths not matched by the API resolve to files under `static_dir`, and to
/// its `index.html` when no such file exists.
pub fn create_app(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    static_dir: &Path,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::scrape))
        .with_state(metrics_handle);

    let front_end =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route(HEALTH_PATH, get(routes::health::check))
        .route(STUDY_DATA_PATH, post(routes::study_data::submit))
        .with_state(state)
        .merge(metrics_router)
        .fallback_service(front_end)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state, logging submissions via tracing.
pub fn create_default_state() -> Arc<AppState> {
    create_state(Arc::new(TracingSink))
}

/// Creates application state around a specific sink.
pub fn create_state(sink: Arc<dyn ObservabilitySink>) -> Arc<AppState> {
    Arc::new(AppState::new(sink))
}
