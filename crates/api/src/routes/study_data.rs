//! Survey submission ingest.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::Utc;
use common::SubmissionAck;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::sink::{ObservabilitySink, StudyRecord};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub sink: Arc<dyn ObservabilitySink>,
}

impl AppState {
    pub fn new(sink: Arc<dyn ObservabilitySink>) -> Self {
        Self { sink }
    }
}

/// POST /api/study-data — record a submission and acknowledge it.
///
/// The body is not validated beyond being JSON; whatever arrives is logged.
#[tracing::instrument(skip(state, body))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmissionAck>, ApiError> {
    let Json(body) = body?;

    let record = StudyRecord::from_body(&body, Uuid::new_v4(), Utc::now());
    state.sink.record(&record);
    metrics::counter!("study_submissions_received_total").increment(1);

    Ok(Json(SubmissionAck::received()))
}
