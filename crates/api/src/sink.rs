//! Where received submissions go.
//!
//! The ingest endpoint has no storage of its own; its only side effect is
//! handing a [`StudyRecord`] to an [`ObservabilitySink`]. Swapping the sink
//! for a database writer does not change the endpoint.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use common::iso_millis;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// One received submission, fields kept exactly as sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyRecord {
    pub receipt_id: Uuid,
    pub prolific_id: Value,
    pub time_spent: Value,
    pub responses: Value,
    pub start_time: Value,
    pub end_time: Value,
    #[serde(with = "iso_millis")]
    pub received_at: DateTime<Utc>,
}

impl StudyRecord {
    /// Picks the known fields out of a request body. Missing fields, or a
    /// body that is not a JSON object, yield `null`.
    pub fn from_body(body: &Value, receipt_id: Uuid, received_at: DateTime<Utc>) -> Self {
        let field = |name: &str| body.get(name).cloned().unwrap_or(Value::Null);

        Self {
            receipt_id,
            prolific_id: field("prolificId"),
            time_spent: field("timeSpent"),
            responses: field("responses"),
            start_time: field("startTime"),
            end_time: field("endTime"),
            received_at,
        }
    }
}

/// Receiver of study records. Recording is fire-and-forget.
pub trait ObservabilitySink: Send + Sync {
    fn record(&self, record: &StudyRecord);
}

/// Emits each record as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ObservabilitySink for TracingSink {
    fn record(&self, record: &StudyRecord) {
        tracing::info!(
            target: "study_data",
            receipt_id = %record.receipt_id,
            prolific_id = %record.prolific_id,
            time_spent = %record.time_spent,
            responses = %record.responses,
            start_time = %record.start_time,
            end_time = %record.end_time,
            timestamp = %iso_millis::format(&record.received_at),
            "Study data received"
        );
    }
}

/// Keeps records in memory. Used by tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    records: Arc<RwLock<Vec<StudyRecord>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<StudyRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObservabilitySink for InMemorySink {
    fn record(&self, record: &StudyRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}
