//! Study data client trait with HTTP and in-memory implementations.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use common::{STUDY_DATA_PATH, SubmissionPayload};

use crate::error::SubmitError;

/// Sends a finished submission to the ingest endpoint.
#[async_trait]
pub trait StudyDataClient: Send + Sync {
    /// Delivers one payload. Any non-success outcome is an error; no retries.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmitError>;
}

/// Client POSTing JSON to a running ingest server.
#[derive(Debug, Clone)]
pub struct HttpStudyDataClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpStudyDataClient {
    /// `base_url` is the server origin, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{STUDY_DATA_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StudyDataClient for HttpStudyDataClient {
    #[tracing::instrument(skip(self, payload), fields(endpoint = %self.endpoint))]
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmitError> {
        let response = self.client.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status(status.as_u16()));
        }

        tracing::debug!(status = status.as_u16(), "study data accepted");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryClientState {
    sent: Vec<SubmissionPayload>,
    fail_with: Option<u16>,
}

/// In-memory client for testing. Records every payload, including the ones
/// it is told to reject.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStudyDataClient {
    state: Arc<RwLock<InMemoryClientState>>,
}

impl InMemoryStudyDataClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent calls fail with the given HTTP status, or succeed
    /// again with `None`.
    pub fn set_fail(&self, status: Option<u16>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fail_with = status;
    }

    /// Returns every payload received so far.
    pub fn sent(&self) -> Vec<SubmissionPayload> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sent
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sent
            .len()
    }
}

#[async_trait]
impl StudyDataClient for InMemoryStudyDataClient {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmitError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.sent.push(payload.clone());

        match state.fail_with {
            Some(status) => Err(SubmitError::Status(status)),
            None => Ok(()),
        }
    }
}
