//! Client-side error types.

use thiserror::Error;

/// Why a submit attempt did not reach, or did not finish in, `Submitted`.
///
/// The first two variants are the ones shown inline on the form; the
/// others reject a submit without touching the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    /// Age group or experience level was not chosen.
    #[error("Please fill in all required fields")]
    MissingRequiredFields,

    /// The ingest endpoint could not be reached or answered with a failure.
    #[error("Failed to submit form. Please try again.")]
    SubmissionFailed,

    /// A request for this form is already outstanding.
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// The form was already submitted successfully.
    #[error("The form has already been submitted")]
    AlreadySubmitted,
}

/// Failure of the network call to the ingest endpoint.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The server answered with a non-success status.
    #[error("Server responded with status {0}")]
    Status(u16),

    /// The request never completed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
