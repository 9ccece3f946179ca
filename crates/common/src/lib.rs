//! Wire contract shared by the survey form and the ingest server.
//!
//! Everything that crosses the HTTP boundary lives here so both sides
//! agree on field names, option strings and timestamp formatting.

pub mod time;
pub mod types;

pub use time::{format_elapsed, iso_millis};
pub use types::{
    AgeGroup, ExperienceLevel, HealthStatus, SubmissionAck, SubmissionPayload, SurveyResponse,
    UnknownOption,
};

/// Path of the ingest endpoint.
pub const STUDY_DATA_PATH: &str = "/api/study-data";

/// Path of the liveness probe.
pub const HEALTH_PATH: &str = "/api/health";

/// Query parameter carrying the participant ID.
pub const PRIMARY_PID_PARAM: &str = "PROLIFIC_PID";

/// Lowercase alias consulted when the primary parameter is missing or empty.
pub const FALLBACK_PID_PARAM: &str = "prolific_id";
