use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::iso_millis;

/// A string that names none of the options of a survey question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {question} option: {value:?}")]
pub struct UnknownOption {
    pub question: &'static str,
    pub value: String,
}

/// Age bucket of the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55+")]
    Over55,
}

impl AgeGroup {
    /// Every bucket, in the order the form lists them.
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::From18To24,
        AgeGroup::From25To34,
        AgeGroup::From35To44,
        AgeGroup::From45To54,
        AgeGroup::Over55,
    ];

    /// Returns the wire value, which doubles as the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::From18To24 => "18-24",
            AgeGroup::From25To34 => "25-34",
            AgeGroup::From35To44 => "35-44",
            AgeGroup::From45To54 => "45-54",
            AgeGroup::Over55 => "55+",
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s.trim())
            .ok_or_else(|| UnknownOption {
                question: "age group",
                value: s.to_string(),
            })
    }
}

/// Self-rated experience with online surveys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Novice,
    Intermediate,
    Experienced,
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Novice,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Experienced,
        ExperienceLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Novice => "novice",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Experienced => "experienced",
            ExperienceLevel::Expert => "expert",
        }
    }

    /// Returns the capitalized label shown next to the radio button.
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Novice => "Novice",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Experienced => "Experienced",
            ExperienceLevel::Expert => "Expert",
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = UnknownOption;

    /// Accepts the wire value in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExperienceLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| UnknownOption {
                question: "experience level",
                value: s.to_string(),
            })
    }
}

/// A completed set of answers.
///
/// Both required answers are non-optional here; the form keeps its
/// in-progress answers elsewhere and only builds this once they are filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub age_group: AgeGroup,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub feedback: String,
}

/// Document POSTed to the ingest endpoint on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub prolific_id: String,
    pub time_spent: u64,
    pub responses: SurveyResponse,
    #[serde(with = "iso_millis")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_time: DateTime<Utc>,
}

/// Acknowledgement returned by the ingest endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAck {
    pub success: bool,
    pub message: String,
}

impl SubmissionAck {
    pub fn received() -> Self {
        Self {
            success: true,
            message: "Data received".to_string(),
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn ok(timestamp: DateTime<Utc>) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_age_group_wire_values() {
        let wire: Vec<String> = AgeGroup::ALL
            .iter()
            .map(|g| serde_json::to_string(g).unwrap())
            .collect();
        assert_eq!(
            wire,
            vec!["\"18-24\"", "\"25-34\"", "\"35-44\"", "\"45-54\"", "\"55+\""]
        );
    }

    #[test]
    fn test_age_group_parses_display_value() {
        for group in AgeGroup::ALL {
            assert_eq!(group.to_string().parse::<AgeGroup>().unwrap(), group);
        }
        assert!("17".parse::<AgeGroup>().is_err());
    }

    #[test]
    fn test_experience_level_parse_is_case_insensitive() {
        assert_eq!(
            "Expert".parse::<ExperienceLevel>().unwrap(),
            ExperienceLevel::Expert
        );
        let err = "guru".parse::<ExperienceLevel>().unwrap_err();
        assert_eq!(err.question, "experience level");
        assert_eq!(err.value, "guru");
    }

    #[test]
    fn test_payload_uses_camel_case_and_millisecond_timestamps() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let payload = SubmissionPayload {
            prolific_id: "ABC123".to_string(),
            time_spent: 125,
            responses: SurveyResponse {
                age_group: AgeGroup::From25To34,
                experience_level: ExperienceLevel::Novice,
                feedback: String::new(),
            },
            start_time: start,
            end_time: start + chrono::Duration::seconds(125),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["prolificId"], "ABC123");
        assert_eq!(json["timeSpent"], 125);
        assert_eq!(json["responses"]["ageGroup"], "25-34");
        assert_eq!(json["responses"]["experienceLevel"], "novice");
        assert_eq!(json["responses"]["feedback"], "");
        assert_eq!(json["startTime"], "2024-05-01T10:00:00.000Z");
        assert_eq!(json["endTime"], "2024-05-01T10:02:05.000Z");
    }

    #[test]
    fn test_ack_matches_expected_body() {
        let json = serde_json::to_value(SubmissionAck::received()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "message": "Data received" })
        );
    }
}
