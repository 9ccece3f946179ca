//! Per-page session: who the participant is and how long they have been here.

use chrono::{DateTime, Utc};
use common::{FALLBACK_PID_PARAM, PRIMARY_PID_PARAM};
use reqwest::Url;

use crate::clock::Clock;

/// Extracts the participant ID from a page URL or a bare query string.
///
/// `PROLIFIC_PID` wins over `prolific_id`. Only the first occurrence of each
/// parameter is consulted, and an empty value counts as missing. Returns an
/// empty string when neither yields a value.
pub fn participant_id_from_query(input: &str) -> String {
    let Some(url) = parse_page_url(input) else {
        return String::new();
    };

    let first = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    };

    first(PRIMARY_PID_PARAM)
        .or_else(|| first(FALLBACK_PID_PARAM))
        .unwrap_or_default()
}

fn parse_page_url(input: &str) -> Option<Url> {
    let input = input.trim();
    if input.contains("://") {
        return Url::parse(input).ok();
    }
    let base = Url::parse("http://localhost/").ok()?;
    if input.contains('?') || input.starts_with('/') {
        // Path-relative forms such as `/survey?PROLIFIC_PID=..` or `?a=b`.
        return base.join(input).ok();
    }
    base.join(&format!("?{input}")).ok()
}

/// Whole seconds between two instants, clamped at zero.
pub fn elapsed_between(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (now - start).num_milliseconds().max(0);
    (millis / 1000) as u64
}

/// State captured once when the form is first shown.
#[derive(Debug, Clone)]
pub struct Session {
    participant_id: String,
    start_time: DateTime<Utc>,
    elapsed_seconds: u64,
}

impl Session {
    /// Reads the participant ID from `page_url` and stamps the start time.
    /// Neither is revisited afterwards.
    pub fn new(page_url: &str, clock: &dyn Clock) -> Self {
        Self::with_start(participant_id_from_query(page_url), clock.now())
    }

    pub fn with_start(participant_id: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            participant_id: participant_id.into(),
            start_time,
            elapsed_seconds: 0,
        }
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Recomputes elapsed time from `now`. Never moves backwards.
    pub fn tick(&mut self, now: DateTime<Utc>) -> u64 {
        self.observe_elapsed(elapsed_between(self.start_time, now))
    }

    /// Applies an elapsed value computed elsewhere, e.g. by [`crate::ElapsedTimer`].
    pub fn observe_elapsed(&mut self, seconds: u64) -> u64 {
        self.elapsed_seconds = self.elapsed_seconds.max(seconds);
        self.elapsed_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_primary_parameter() {
        assert_eq!(participant_id_from_query("?PROLIFIC_PID=ABC123"), "ABC123");
    }

    #[test]
    fn test_fallback_parameter() {
        assert_eq!(participant_id_from_query("?prolific_id=XYZ"), "XYZ");
    }

    #[test]
    fn test_primary_takes_priority() {
        assert_eq!(
            participant_id_from_query("prolific_id=XYZ&PROLIFIC_PID=ABC123"),
            "ABC123"
        );
    }

    #[test]
    fn test_empty_primary_falls_through() {
        assert_eq!(
            participant_id_from_query("?PROLIFIC_PID=&prolific_id=XYZ"),
            "XYZ"
        );
    }

    #[test]
    fn test_missing_parameters_yield_empty() {
        assert_eq!(participant_id_from_query(""), "");
        assert_eq!(participant_id_from_query("?study=7"), "");
        assert_eq!(participant_id_from_query("https://survey.example/"), "");
    }

    #[test]
    fn test_full_url_is_decoded() {
        assert_eq!(
            participant_id_from_query("https://survey.example/?PROLIFIC_PID=A%20B&x=1"),
            "A B"
        );
    }

    #[test]
    fn test_path_and_query_forms() {
        assert_eq!(participant_id_from_query("/?PROLIFIC_PID=ABC123"), "ABC123");
        assert_eq!(
            participant_id_from_query("/survey?PROLIFIC_PID=ABC123"),
            "ABC123"
        );
        assert_eq!(participant_id_from_query("survey?prolific_id=XYZ"), "XYZ");
        assert_eq!(participant_id_from_query("PROLIFIC_PID=ABC123"), "ABC123");
        assert_eq!(participant_id_from_query("/survey"), "");
    }

    #[test]
    fn test_session_captures_start_once() {
        let clock = ManualClock::new(t0());
        let session = Session::new("?PROLIFIC_PID=ABC123", &clock);
        clock.advance(Duration::seconds(30));

        assert_eq!(session.start_time(), t0());
        assert_eq!(session.participant_id(), "ABC123");
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn test_tick_floors_to_whole_seconds() {
        let mut session = Session::with_start("", t0());
        assert_eq!(session.tick(t0() + Duration::milliseconds(999)), 0);
        assert_eq!(session.tick(t0() + Duration::milliseconds(1000)), 1);
        assert_eq!(session.tick(t0() + Duration::milliseconds(125_400)), 125);
    }

    #[test]
    fn test_tick_never_decreases() {
        let mut session = Session::with_start("", t0());
        session.tick(t0() + Duration::seconds(10));
        assert_eq!(session.tick(t0() + Duration::seconds(4)), 10);
        assert_eq!(session.tick(t0() - Duration::seconds(4)), 10);
    }
}
