//! Inbound "problem solved" event
//!
//! Delivered by whatever layer detects an accepted submission. The scheduler
//! only ever sees this value, never the page or network traffic it came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RevisionError};

/// Name used when the event carries no usable problem name
pub const UNTITLED_PROBLEM: &str = "Untitled Problem";

/// A successful submission worth tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedEvent {
    pub name: String,
    pub link: String,
    /// Failed attempts before the accepted one
    pub mistakes: i64,
    pub time_in_minutes: f64,
    /// Defaults to the scheduler's current time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solved_date: Option<DateTime<Utc>>,
}

impl SolvedEvent {
    pub fn new(name: impl Into<String>, link: impl Into<String>, mistakes: i64, time_in_minutes: f64) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            mistakes,
            time_in_minutes,
            solved_date: None,
        }
    }

    pub fn solved_at(mut self, date: DateTime<Utc>) -> Self {
        self.solved_date = Some(date);
        self
    }

    /// Reject events the scheduler cannot classify
    pub fn validate(&self) -> Result<()> {
        if self.link.trim().is_empty() {
            return Err(RevisionError::Validation("link must not be empty".to_string()));
        }
        if self.mistakes < 0 {
            return Err(RevisionError::Validation(format!(
                "mistakes must be non-negative, got {}",
                self.mistakes
            )));
        }
        if !(self.time_in_minutes.is_finite() && self.time_in_minutes > 0.0) {
            return Err(RevisionError::Validation(format!(
                "timeInMinutes must be positive, got {}",
                self.time_in_minutes
            )));
        }
        Ok(())
    }

    /// Mistake count as stored on the record; call after `validate`
    pub fn mistake_count(&self) -> u32 {
        u32::try_from(self.mistakes.max(0)).unwrap_or(u32::MAX)
    }

    pub fn display_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            UNTITLED_PROBLEM.to_string()
        } else {
            name.to_string()
        }
    }

    pub fn canonical_link(&self) -> String {
        self.link.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_event() {
        let event = SolvedEvent::new("Two Sum", "https://x/two-sum", 0, 3.0);
        assert!(event.validate().is_ok());
        assert_eq!(event.mistake_count(), 0);
    }

    #[test]
    fn test_empty_link_rejected() {
        let event = SolvedEvent::new("Two Sum", "   ", 0, 3.0);
        let err = event.validate().unwrap_err();
        assert!(matches!(err, RevisionError::Validation(_)));
    }

    #[test]
    fn test_negative_mistakes_rejected() {
        let event = SolvedEvent::new("Two Sum", "https://x/two-sum", -1, 3.0);
        assert!(matches!(event.validate(), Err(RevisionError::Validation(_))));
    }

    #[test]
    fn test_non_positive_time_rejected() {
        for minutes in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let event = SolvedEvent::new("Two Sum", "https://x/two-sum", 0, minutes);
            assert!(
                matches!(event.validate(), Err(RevisionError::Validation(_))),
                "expected rejection for {}",
                minutes
            );
        }
    }

    #[test]
    fn test_display_name_fallback() {
        let event = SolvedEvent::new("  ", "https://x/two-sum", 0, 3.0);
        assert_eq!(event.display_name(), UNTITLED_PROBLEM);

        let event = SolvedEvent::new(" Two Sum ", "https://x/two-sum", 0, 3.0);
        assert_eq!(event.display_name(), "Two Sum");
    }

    #[test]
    fn test_canonical_link_trims() {
        let event = SolvedEvent::new("Two Sum", "  https://x/two-sum\n", 0, 3.0);
        assert_eq!(event.canonical_link(), "https://x/two-sum");
    }

    #[test]
    fn test_parse_from_json_without_date() {
        let json = r#"{"name":"Two Sum","link":"https://x/two-sum","mistakes":2,"timeInMinutes":4.5}"#;
        let event: SolvedEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.mistakes, 2);
        assert_eq!(event.time_in_minutes, 4.5);
        assert!(event.solved_date.is_none());
    }

    #[test]
    fn test_parse_from_json_with_date() {
        let json = r#"{"name":"Two Sum","link":"https://x/two-sum","mistakes":0,"timeInMinutes":1,"solvedDate":"2025-03-01T09:00:00Z"}"#;
        let event: SolvedEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.solved_date.unwrap().to_rfc3339(), "2025-03-01T09:00:00+00:00");
    }
}
