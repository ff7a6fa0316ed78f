//! Problem record and difficulty classification
//!
//! A Problem is one solved coding problem tracked for revision. Its difficulty
//! is derived from how many failed attempts preceded the accepted submission
//! and how long the solve took.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse difficulty bucket derived from the difficulty score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    /// Map a score in [0, 6] to a level
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=2 => DifficultyLevel::Easy,
            3..=4 => DifficultyLevel::Medium,
            _ => DifficultyLevel::Hard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score a solve from 0 (clean and quick) to 6 (many mistakes, long solve)
///
/// Mistakes contribute 0-3 points (1-2, 3-5, 6+), elapsed time contributes
/// 0-3 points (over 2, over 5, over 15 minutes).
pub fn difficulty_score(mistakes: u32, time_in_minutes: f64) -> u8 {
    let mistake_points = match mistakes {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        _ => 3,
    };

    let time_points = if time_in_minutes > 15.0 {
        3
    } else if time_in_minutes > 5.0 {
        2
    } else if time_in_minutes > 2.0 {
        1
    } else {
        0
    };

    mistake_points + time_points
}

/// One completed revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionEntry {
    pub date: DateTime<Utc>,
    pub was_easy: bool,
}

/// A solved problem tracked for spaced revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    //=== Identity ===
    /// Opaque identifier assigned on first insert
    pub id: String,

    pub name: String,

    /// Canonical problem URL, the natural key for upserts
    pub link: String,

    //=== Solve signal ===
    pub mistakes: u32,
    pub time_in_minutes: f64,
    pub solved_date: DateTime<Utc>,

    //=== Derived ===
    pub difficulty_score: u8,
    pub difficulty_level: DifficultyLevel,

    //=== Revision state ===
    #[serde(default)]
    pub revision_count: u32,
    pub next_revision_date: DateTime<Utc>,
    #[serde(default)]
    pub last_revised_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revision_history: Vec<RevisionEntry>,
}

impl Problem {
    /// Create a fresh record, due immediately until it is scheduled
    pub fn new(
        id: String,
        name: String,
        link: String,
        mistakes: u32,
        time_in_minutes: f64,
        solved_date: DateTime<Utc>,
    ) -> Self {
        let difficulty_score = difficulty_score(mistakes, time_in_minutes);

        Self {
            id,
            name,
            link,
            mistakes,
            time_in_minutes,
            solved_date,
            difficulty_score,
            difficulty_level: DifficultyLevel::from_score(difficulty_score),
            revision_count: 0,
            next_revision_date: solved_date,
            last_revised_date: None,
            revision_history: Vec::new(),
        }
    }

    /// Recompute score and level from mistakes and time
    pub fn refresh_difficulty(&mut self) {
        self.difficulty_score = difficulty_score(self.mistakes, self.time_in_minutes);
        self.difficulty_level = DifficultyLevel::from_score(self.difficulty_score);
    }

    /// Set the next revision `days` after `from`
    pub fn schedule(&mut self, from: DateTime<Utc>, days: i64) {
        self.next_revision_date = from + Duration::days(days.max(0));
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_revision_date <= now
    }

    /// Record a finished revision in the history
    pub fn record_revision(&mut self, at: DateTime<Utc>, was_easy: bool) {
        self.revision_history.push(RevisionEntry { date: at, was_easy });
        self.last_revised_date = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn solved_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_difficulty_score_mistake_tiers() {
        assert_eq!(difficulty_score(0, 1.0), 0);
        assert_eq!(difficulty_score(1, 1.0), 1);
        assert_eq!(difficulty_score(2, 1.0), 1);
        assert_eq!(difficulty_score(3, 1.0), 2);
        assert_eq!(difficulty_score(5, 1.0), 2);
        assert_eq!(difficulty_score(6, 1.0), 3);
        assert_eq!(difficulty_score(40, 1.0), 3);
    }

    #[test]
    fn test_difficulty_score_time_tiers() {
        assert_eq!(difficulty_score(0, 2.0), 0);
        assert_eq!(difficulty_score(0, 2.5), 1);
        assert_eq!(difficulty_score(0, 5.0), 1);
        assert_eq!(difficulty_score(0, 5.1), 2);
        assert_eq!(difficulty_score(0, 15.0), 2);
        assert_eq!(difficulty_score(0, 15.5), 3);
    }

    #[test]
    fn test_difficulty_score_range() {
        assert_eq!(difficulty_score(6, 20.0), 6);
        assert_eq!(difficulty_score(u32::MAX, f64::MAX), 6);
    }

    #[test]
    fn test_level_from_score() {
        assert_eq!(DifficultyLevel::from_score(0), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::from_score(2), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::from_score(3), DifficultyLevel::Medium);
        assert_eq!(DifficultyLevel::from_score(4), DifficultyLevel::Medium);
        assert_eq!(DifficultyLevel::from_score(5), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::from_score(6), DifficultyLevel::Hard);
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&DifficultyLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        assert_eq!(DifficultyLevel::Hard.to_string(), "hard");
    }

    #[test]
    fn test_new_problem_derives_difficulty() {
        let problem = Problem::new(
            "prob-1".to_string(),
            "Two Sum".to_string(),
            "https://x/two-sum".to_string(),
            3,
            10.0,
            solved_at(),
        );

        assert_eq!(problem.difficulty_score, 4);
        assert_eq!(problem.difficulty_level, DifficultyLevel::Medium);
        assert_eq!(problem.revision_count, 0);
        assert!(problem.last_revised_date.is_none());
        assert!(problem.revision_history.is_empty());
    }

    #[test]
    fn test_refresh_difficulty_overrides_stale_values() {
        let mut problem = Problem::new(
            "prob-1".to_string(),
            "Two Sum".to_string(),
            "https://x/two-sum".to_string(),
            0,
            1.0,
            solved_at(),
        );
        problem.difficulty_score = 6;
        problem.difficulty_level = DifficultyLevel::Hard;

        problem.refresh_difficulty();

        assert_eq!(problem.difficulty_score, 0);
        assert_eq!(problem.difficulty_level, DifficultyLevel::Easy);
    }

    #[test]
    fn test_schedule_and_is_due() {
        let mut problem = Problem::new(
            "prob-1".to_string(),
            "Two Sum".to_string(),
            "https://x/two-sum".to_string(),
            0,
            1.0,
            solved_at(),
        );

        problem.schedule(solved_at(), 3);
        assert_eq!(problem.next_revision_date, solved_at() + Duration::days(3));
        assert!(!problem.is_due(solved_at() + Duration::days(2)));
        assert!(problem.is_due(solved_at() + Duration::days(3)));
    }

    #[test]
    fn test_schedule_never_goes_backwards() {
        let mut problem = Problem::new(
            "prob-1".to_string(),
            "Two Sum".to_string(),
            "https://x/two-sum".to_string(),
            0,
            1.0,
            solved_at(),
        );

        problem.schedule(solved_at(), -4);
        assert_eq!(problem.next_revision_date, solved_at());
    }

    #[test]
    fn test_serializes_camel_case() {
        let problem = Problem::new(
            "prob-1".to_string(),
            "Two Sum".to_string(),
            "https://x/two-sum".to_string(),
            0,
            3.0,
            solved_at(),
        );
        let value = serde_json::to_value(&problem).unwrap();

        assert_eq!(value["timeInMinutes"], 3.0);
        assert_eq!(value["difficultyLevel"], "easy");
        assert_eq!(value["revisionCount"], 0);
        assert!(value["lastRevisedDate"].is_null());
        assert!(value["revisionHistory"].as_array().unwrap().is_empty());
    }
}
