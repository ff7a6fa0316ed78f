//! Revision interval policies
//!
//! Two formulas for the same spaced-repetition idea exist. A scheduler picks
//! exactly one and uses it for both first scheduling and every reschedule.
//!
//! Score tier (`score-tier`):
//! - base days `[1, 3, 7, 14, 30, 90]` indexed by `min(revision_count, 5)`
//! - easy x1.0, medium x0.8, hard x0.6 (rounded up)
//!
//! Mistake tier (`mistake-tier`, default):
//! - base days 7 (no mistakes), 3 (1-5 mistakes), 1 (6+ mistakes)
//! - quick solves (<= 2 min) x1.2, slow solves (> 15 min) x0.8 (rounded up)
//! - progressive multiplier `[1, 1.5, 2, 3, 5, 7]` by `min(revision_count, 5)`
//! - result clamped to [1, 90] days

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{DifficultyLevel, Problem};

/// Base days for the score-tier policy
pub const SCORE_TIER_BASE_DAYS: [i64; 6] = [1, 3, 7, 14, 30, 90];

/// Progressive multipliers for the mistake-tier policy
pub const PROGRESSIVE_MULTIPLIERS: [f64; 6] = [1.0, 1.5, 2.0, 3.0, 5.0, 7.0];

pub const MIN_INTERVAL_DAYS: i64 = 1;
pub const MAX_INTERVAL_DAYS: i64 = 90;

/// Upper bound on how many future revisions are projected at once
pub const MAX_PROJECTED_REVISIONS: usize = 365;

/// Which interval formula a scheduler uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntervalPolicy {
    /// Fixed ladder scaled by difficulty level
    ScoreTier,
    /// Base from mistakes and time, grown by revision count
    #[default]
    MistakeTier,
}

impl IntervalPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalPolicy::ScoreTier => "score-tier",
            IntervalPolicy::MistakeTier => "mistake-tier",
        }
    }

    /// Days until the next revision after `revision_count` successful revisions
    pub fn interval_days(&self, problem: &Problem, revision_count: u32) -> i64 {
        match self {
            IntervalPolicy::ScoreTier => score_tier_days(problem.difficulty_level, revision_count),
            IntervalPolicy::MistakeTier => {
                mistake_tier_days(problem.mistakes, problem.time_in_minutes, revision_count)
            }
        }
    }

    /// Days until the next revision after a revision that did not go well
    ///
    /// Restarts the ladder; the score tier also assumes the problem is hard.
    pub fn lapse_interval_days(&self, problem: &Problem) -> i64 {
        match self {
            IntervalPolicy::ScoreTier => score_tier_days(DifficultyLevel::Hard, 0),
            IntervalPolicy::MistakeTier => mistake_tier_days(problem.mistakes, problem.time_in_minutes, 0),
        }
    }

    /// Upcoming revision dates if every revision from now on is easy
    ///
    /// The first date is the one already scheduled. At most
    /// `MAX_PROJECTED_REVISIONS` dates are returned, and the projection stops
    /// at the last representable date.
    pub fn projected_revisions(&self, problem: &Problem, count: usize) -> Vec<DateTime<Utc>> {
        let mut dates = Vec::new();
        let mut date = Some(problem.next_revision_date);
        let mut revision_count = problem.revision_count;

        for _ in 0..count.min(MAX_PROJECTED_REVISIONS) {
            let Some(current) = date else { break };
            dates.push(current);
            revision_count = revision_count.saturating_add(1);
            date = current.checked_add_signed(Duration::days(self.interval_days(problem, revision_count)));
        }

        dates
    }
}

impl fmt::Display for IntervalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn ladder_index(revision_count: u32) -> usize {
    (revision_count as usize).min(SCORE_TIER_BASE_DAYS.len() - 1)
}

fn scale_up(days: i64, factor: f64) -> i64 {
    (days as f64 * factor).ceil() as i64
}

fn score_tier_days(level: DifficultyLevel, revision_count: u32) -> i64 {
    let base = SCORE_TIER_BASE_DAYS[ladder_index(revision_count)];
    match level {
        DifficultyLevel::Easy => base,
        DifficultyLevel::Medium => scale_up(base, 0.8),
        DifficultyLevel::Hard => scale_up(base, 0.6),
    }
}

/// Mistake-tier days before the progressive multiplier
pub fn mistake_tier_base_days(mistakes: u32, time_in_minutes: f64) -> i64 {
    let base = match mistakes {
        0 => 7,
        1..=5 => 3,
        _ => 1,
    };

    let adjusted = if time_in_minutes <= 2.0 {
        scale_up(base, 1.2)
    } else if time_in_minutes > 15.0 {
        scale_up(base, 0.8)
    } else {
        base
    };

    adjusted.clamp(MIN_INTERVAL_DAYS, MAX_INTERVAL_DAYS)
}

fn mistake_tier_days(mistakes: u32, time_in_minutes: f64, revision_count: u32) -> i64 {
    let base = mistake_tier_base_days(mistakes, time_in_minutes);
    let multiplier = PROGRESSIVE_MULTIPLIERS[ladder_index(revision_count)];
    scale_up(base, multiplier).clamp(MIN_INTERVAL_DAYS, MAX_INTERVAL_DAYS)
}
