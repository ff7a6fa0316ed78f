//! Outbound reminders: calendar deep links and task payloads.
//!
//! Nothing here performs I/O; callers push the values wherever they like.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Problem;

pub const CALENDAR_BASE_URL: &str = "https://calendar.google.com/calendar/render";

/// Length of the reminder window starting at the revision date
pub const REMINDER_WINDOW_MINUTES: i64 = 60;

/// Everything an external task or calendar API needs for one revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionTask {
    pub problem_id: String,
    pub title: String,
    pub link: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub details: String,
    /// 1-based number of the revision this task is for
    pub revision_number: u32,
}

impl RevisionTask {
    pub fn for_problem(problem: &Problem) -> Self {
        let start = problem.next_revision_date;
        Self {
            problem_id: problem.id.clone(),
            title: reminder_title(problem),
            link: problem.link.clone(),
            start,
            end: start
                .checked_add_signed(Duration::minutes(REMINDER_WINDOW_MINUTES))
                .unwrap_or(start),
            details: reminder_details(problem),
            revision_number: problem.revision_count.saturating_add(1),
        }
    }
}

pub fn reminder_title(problem: &Problem) -> String {
    format!("Review {}", problem.name)
}

pub fn reminder_details(problem: &Problem) -> String {
    format!(
        "Problem Link: {}\n\nDifficulty: {}\nMistakes made: {}\nTime taken: {} minutes\n\nRevision #{}",
        problem.link,
        problem.difficulty_level,
        problem.mistakes,
        problem.time_in_minutes,
        problem.revision_count.saturating_add(1)
    )
}

/// Compact UTC stamp used in calendar URLs, e.g. `20250308T090000Z`
pub fn calendar_timestamp(date: DateTime<Utc>) -> String {
    date.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Google Calendar "add event" link for the problem's next revision
pub fn calendar_link(problem: &Problem) -> String {
    let task = RevisionTask::for_problem(problem);
    format!(
        "{}?action=TEMPLATE&text={}&dates={}/{}&details={}&location={}",
        CALENDAR_BASE_URL,
        urlencoding::encode(&task.title),
        calendar_timestamp(task.start),
        calendar_timestamp(task.end),
        urlencoding::encode(&task.details),
        urlencoding::encode(&task.link)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn problem() -> Problem {
        let solved = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut problem = Problem::new(
            "prob-1".to_string(),
            "Two Sum".to_string(),
            "https://x/two-sum".to_string(),
            1,
            4.5,
            solved,
        );
        problem.schedule(solved, 7);
        problem
    }

    #[test]
    fn test_calendar_timestamp() {
        let date = Utc.with_ymd_and_hms(2025, 3, 8, 9, 5, 7).unwrap();
        assert_eq!(calendar_timestamp(date), "20250308T090507Z");
    }

    #[test]
    fn test_details_content() {
        let details = reminder_details(&problem());
        assert_eq!(
            details,
            "Problem Link: https://x/two-sum\n\nDifficulty: easy\nMistakes made: 1\nTime taken: 4.5 minutes\n\nRevision #1"
        );
    }

    #[test]
    fn test_whole_minutes_print_without_fraction() {
        let mut p = problem();
        p.time_in_minutes = 3.0;
        assert!(reminder_details(&p).contains("Time taken: 3 minutes"));
    }

    #[test]
    fn test_task_window() {
        let task = RevisionTask::for_problem(&problem());
        assert_eq!(task.title, "Review Two Sum");
        assert_eq!(task.start, Utc.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).unwrap());
        assert_eq!(task.end - task.start, Duration::hours(1));
        assert_eq!(task.revision_number, 1);
    }

    #[test]
    fn test_calendar_link() {
        let link = calendar_link(&problem());

        assert!(link.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE&"));
        assert!(link.contains("&text=Review%20Two%20Sum&"));
        assert!(link.contains("&dates=20250308T090000Z/20250308T100000Z&"));
        assert!(link.contains("Revision%20%231"));
        assert!(link.ends_with("&location=https%3A%2F%2Fx%2Ftwo-sum"));
    }

    #[test]
    fn test_task_at_last_date_has_empty_window() {
        let mut p = problem();
        p.next_revision_date = DateTime::<Utc>::MAX_UTC;

        let task = RevisionTask::for_problem(&p);
        assert_eq!(task.end, task.start);
    }

    #[test]
    fn test_revision_number_follows_count() {
        let mut p = problem();
        p.revision_count = 2;
        assert!(calendar_link(&p).contains("Revision%20%233"));
    }
}
