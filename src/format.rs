//! Short human-readable renderings of revision dates.

use chrono::{DateTime, Utc};

/// How long ago `date` was, in the largest whole unit: `3h ago`, `2w ago`.
pub fn time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - date).num_hours();
    if hours < 1 {
        return "just now".to_string();
    }
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{}d ago", days);
    }

    let weeks = days / 7;
    if weeks < 4 {
        return format!("{}w ago", weeks);
    }

    format!("{}mo ago", days / 30)
}

/// Calendar-relative label for an upcoming date.
///
/// Within the next week this reads `Today`, `Tomorrow` or `In N days`;
/// anything else prints as `YYYY-MM-DD`.
pub fn relative_day(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (date.date_naive() - now.date_naive()).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        2..=7 => format!("In {} days", days),
        _ => date.format("%Y-%m-%d").to_string(),
    }
}
