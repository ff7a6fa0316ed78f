//! ID generation for tracked problems

use chrono::{DateTime, Utc};
use rand::Rng;

/// Generate a unique problem ID
///
/// Format: `prob-{timestamp_ms}-{random_hex}`
/// Example: `prob-1738300800123-a1b2c3d4`
pub fn generate_problem_id(now: DateTime<Utc>) -> String {
    let random: u32 = rand::rng().random();
    format!("prob-{}-{:08x}", now.timestamp_millis(), random)
}
