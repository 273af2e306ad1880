//! Daily activity streaks.
//!
//! A streak counts consecutive calendar days (UTC) with at least one
//! completed lesson.

use chrono::NaiveDate;

/// Streak value after activity on `today`.
///
/// - Activity on consecutive days increments the streak.
/// - A second activity on the same day leaves it unchanged.
/// - A gap of more than one day, or no previous activity, restarts it at 1.
pub fn next_streak(current: u32, last_active: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(last) = last_active else {
        return 1;
    };

    match (today - last).num_days() {
        0 => current.max(1),
        1 => current.saturating_add(1),
        _ => 1,
    }
}
