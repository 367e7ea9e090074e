use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily login record stored in redb
///
/// Keyed by (user_id, calendar date) in the daily_logins table; the key
/// carries the identifying data, so the value only records when the credit
/// happened. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLoginRecord {
    /// When the login was credited (Unix timestamp)
    pub logged_at: i64,
}

impl DailyLoginRecord {
    pub fn new(now: i64) -> Self {
        Self { logged_at: now }
    }
}

/// Format a calendar date as the table key component ("YYYY-MM-DD")
///
/// ISO-8601 dates sort lexicographically, so per-user login rows stay in
/// chronological order under redb's ordered keys.
pub fn login_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
