use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Profile record stored in redb
///
/// The single per-user row holding the point accumulator and the streak
/// fields. Streak fields are mutated only by the streak engine; `points`
/// only ever increases, via additive credits through the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Total points earned (non-negative, additive updates only)
    pub points: u32,
    /// Consecutive calendar days with at least one recorded login
    pub current_streak: u32,
    /// Calendar date (UTC) of the most recent credited login, unset until
    /// the first login
    pub last_login_date: Option<NaiveDate>,
    /// When the profile was created (Unix timestamp)
    pub created_at: i64,
}

impl ProfileRecord {
    /// Create a fresh profile with no points and no login history
    pub fn new(now: i64) -> Self {
        Self {
            points: 0,
            current_streak: 0,
            last_login_date: None,
            created_at: now,
        }
    }
}

/// Profile model for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Stable user identifier issued by the identity provider
    #[serde(rename = "userId")]
    pub user_id: String,
    pub points: u32,
    #[serde(rename = "currentStreak")]
    pub current_streak: u32,
    #[serde(rename = "lastLoginDate")]
    pub last_login_date: Option<NaiveDate>,
}

impl Profile {
    /// Validate a user ID: 1-128 chars of [A-Za-z0-9_-]
    ///
    /// The identity provider issues opaque stable identifiers; this only
    /// guards against garbage keys ending up in the store.
    pub fn validate_id(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= 128
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn from_record(user_id: &str, record: &ProfileRecord) -> Self {
        Self {
            user_id: user_id.to_string(),
            points: record.points,
            current_streak: record.current_streak,
            last_login_date: record.last_login_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(Profile::validate_id("user-123"));
        assert!(Profile::validate_id("a"));
        assert!(Profile::validate_id(
            "550e8400_e29b_41d4_a716_446655440000"
        ));

        // Empty
        assert!(!Profile::validate_id(""));

        // Too long
        assert!(!Profile::validate_id(&"a".repeat(129)));

        // Invalid characters
        assert!(!Profile::validate_id("user 123"));
        assert!(!Profile::validate_id("user@example"));
    }

    #[test]
    fn test_new_profile() {
        let profile = ProfileRecord::new(1733788800);

        assert_eq!(profile.points, 0);
        assert_eq!(profile.current_streak, 0);
        assert!(profile.last_login_date.is_none());
        assert_eq!(profile.created_at, 1733788800);
    }

    #[test]
    fn test_profile_record_serialization() {
        let record = ProfileRecord {
            points: 150,
            current_streak: 7,
            last_login_date: NaiveDate::from_ymd_opt(2024, 12, 9),
            created_at: 1733788800,
        };

        // Verify bincode serialization round-trips
        let bytes = bincode::serialize(&record).unwrap();
        let deserialized: ProfileRecord = bincode::deserialize(&bytes).unwrap();

        assert_eq!(record.points, deserialized.points);
        assert_eq!(record.current_streak, deserialized.current_streak);
        assert_eq!(record.last_login_date, deserialized.last_login_date);
    }
}
