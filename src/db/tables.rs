use redb::TableDefinition;

/// Profiles table: user_id -> ProfileRecord (serialized)
/// One row per user, created at registration. Holds the point total and
/// the streak fields owned by the streak engine.
pub const PROFILES: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

/// Daily logins table: (user_id, "YYYY-MM-DD") -> DailyLoginRecord (serialized)
/// Key uniqueness enforces at most one login credit per user per calendar
/// day. Rows are immutable once written.
pub const DAILY_LOGINS: TableDefinition<(&str, &str), &[u8]> =
    TableDefinition::new("daily_logins");

/// Achievements table: (user_id, activity_type) -> AchievementRecord (serialized)
/// One row per user per activity type, upserted on every tracked activity.
pub const ACHIEVEMENTS: TableDefinition<(&str, &str), &[u8]> =
    TableDefinition::new("achievements");
