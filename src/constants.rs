/// Points awarded for the first login of a calendar day
pub const DAILY_LOGIN_POINTS: u32 = 10;

/// Streak length that triggers the one-time milestone bonus
/// Evaluated at exact equality only, never as ">=", so a tampered streak
/// that skips this value does not trigger it retroactively
pub const STREAK_MILESTONE_DAYS: u32 = 30;

/// Extra points added on top of the daily reward when the streak
/// reaches exactly STREAK_MILESTONE_DAYS (10 + 40 = 50 total that day)
pub const STREAK_MILESTONE_BONUS_POINTS: u32 = 40;

/// Points awarded per completed quiz or game
pub const ACTIVITY_POINTS: u32 = 10;

/// Completed-quiz count that triggers the one-time quiz achievement bonus
pub const QUIZ_BONUS_THRESHOLD: u32 = 30;

/// Completed-game count that triggers the one-time game achievement bonus
pub const GAME_BONUS_THRESHOLD: u32 = 50;

/// One-time bonus for crossing an achievement threshold (same for both types)
pub const ACHIEVEMENT_BONUS_POINTS: u32 = 50;

/// Maximum age of a request timestamp in seconds (5 minutes)
/// Prevents replay attacks
pub const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for invalid user ID format
pub const ERR_INVALID_USER_ID: &str = "Invalid user ID format";

/// Error message for timestamp validation failure
pub const ERR_INVALID_TIMESTAMP: &str = "Timestamp too old or in the future";
