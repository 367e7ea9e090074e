use serde::{Deserialize, Serialize};

use crate::constants::{ACHIEVEMENT_BONUS_POINTS, GAME_BONUS_THRESHOLD, QUIZ_BONUS_THRESHOLD};

/// Scored activity types tracked for achievements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Quiz,
    Game,
}

impl ActivityType {
    /// All tracked activity types, for building progress snapshots
    pub const ALL: [ActivityType; 2] = [ActivityType::Quiz, ActivityType::Game];

    /// Stable string form used as the achievements table key component
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Quiz => "quiz",
            ActivityType::Game => "game",
        }
    }

    /// Activity count at which the one-time bonus is granted
    pub fn bonus_threshold(&self) -> u32 {
        match self {
            ActivityType::Quiz => QUIZ_BONUS_THRESHOLD,
            ActivityType::Game => GAME_BONUS_THRESHOLD,
        }
    }
}

/// Achievement progress record stored in redb
///
/// One row per (user, activity type). `current_count` never decreases and
/// `bonus_claimed` only transitions false -> true; once true it gates all
/// future bonus credit for the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementRecord {
    /// Completed activities of this type (monotonically non-decreasing)
    pub current_count: u32,
    /// Whether the one-time threshold bonus has been awarded
    pub bonus_claimed: bool,
    /// Unix timestamp of the last mutation
    pub last_updated: i64,
}

impl AchievementRecord {
    /// Create an empty progress record (no activities, bonus unclaimed)
    pub fn new(now: i64) -> Self {
        Self {
            current_count: 0,
            bonus_claimed: false,
            last_updated: now,
        }
    }

    /// Register one completed activity and return the bonus points earned
    ///
    /// The bonus is granted only when the incremented count lands exactly on
    /// the threshold and the bonus has not been claimed before. A count that
    /// skips past the threshold (externally tampered) never triggers it
    /// retroactively.
    pub fn record_activity(&mut self, activity: ActivityType, now: i64) -> u32 {
        self.current_count += 1;
        self.last_updated = now;

        if !self.bonus_claimed && self.current_count == activity.bonus_threshold() {
            self.bonus_claimed = true;
            ACHIEVEMENT_BONUS_POINTS
        } else {
            0
        }
    }
}
