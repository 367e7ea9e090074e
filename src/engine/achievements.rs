//! Achievement tracker: per-activity counters and one-time threshold bonuses.
//!
//! Counter increment, bonus credit and the `bonus_claimed` flip commit in
//! the same write transaction. A crash can therefore never award points
//! without marking the bonus claimed (or the reverse), and concurrent
//! sessions cannot both observe `bonus_claimed == false` at the threshold.

use redb::{Database, ReadableTable};
use serde::Serialize;

use crate::db::tables;
use crate::engine::ledger;
use crate::error::Result;
use crate::models::{AchievementRecord, ActivityType};

/// Outcome of tracking one completed activity
#[derive(Debug, Clone, Serialize)]
pub struct ActivityOutcome {
    #[serde(rename = "activityType")]
    pub activity_type: ActivityType,
    #[serde(rename = "currentCount")]
    pub current_count: u32,
    #[serde(rename = "bonusClaimed")]
    pub bonus_claimed: bool,
    /// Bonus portion of this call's credit (0 unless the threshold was hit)
    #[serde(rename = "bonusPoints")]
    pub bonus_points: u32,
    /// Total points credited by this call (activity score + bonus)
    #[serde(rename = "pointsEarned")]
    pub points_earned: u32,
}

/// Track one completed activity for a user and credit its score
///
/// Upserts the (user, activity type) progress row, then credits
/// `base_points` plus the one-time threshold bonus (quiz at 30, game at 50)
/// through the ledger, all in one transaction.
///
/// Errors with `ProfileMissing` if the user has no profile row; in that
/// case nothing is written.
pub fn track_activity(
    db: &Database,
    user_id: &str,
    activity: ActivityType,
    base_points: u32,
    now: i64,
) -> Result<ActivityOutcome> {
    let write_txn = db.begin_write()?;
    let outcome = {
        let mut achievements = write_txn.open_table(tables::ACHIEVEMENTS)?;
        let mut profiles = ledger::open_profiles(&write_txn)?;

        // Fail before any write if the profile row is missing
        ledger::require_profile(&profiles, user_id)?;

        let mut record: AchievementRecord =
            match achievements.get((user_id, activity.as_str()))? {
                Some(bytes) => bincode::deserialize(bytes.value())?,
                None => AchievementRecord::new(now),
            };

        let bonus = record.record_activity(activity, now);

        let record_bytes = bincode::serialize(&record)?;
        achievements.insert((user_id, activity.as_str()), record_bytes.as_slice())?;

        let earned = base_points + bonus;
        if earned > 0 {
            ledger::credit(&mut profiles, user_id, earned)?;
        }

        ActivityOutcome {
            activity_type: activity,
            current_count: record.current_count,
            bonus_claimed: record.bonus_claimed,
            bonus_points: bonus,
            points_earned: earned,
        }
    };
    write_txn.commit()?;

    if outcome.bonus_points > 0 {
        tracing::info!(
            "Achievement bonus claimed by user {}: {} x{}, +{} points",
            user_id,
            outcome.activity_type.as_str(),
            outcome.current_count,
            outcome.bonus_points
        );
    }

    Ok(outcome)
}

/// Read the achievement progress rows for a user (one per activity type,
/// absent types reported as zero progress)
pub fn progress_snapshot(db: &Database, user_id: &str) -> Result<Vec<ActivityOutcome>> {
    let read_txn = db.begin_read()?;
    let achievements = read_txn.open_table(tables::ACHIEVEMENTS)?;

    let mut snapshot = Vec::with_capacity(ActivityType::ALL.len());
    for activity in ActivityType::ALL {
        let record: AchievementRecord = match achievements.get((user_id, activity.as_str()))? {
            Some(bytes) => bincode::deserialize(bytes.value())?,
            None => AchievementRecord::new(0),
        };
        snapshot.push(ActivityOutcome {
            activity_type: activity,
            current_count: record.current_count,
            bonus_claimed: record.bonus_claimed,
            bonus_points: 0,
            points_earned: 0,
        });
    }

    Ok(snapshot)
}
