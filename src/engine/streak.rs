//! Streak engine: daily-login continuation, reset and the 30-day bonus.
//!
//! Sole owner of the `current_streak` / `last_login_date` transition. The
//! whole check-insert-credit sequence runs in one exclusive write
//! transaction, so two sessions for the same user racing on the same day
//! cannot both credit: the loser observes the winner's login row and takes
//! the idempotent already-logged-in path.

use chrono::NaiveDate;
use redb::{Database, ReadableTable};
use serde::Serialize;

use crate::constants::{DAILY_LOGIN_POINTS, STREAK_MILESTONE_BONUS_POINTS, STREAK_MILESTONE_DAYS};
use crate::db::tables;
use crate::engine::ledger;
use crate::error::Result;
use crate::models::daily_login::{login_date_key, DailyLoginRecord};

/// Outcome of a daily-login attempt
#[derive(Debug, Clone, Serialize)]
pub struct LoginReward {
    /// Points credited by this call (0 when the day was already credited)
    #[serde(rename = "pointsEarned")]
    pub points_earned: u32,
    /// The user's streak after this call
    #[serde(rename = "streakCount")]
    pub streak_count: u32,
    /// False when a login was already credited for this calendar day
    #[serde(rename = "isNewLogin")]
    pub is_new_login: bool,
}

/// Compute the streak value a login on `today` produces
///
/// Continues (+1) only when the previous login was exactly yesterday.
/// Everything else resets to 1: first-ever login, a gap of two or more
/// days, or a `last_login_date` in the future from clock skew.
pub fn next_streak(
    last_login_date: Option<NaiveDate>,
    current_streak: u32,
    today: NaiveDate,
) -> u32 {
    match last_login_date {
        Some(last) if last.succ_opt() == Some(today) => current_streak + 1,
        _ => 1,
    }
}

/// Points for a login that lands on the given streak value
///
/// 10 base points, plus the one-time 40-point bonus exactly at streak 30.
/// Exact equality, never ">=": the +1 increments make skipping 30
/// impossible in normal operation, and a tampered streak that jumps past
/// it earns no retroactive bonus.
pub fn login_points(streak: u32) -> u32 {
    if streak == STREAK_MILESTONE_DAYS {
        DAILY_LOGIN_POINTS + STREAK_MILESTONE_BONUS_POINTS
    } else {
        DAILY_LOGIN_POINTS
    }
}

/// Record a daily login for `user_id` on `today` and credit the reward
///
/// Idempotent per (user, calendar day): if a login row already exists the
/// call returns `is_new_login: false` with zero points and mutates
/// nothing. The caller supplies `today` (UTC at the route layer) and
/// `now`, the wall-clock timestamp stored on the login row.
///
/// Errors with `ProfileMissing` if the user has no profile row.
pub fn record_daily_login(
    db: &Database,
    user_id: &str,
    today: NaiveDate,
    now: i64,
) -> Result<LoginReward> {
    let date_key = login_date_key(today);

    let write_txn = db.begin_write()?;
    let reward = {
        let mut logins = write_txn.open_table(tables::DAILY_LOGINS)?;
        let mut profiles = ledger::open_profiles(&write_txn)?;

        let mut profile = ledger::require_profile(&profiles, user_id)?;

        let already_logged = logins.get((user_id, date_key.as_str()))?.is_some();
        if already_logged {
            // Same-day duplicate (second tab, retry, re-render). No mutation;
            // report the streak as it stands.
            LoginReward {
                points_earned: 0,
                streak_count: profile.current_streak,
                is_new_login: false,
            }
        } else {
            let new_streak = next_streak(profile.last_login_date, profile.current_streak, today);
            let points = login_points(new_streak);

            let login_record = DailyLoginRecord::new(now);
            let login_bytes = bincode::serialize(&login_record)?;
            logins.insert((user_id, date_key.as_str()), login_bytes.as_slice())?;

            profile.current_streak = new_streak;
            profile.last_login_date = Some(today);
            profile.points = profile.points.saturating_add(points);
            ledger::store_profile(&mut profiles, user_id, &profile)?;

            LoginReward {
                points_earned: points,
                streak_count: new_streak,
                is_new_login: true,
            }
        }
    };
    write_txn.commit()?;

    if reward.is_new_login {
        tracing::info!(
            "Daily login credited for user {}: streak {}, +{} points",
            user_id,
            reward.streak_count,
            reward.points_earned
        );
    }

    Ok(reward)
}
