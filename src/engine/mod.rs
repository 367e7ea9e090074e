//! Reward bookkeeping engines
//!
//! All mutation of profiles, daily-login records and achievement progress
//! flows through these modules. Each operation runs inside a single redb
//! write transaction, which is exclusive, so a check-then-insert sequence
//! here cannot interleave with another session's writes.

pub mod achievements;
pub mod ledger;
pub mod streak;

pub use achievements::{track_activity, ActivityOutcome};
pub use streak::{record_daily_login, LoginReward};
