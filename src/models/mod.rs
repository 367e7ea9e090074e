pub mod achievement;
pub mod daily_login;
pub mod profile;

pub use achievement::{AchievementRecord, ActivityType};
pub use daily_login::DailyLoginRecord;
pub use profile::{Profile, ProfileRecord};
