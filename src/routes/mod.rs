pub mod activity;
pub mod admin;
pub mod health;
pub mod progress;
pub mod register;
pub mod session;
pub mod validation;

pub use activity::track_activity;
pub use admin::admin_stats;
pub use health::health_check;
pub use progress::get_progress;
pub use register::register_user;
pub use session::start_session;
pub use validation::validate_signed_request;
