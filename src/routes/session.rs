use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::ERR_INVALID_USER_ID;
use crate::engine::{self, ActivityOutcome, LoginReward};
use crate::error::{AppError, Result};
use crate::models::Profile;
use crate::routes::validate_signed_request;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub signature: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    #[serde(flatten)]
    pub reward: LoginReward,
    /// True only when this call credited a fresh reward; the client shows
    /// the reward banner off this flag, never off pointsEarned alone
    #[serde(rename = "showRewardBanner")]
    pub show_reward_banner: bool,
    /// Point total after the login credit
    pub points: u32,
    /// Achievement progress snapshot, refreshed in the same call
    pub achievements: Vec<ActivityOutcome>,
}

/// Session-start hook: credit the daily login and return reward state
///
/// The client calls this exactly once per authenticated session, on the
/// transition from unauthenticated to authenticated. Retries and duplicate
/// tabs are harmless: the engine is idempotent per calendar day, so a
/// second call the same day returns `isNewLogin: false` with zero points.
///
/// The day boundary is UTC, fixed per deployment, so streaks behave the
/// same for every user regardless of device timezone.
pub async fn start_session(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>> {
    if !Profile::validate_id(&payload.user_id) {
        return Err(AppError::InvalidInput(ERR_INVALID_USER_ID.to_string()));
    }

    // Signature over the user ID proves the request came from the app
    validate_signed_request(
        &payload.user_id,
        &payload.signature,
        payload.timestamp,
        &state.config.app_secret_key,
    )?;

    let db = state.db.clone();
    let user_id = payload.user_id.clone();

    let response = tokio::task::spawn_blocking(move || -> Result<StartSessionResponse> {
        let now = Utc::now();
        let reward = engine::record_daily_login(
            &db,
            &user_id,
            now.date_naive(),
            now.timestamp(),
        )?;

        // Read-through refresh for the presentation layer
        let profile =
            engine::ledger::fetch_profile(&db, &user_id)?.ok_or(AppError::ProfileMissing)?;
        let achievements = engine::achievements::progress_snapshot(&db, &user_id)?;

        let show_reward_banner = reward.is_new_login && reward.points_earned > 0;

        Ok(StartSessionResponse {
            reward,
            show_reward_banner,
            points: profile.points,
            achievements,
        })
    })
    .await??;

    Ok(Json(response))
}
