use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::{ACTIVITY_POINTS, ERR_INVALID_USER_ID};
use crate::engine::{self, ActivityOutcome};
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Profile};
use crate::routes::validate_signed_request;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TrackActivityRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "activityType")]
    pub activity_type: ActivityType,
    pub signature: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct TrackActivityResponse {
    #[serde(flatten)]
    pub outcome: ActivityOutcome,
    /// Point total after this activity's credit
    pub points: u32,
}

/// Track a completed quiz or game
///
/// Called by the quiz/game completion handlers. Credits the activity's
/// base score plus any one-time threshold bonus in a single transaction,
/// and returns the refreshed progress for the presentation layer.
///
/// Not idempotent: a request that times out must not be retried blindly,
/// since a replay counts as another completed activity.
pub async fn track_activity(
    State(state): State<AppState>,
    Json(payload): Json<TrackActivityRequest>,
) -> Result<Json<TrackActivityResponse>> {
    if !Profile::validate_id(&payload.user_id) {
        return Err(AppError::InvalidInput(ERR_INVALID_USER_ID.to_string()));
    }

    // Signature covers both the user and the activity being scored
    let signed_data = format!("{}:{}", payload.user_id, payload.activity_type.as_str());
    validate_signed_request(
        &signed_data,
        &payload.signature,
        payload.timestamp,
        &state.config.app_secret_key,
    )?;

    let db = state.db.clone();
    let user_id = payload.user_id.clone();
    let activity = payload.activity_type;

    let response = tokio::task::spawn_blocking(move || -> Result<TrackActivityResponse> {
        let outcome = engine::track_activity(
            &db,
            &user_id,
            activity,
            ACTIVITY_POINTS,
            Utc::now().timestamp(),
        )?;

        let profile =
            engine::ledger::fetch_profile(&db, &user_id)?.ok_or(AppError::ProfileMissing)?;

        Ok(TrackActivityResponse {
            outcome,
            points: profile.points,
        })
    })
    .await??;

    tracing::info!(
        "Activity tracked for user {}: {} (+{} points)",
        payload.user_id,
        payload.activity_type.as_str(),
        response.outcome.points_earned
    );

    Ok(Json(response))
}
