use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::constants::ERR_INVALID_USER_ID;
use crate::engine::{self, ActivityOutcome};
use crate::error::{AppError, Result};
use crate::models::Profile;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProgressParams {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub achievements: Vec<ActivityOutcome>,
}

/// Read accessor for a user's reward state
///
/// Returns the profile (points, streak, last login) and the achievement
/// progress rows. Read-only; the presentation layer polls this after
/// tracked activities.
pub async fn get_progress(
    State(state): State<AppState>,
    Query(params): Query<ProgressParams>,
) -> Result<Json<ProgressResponse>> {
    if !Profile::validate_id(&params.user_id) {
        return Err(AppError::InvalidInput(ERR_INVALID_USER_ID.to_string()));
    }

    let db = state.db.clone();
    let user_id = params.user_id.clone();

    let response = tokio::task::spawn_blocking(move || -> Result<ProgressResponse> {
        let record =
            engine::ledger::fetch_profile(&db, &user_id)?.ok_or(AppError::ProfileMissing)?;
        let achievements = engine::achievements::progress_snapshot(&db, &user_id)?;

        Ok(ProgressResponse {
            profile: Profile::from_record(&user_id, &record),
            achievements,
        })
    })
    .await??;

    Ok(Json(response))
}
