use axum::{extract::State, Json};
use chrono::Utc;
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::constants::ERR_INVALID_USER_ID;
use crate::db::tables;
use crate::error::{AppError, Result};
use crate::models::{Profile, ProfileRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
}

/// Register a new user profile
///
/// Creates the Profile row for a user ID issued by the identity provider,
/// with zero points, zero streak and no login history. Account creation
/// owns this step; the reward engines assume the row exists.
///
/// Returns 409 Conflict if the profile already exists.
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    if !Profile::validate_id(&payload.user_id) {
        tracing::warn!("Invalid user ID format: {}", payload.user_id);
        return Err(AppError::InvalidInput(ERR_INVALID_USER_ID.to_string()));
    }

    let db = state.db.clone();
    let user_id = payload.user_id.clone();

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write()?;
        {
            let mut profiles = write_txn.open_table(tables::PROFILES)?;

            if profiles.get(user_id.as_str())?.is_some() {
                tracing::info!("Profile already exists for user {}", user_id);
                return Err(AppError::ProfileExists);
            }

            let record = ProfileRecord::new(Utc::now().timestamp());
            let bytes = bincode::serialize(&record)?;
            profiles.insert(user_id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;

        tracing::info!("New profile registered for user {}", user_id);
        Ok(())
    })
    .await??;

    Ok(Json(RegisterResponse { success: true }))
}
