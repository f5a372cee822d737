use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, auth::repo::User, error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub preferences: serde_json::Value,
    pub allergies: serde_json::Value,
    pub household_size: Option<i32>,
    pub weekly_budget: Option<f64>,
    pub message_count: i64,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub preferences: Option<serde_json::Value>,
    pub allergies: Option<serde_json::Value>,
    pub household_size: Option<i32>,
    pub weekly_budget: Option<f64>,
}

fn to_response(user: User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        email: user.email,
        preferences: user.preferences,
        allergies: user.allergies,
        household_size: user.household_size,
        weekly_budget: user.weekly_budget,
        message_count: user.message_count,
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let record = User::find_by_id(&state.db, user.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(to_response(record)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let current = User::find_by_id(&state.db, user.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let preferences = payload.preferences.unwrap_or(current.preferences);
    let allergies = payload.allergies.unwrap_or(current.allergies);
    let household_size = payload.household_size.or(current.household_size);
    let weekly_budget = payload.weekly_budget.or(current.weekly_budget);

    let updated = User::update_profile(
        &state.db,
        user.user_id,
        &preferences,
        &allergies,
        household_size,
        weekly_budget,
    )
    .await?
    .ok_or(AppError::NotFound("User"))?;

    info!(user_id = %updated.id, "profile updated");
    Ok(Json(to_response(updated)))
}
