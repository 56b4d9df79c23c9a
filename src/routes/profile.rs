use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::Profile,
    routes::AppState,
};

/// An id that cannot name any account is reported like a missing account
fn user_id(path: Result<Path<i32>, PathRejection>) -> AppResult<i32> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::NotFound("User not found".to_string()))
}

/// Handler for `GET /api/profile/:user_id`
pub async fn get_profile(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Profile>> {
    let profile = state.profiles.get_profile(user_id(path)?).await?;
    Ok(Json(profile))
}

/// Handler for `PUT /api/profile/:user_id`
pub async fn update_profile(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Profile>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let user_id = user_id(path)?;
    let Json(profile) = payload?;
    state.profiles.update_profile(user_id, profile).await?;

    Ok(Json(json!({ "message": "Profile updated successfully" })))
}
