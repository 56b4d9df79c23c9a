use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{LoginRequest, SignupRequest},
    routes::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i32,
    pub name: String,
}

/// Handler for `POST /api/signup`
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(request) = payload?;
    state.accounts.signup(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}

/// Handler for `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(request) = payload?;
    let account = state
        .accounts
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user_id: account.user_id,
        name: account.name,
    }))
}
