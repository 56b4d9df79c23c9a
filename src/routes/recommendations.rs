use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
};

/// Handler for `POST /api/recommend`
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload?;

    tracing::info!(
        request_id = %request_id,
        model = request.variant().label(),
        "Processing recommendation request"
    );

    let response = state.recommender.recommend(&request).await?;

    tracing::info!(
        request_id = %request_id,
        items = response.recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(response))
}
