use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    middleware::BearerToken,
    models::RecommendationResponse,
    services::recommendations,
};

use super::AppState;

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> AppResult<Json<RecommendationResponse>> {
    let history = state.connector.connect(&token);
    let result = recommendations::recommend(history.as_ref(), state.corpus.as_ref()).await?;
    Ok(Json(RecommendationResponse::from(result)))
}
