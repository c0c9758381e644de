use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::BearerToken,
    models::{SeedTrack, TimeWindow},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct TopTracksQuery {
    #[serde(default)]
    pub window: TimeWindow,
}

#[derive(Debug, Serialize)]
pub struct TopTracksResponse {
    pub window: TimeWindow,
    pub tracks: Vec<SeedTrack>,
}

/// Handler returning the caller's raw top tracks for one window
pub async fn top_tracks(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<TopTracksQuery>,
) -> AppResult<Json<TopTracksResponse>> {
    let history = state.connector.connect(&token);
    let tracks = history.fetch_top_tracks(query.window).await?;

    tracing::info!(
        window = %query.window,
        tracks = tracks.len(),
        provider = history.name(),
        "Fetched top tracks"
    );

    Ok(Json(TopTracksResponse {
        window: query.window,
        tracks,
    }))
}
