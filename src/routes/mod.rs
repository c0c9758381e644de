use std::sync::Arc;

use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::CorpusStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::providers::HistoryConnector,
};

pub mod recommendations;
pub mod top_tracks;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<dyn HistoryConnector>,
    pub corpus: Arc<dyn CorpusStore>,
}

impl AppState {
    pub fn new(connector: Arc<dyn HistoryConnector>, corpus: Arc<dyn CorpusStore>) -> Self {
        Self { connector, corpus }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route("/top-tracks", get(top_tracks::top_tracks))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
