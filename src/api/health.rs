use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub connections: usize,
    pub topics: usize,
    pub timestamp: String,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connections: state.registry.connection_count().await,
        topics: state.registry.topic_count().await,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
