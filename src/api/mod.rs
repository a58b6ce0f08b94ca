//! API endpoints
//!
//! Este módulo contiene los endpoints HTTP/WebSocket del servicio.

pub mod health;
pub mod ws;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(health::health))
}
