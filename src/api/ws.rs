//! Endpoint WebSocket del tracking
//!
//! El handshake se resuelve antes del upgrade: sin credencial válida se
//! responde 401 y no se abre ningún socket.

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        FromRequestParts, Query, State,
    },
    http::{header, request::Parts},
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::models::auth::Identity;
use crate::realtime::OutboundEvent;
use crate::services::session_service::extract_credential;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct WsAuthQuery {
    pub token: Option<String>,
}

/// Identidad verificada en el handshake.
/// Se extrae antes que `WebSocketUpgrade`, así un rechazo es siempre 401.
pub struct HandshakeIdentity(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for HandshakeIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let query = Query::<WsAuthQuery>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();
        let credential = extract_credential(authorization, query.token.as_deref());

        state.sessions.authenticate(credential).await.map(HandshakeIdentity)
    }
}

/// GET /ws
pub async fn ws_handler(
    HandshakeIdentity(identity): HandshakeIdentity,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}

async fn handle_socket(socket: WebSocket, state: AppState, identity: Identity) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<OutboundEvent>(state.config.ws_outbound_buffer);

    let connection = state.sessions.open_session(identity, tx).await;
    let connection_id = connection.id();

    // Writer: vacía la cola de salida de esta conexión hacia el socket
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match event.to_json() {
                Ok(text) => text,
                Err(e) => {
                    warn!(connection = %connection_id, "⚠️ {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => state.controller.handle_text(&connection, &text).await,
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => {
                debug!(connection = %connection_id, "Frame binario ignorado");
            }
            // Axum responde los ping automáticamente
            Ok(_) => {}
            Err(e) => {
                debug!(connection = %connection_id, "Error de socket: {}", e);
                break;
            }
        }
    }

    // Cleanup
    state.sessions.close_session(&connection).await;
    drop(connection);
    writer.abort();
}
