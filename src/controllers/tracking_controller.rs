use tracing::debug;

use crate::realtime::{decode_client_event, ClientEvent, ConnectionHandle, ServerEvent};
use crate::services::tracking_service::TrackingService;
use crate::utils::errors::{AppError, AppResult};

/// Enruta los eventos de una conexión al servicio de tracking.
/// Cualquier error vuelve solo a la conexión que lo originó.
#[derive(Clone)]
pub struct TrackingController {
    tracking: TrackingService,
}

impl TrackingController {
    pub fn new(tracking: TrackingService) -> Self {
        Self { tracking }
    }

    /// Procesar un frame de texto tal como llega del socket
    pub async fn handle_text(&self, connection: &ConnectionHandle, text: &str) {
        match decode_client_event(text) {
            Ok(event) => self.handle_event(connection, event).await,
            Err(err) => self.reply_error(connection, &err).await,
        }
    }

    pub async fn handle_event(&self, connection: &ConnectionHandle, event: ClientEvent) {
        let event_name = event.name();
        debug!(connection = %connection.id(), event = event_name, "📨 Evento recibido");

        if let Err(err) = self.dispatch(connection, event).await {
            self.reply_error(connection, &err).await;
        }
    }

    async fn dispatch(&self, connection: &ConnectionHandle, event: ClientEvent) -> AppResult<()> {
        match event {
            ClientEvent::TrackRoute(route_id) => {
                self.tracking.track_route(connection, &route_id).await?;
            }
            ClientEvent::UpdateLocation(request) => {
                self.tracking.report_location(connection, request).await?;
            }
            ClientEvent::CompleteWaypoint(request) => {
                self.tracking.complete_waypoint(connection, request).await?;
            }
            ClientEvent::StopTracking(route_id) => {
                self.tracking.stop_tracking(connection, &route_id).await;
            }
        }
        Ok(())
    }

    async fn reply_error(&self, connection: &ConnectionHandle, err: &AppError) {
        connection.send(ServerEvent::error(err)).await;
    }
}
