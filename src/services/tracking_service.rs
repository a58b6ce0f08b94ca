//! Tracking en vivo de rutas
//!
//! Snapshot al unirse a una ruta, ingesta de posición con cálculo de ETA y
//! la máquina de estados de waypoints. Toda escritura sobre una ruta pasa por
//! su lock (`RouteLocks`) y se persiste con compare-and-swap de versión.
//! Los errores nunca se publican al topic: el llamador los envía solo a la
//! conexión de origen.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

use super::geo_service::{distance_meters, eta_minutes};
use super::route_locks::RouteLocks;
use crate::dto::tracking_dto::{
    CompleteWaypointRequest, LocationUpdateEvent, RouteSnapshot, UpdateLocationRequest,
    WaypointCompletedEvent,
};
use crate::models::route::{Route, WaypointStatus};
use crate::realtime::{BroadcastDispatcher, ConnectionHandle, ServerEvent, TopicKey, TopicRegistry};
use crate::repositories::RouteStore;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

#[derive(Clone)]
pub struct TrackingService {
    store: Arc<dyn RouteStore>,
    registry: TopicRegistry,
    dispatcher: BroadcastDispatcher,
    locks: Arc<RouteLocks>,
    avg_speed_kmh: f64,
}

impl TrackingService {
    pub fn new(
        store: Arc<dyn RouteStore>,
        registry: TopicRegistry,
        dispatcher: BroadcastDispatcher,
        avg_speed_kmh: f64,
    ) -> Self {
        Self {
            store,
            registry,
            dispatcher,
            locks: Arc::new(RouteLocks::new()),
            avg_speed_kmh,
        }
    }

    /// `track_route`: unir la conexión a `route:<routeId>` y enviarle el snapshot.
    /// Lectura, join y encolado del snapshot van bajo el lock de la ruta: ninguna
    /// escritura puede quedar entre el snapshot y el primer broadcast recibido.
    pub async fn track_route(&self, connection: &ConnectionHandle, route_id: &str) -> AppResult<RouteSnapshot> {
        let _write = self.locks.acquire(route_id).await;
        let route = self.load_route(route_id).await?;

        self.registry.join(TopicKey::route(route_id), connection).await;

        let snapshot = RouteSnapshot::from(route);
        connection.send(ServerEvent::RouteData(snapshot.clone())).await;

        info!(connection = %connection.id(), route_id, "👀 Siguiendo ruta");
        Ok(snapshot)
    }

    /// `stop_tracking`: salir del topic de la ruta. Idempotente.
    pub async fn stop_tracking(&self, connection: &ConnectionHandle, route_id: &str) {
        self.registry
            .leave(&TopicKey::route(route_id), connection.id())
            .await;
        debug!(connection = %connection.id(), route_id, "stop_tracking");
    }

    /// `update_location`: persistir la posición del hauler y publicar la ETA
    /// hacia la siguiente waypoint pending
    pub async fn report_location(
        &self,
        connection: &ConnectionHandle,
        request: UpdateLocationRequest,
    ) -> AppResult<LocationUpdateEvent> {
        request.validate()?;
        let route_id = request.route_id.as_str();

        let _write = self.locks.acquire(route_id).await;
        let mut route = self.load_route(route_id).await?;
        self.ensure_writable(&route, connection)?;

        let now = Utc::now();
        route.current_location = Some(request.location);
        route.last_location_update = Some(now);
        let route = self.store.update_route(&route).await?;

        let (eta, next_waypoint_address) = match route.next_pending_waypoint() {
            Some((_, waypoint)) => {
                let distance = distance_meters(&request.location, &waypoint.location);
                (
                    Some(eta_minutes(distance, self.avg_speed_kmh)),
                    Some(waypoint.address.clone()),
                )
            }
            None => (None, None),
        };

        let event = LocationUpdateEvent {
            route_id: route.route_id.clone(),
            location: request.location,
            timestamp: now,
            eta,
            next_waypoint_address,
        };

        self.dispatcher
            .publish(&TopicKey::route(route_id), ServerEvent::LocationUpdate(event.clone()))
            .await;

        Ok(event)
    }

    /// `complete_waypoint`: pending/in_progress -> completed.
    /// Un índice fuera de rango, o una waypoint ya completed/skipped, no hace
    /// nada y devuelve `None` (sin escritura ni broadcast).
    pub async fn complete_waypoint(
        &self,
        connection: &ConnectionHandle,
        request: CompleteWaypointRequest,
    ) -> AppResult<Option<WaypointCompletedEvent>> {
        request.validate()?;
        let route_id = request.route_id.as_str();

        let _write = self.locks.acquire(route_id).await;
        let mut route = self.load_route(route_id).await?;
        self.ensure_writable(&route, connection)?;

        let Some(index) = usize::try_from(request.waypoint_index)
            .ok()
            .filter(|index| *index < route.waypoints.len())
        else {
            debug!(route_id, index = request.waypoint_index, "Índice de waypoint fuera de rango, ignorado");
            return Ok(None);
        };

        let waypoint = &mut route.waypoints[index];
        if !waypoint.can_complete() {
            debug!(route_id, index, status = ?waypoint.status, "Waypoint no completable, ignorada");
            return Ok(None);
        }
        waypoint.status = WaypointStatus::Completed;
        waypoint.actual_time = Some(Utc::now());
        let address = waypoint.address.clone();

        self.store.update_route(&route).await?;

        let event = WaypointCompletedEvent {
            route_id: route.route_id.clone(),
            waypoint_index: index,
            address,
        };

        self.dispatcher
            .publish(&TopicKey::route(route_id), ServerEvent::WaypointCompleted(event.clone()))
            .await;

        info!(route_id, index, "✅ Waypoint completada");
        Ok(Some(event))
    }

    async fn load_route(&self, route_id: &str) -> AppResult<Route> {
        self.store
            .find_route_by_id(route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", route_id))
    }

    /// Solo el hauler escribe, y solo mientras la ruta no esté cerrada
    fn ensure_writable(&self, route: &Route, connection: &ConnectionHandle) -> AppResult<()> {
        if !route.is_hauler(connection.identity().user_id) {
            return Err(AppError::Unauthorized(format!(
                "Not authorized to update route '{}'",
                route.route_id
            )));
        }
        if route.status.is_closed() {
            return Err(conflict_error("Route", &route.route_id, "is closed"));
        }
        Ok(())
    }
}
