#![allow(dead_code)]

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use collection_tracking::config::{EnvironmentConfig, StoreBackend};
use collection_tracking::models::auth::{Identity, IdentityRecord};
use collection_tracking::models::route::{GeoPoint, HaulerSummary, Route, Waypoint};
use collection_tracking::realtime::{ConnectionHandle, OutboundEvent, ServerEvent};
use collection_tracking::repositories::{InMemoryIdentityStore, InMemoryRouteStore, RouteStore};
use collection_tracking::state::AppState;

pub const ROUTE_ID: &str = "R-100";

pub fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        jwt_secret: "integration-secret".to_string(),
        jwt_expiration: 3600,
        cors_origins: Vec::new(),
        avg_speed_kmh: 30.0,
        ws_outbound_buffer: 32,
        store: StoreBackend::Memory { seed_path: None },
    }
}

pub struct TestApp {
    pub state: AppState,
    pub routes: InMemoryRouteStore,
    pub identities: InMemoryIdentityStore,
    pub hauler: Identity,
    pub dispatcher_user: Identity,
}

/// Conexión de prueba: el handle más el extremo receptor de su cola
pub struct TestClient {
    pub conn: ConnectionHandle,
    pub rx: mpsc::Receiver<OutboundEvent>,
}

impl TestClient {
    /// Eventos ya encolados, sin esperar
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push((*event).clone());
        }
        events
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_store(|routes| Arc::new(routes) as Arc<dyn RouteStore>).await
}

/// Igual que `spawn_app`, pero el servicio ve el store envuelto por `wrap`
pub async fn spawn_app_with_store<F>(wrap: F) -> TestApp
where
    F: FnOnce(InMemoryRouteStore) -> Arc<dyn RouteStore>,
{
    let routes = InMemoryRouteStore::new();
    let identities = InMemoryIdentityStore::new();

    let hauler = add_user(&identities, "Marta Gil").await;
    let dispatcher_user = add_user(&identities, "Pablo Ruiz").await;

    routes
        .insert(Route::planned(
            ROUTE_ID,
            HaulerSummary {
                id: hauler.user_id,
                name: hauler.display_name.clone(),
            },
            None,
            vec![
                Waypoint::pending("Calle Mayor 1", GeoPoint::new(0.0, 0.0)),
                Waypoint::pending("Plaza Nueva 7", GeoPoint::new(0.05, 0.05)),
            ],
        ))
        .await;

    let state = AppState::new(
        test_config(),
        wrap(routes.clone()),
        Arc::new(identities.clone()),
    );

    TestApp {
        state,
        routes,
        identities,
        hauler,
        dispatcher_user,
    }
}

pub async fn add_user(identities: &InMemoryIdentityStore, name: &str) -> Identity {
    let record = IdentityRecord {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
        is_active: true,
    };
    identities.insert(record.clone()).await;
    Identity::from(record)
}

impl TestApp {
    pub async fn connect(&self, identity: &Identity) -> TestClient {
        let (tx, rx) = mpsc::channel(self.state.config.ws_outbound_buffer);
        let conn = self.state.sessions.open_session(identity.clone(), tx).await;
        TestClient { conn, rx }
    }

    pub async fn stored_route(&self) -> Route {
        self.routes
            .find_route_by_id(ROUTE_ID)
            .await
            .expect("store")
            .expect("route exists")
    }
}

/// Punto a `meters` metros al norte de `origin`
pub fn north_of(origin: GeoPoint, meters: f64) -> GeoPoint {
    let degrees = (meters / 6_371_000.0).to_degrees();
    GeoPoint::new(origin.lat + degrees, origin.lng)
}
