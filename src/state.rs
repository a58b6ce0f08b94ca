//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Registro de topics y servicios
//! se construyen una sola vez aquí y se inyectan a quien los necesita.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::controllers::TrackingController;
use crate::realtime::{BroadcastDispatcher, TopicRegistry};
use crate::repositories::{IdentityStore, RouteStore};
use crate::services::{JwtConfig, JwtService, SessionGateway, TrackingService};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub registry: TopicRegistry,
    pub sessions: SessionGateway,
    pub tracking: TrackingService,
    pub controller: TrackingController,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        routes: Arc<dyn RouteStore>,
        identities: Arc<dyn IdentityStore>,
    ) -> Self {
        let registry = TopicRegistry::new();
        let dispatcher = BroadcastDispatcher::new(registry.clone());
        let jwt = JwtService::new(JwtConfig::from(&config));
        let sessions = SessionGateway::new(jwt, identities, registry.clone());
        let tracking = TrackingService::new(
            routes,
            registry.clone(),
            dispatcher,
            config.avg_speed_kmh,
        );
        let controller = TrackingController::new(tracking.clone());

        Self {
            config,
            registry,
            sessions,
            tracking,
            controller,
        }
    }
}
