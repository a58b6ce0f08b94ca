//! Stores en memoria
//!
//! Mismas garantías que los repositorios PostgreSQL (incluido el
//! compare-and-swap por versión), sin base de datos. Los usan los tests
//! y el arranque con `TRACKING_STORE=memory`.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::route_repository::RouteStore;
use super::user_repository::IdentityStore;
use crate::models::auth::IdentityRecord;
use crate::models::route::Route;
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

#[derive(Clone, Default)]
pub struct InMemoryRouteStore {
    routes: Arc<RwLock<HashMap<String, Route>>>,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, route: Route) {
        self.routes.write().await.insert(route.route_id.clone(), route);
    }
}

#[async_trait]
impl RouteStore for InMemoryRouteStore {
    async fn find_route_by_id(&self, route_id: &str) -> AppResult<Option<Route>> {
        Ok(self.routes.read().await.get(route_id).cloned())
    }

    async fn update_route(&self, route: &Route) -> AppResult<Route> {
        let mut routes = self.routes.write().await;
        let stored = routes
            .get_mut(&route.route_id)
            .ok_or_else(|| not_found_error("Route", &route.route_id))?;

        if stored.version != route.version {
            return Err(conflict_error("Route", &route.route_id, "was modified concurrently"));
        }

        // hauler, vehículo y subscribers no se tocan desde el tracking
        stored.status = route.status;
        stored.waypoints = route.waypoints.clone();
        stored.current_location = route.current_location;
        stored.last_location_update = route.last_location_update;
        stored.version += 1;

        Ok(stored.clone())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryIdentityStore {
    users: Arc<RwLock<HashMap<Uuid, IdentityRecord>>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: IdentityRecord) {
        self.users.write().await.insert(record.id, record);
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_identity(&self, user_id: Uuid) -> AppResult<Option<IdentityRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}

/// Fichero de datos iniciales para el modo en memoria
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<IdentityRecord>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl SeedData {
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read seed file {}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid seed file {}", path))
    }

    /// Volcar los datos en stores nuevos
    pub async fn into_stores(self) -> (InMemoryRouteStore, InMemoryIdentityStore) {
        let routes = InMemoryRouteStore::new();
        let identities = InMemoryIdentityStore::new();
        for user in self.users {
            identities.insert(user).await;
        }
        for route in self.routes {
            routes.insert(route).await;
        }
        (routes, identities)
    }
}
