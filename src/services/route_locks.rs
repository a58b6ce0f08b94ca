//! Serialización de escrituras por ruta
//!
//! Un mutex async por `route_id`, creado bajo demanda y eliminado cuando
//! nadie lo tiene ni lo espera. Las escrituras de rutas distintas no se bloquean.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct RouteLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Guard de escritura de una ruta; libera y limpia al hacer drop
pub struct RouteWriteGuard<'a> {
    owner: &'a RouteLocks,
    route_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl RouteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, route_id: &str) -> RouteWriteGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(route_id.to_string()).or_default())
        };

        let guard = lock.lock_owned().await;
        RouteWriteGuard {
            owner: self,
            route_id: route_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Número de rutas con lock vivo
    pub fn active(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for RouteWriteGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.owner.locks.lock().unwrap_or_else(|e| e.into_inner());
        self.guard.take();
        // Solo el mapa conserva una referencia: nadie lo tiene ni lo espera
        if locks
            .get(&self.route_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.route_id);
        }
    }
}
