//! Registro de topics
//!
//! Mapa explícito topic -> conexiones, más el índice inverso conexión -> topics
//! para poder limpiar todas las membresías al cerrar una conexión. Los topics
//! se crean al primer join y se descartan al quedar vacíos.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::connection::{ConnectionHandle, ConnectionId};
use super::topic::TopicKey;

#[derive(Default)]
struct RegistryInner {
    topics: HashMap<TopicKey, HashMap<ConnectionId, ConnectionHandle>>,
    memberships: HashMap<ConnectionId, HashSet<TopicKey>>,
}

#[derive(Clone, Default)]
pub struct TopicRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Añadir una conexión a un topic. Idempotente.
    pub async fn join(&self, topic: TopicKey, connection: &ConnectionHandle) {
        let mut inner = self.inner.write().await;
        inner
            .topics
            .entry(topic.clone())
            .or_default()
            .insert(connection.id(), connection.clone());
        inner
            .memberships
            .entry(connection.id())
            .or_default()
            .insert(topic.clone());
        debug!(connection = %connection.id(), topic = %topic, "join");
    }

    /// Quitar una conexión de un topic. Idempotente, sin error si no estaba.
    pub async fn leave(&self, topic: &TopicKey, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;
        if let Some(members) = inner.topics.get_mut(topic) {
            members.remove(&connection_id);
            if members.is_empty() {
                inner.topics.remove(topic);
            }
        }
        if let Some(topics) = inner.memberships.get_mut(&connection_id) {
            topics.remove(topic);
            if topics.is_empty() {
                inner.memberships.remove(&connection_id);
            }
        }
        debug!(connection = %connection_id, topic = %topic, "leave");
    }

    /// Miembros actuales de un topic (copia para el dispatch)
    pub async fn members(&self, topic: &TopicKey) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;
        inner
            .topics
            .get(topic)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Eliminar la conexión de todos sus topics. Devuelve cuántos dejó.
    pub async fn remove_connection(&self, connection_id: ConnectionId) -> usize {
        let mut inner = self.inner.write().await;
        let Some(topics) = inner.memberships.remove(&connection_id) else {
            return 0;
        };
        for topic in &topics {
            if let Some(members) = inner.topics.get_mut(topic) {
                members.remove(&connection_id);
                if members.is_empty() {
                    inner.topics.remove(topic);
                }
            }
        }
        topics.len()
    }

    pub async fn is_member(&self, topic: &TopicKey, connection_id: ConnectionId) -> bool {
        let inner = self.inner.read().await;
        inner
            .topics
            .get(topic)
            .is_some_and(|members| members.contains_key(&connection_id))
    }

    pub async fn topic_count(&self) -> usize {
        self.inner.read().await.topics.len()
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.memberships.len()
    }
}
