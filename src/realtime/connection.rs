use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::ServerEvent;
use crate::models::auth::Identity;

/// Evento compartido entre todos los destinatarios de un broadcast
pub type OutboundEvent = Arc<ServerEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Resultado de una entrega no bloqueante
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Cola de salida llena; el evento se descarta para esta conexión
    QueueFull,
    /// El writer de la conexión ya terminó
    Closed,
}

/// Handle de una conexión autenticada.
/// Contiene la identidad verificada y el lado emisor de su cola de salida.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    identity: Identity,
    outbound: mpsc::Sender<OutboundEvent>,
}

impl ConnectionHandle {
    pub fn new(identity: Identity, outbound: mpsc::Sender<OutboundEvent>) -> Self {
        Self {
            id: ConnectionId::new(),
            identity,
            outbound,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Entrega sin bloquear, usada por el broadcast
    pub fn try_deliver(&self, event: OutboundEvent) -> Delivery {
        match self.outbound.try_send(event) {
            Ok(()) => Delivery::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => Delivery::QueueFull,
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// Envío unicast: espera sitio en la cola de esta conexión únicamente
    pub async fn send(&self, event: ServerEvent) -> bool {
        self.outbound.send(Arc::new(event)).await.is_ok()
    }
}
