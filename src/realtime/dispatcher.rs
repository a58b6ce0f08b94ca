//! Broadcast a los miembros de un topic
//!
//! Entrega best-effort, at-most-once y sin replay. Cada miembro recibe el
//! evento en su propia cola acotada con `try_send`, así una conexión lenta
//! o cerrada nunca frena a las demás.

use std::sync::Arc;

use tracing::{debug, warn};

use super::connection::Delivery;
use super::events::ServerEvent;
use super::registry::TopicRegistry;
use super::topic::TopicKey;

/// Resumen de un publish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub dropped: usize,
}

#[derive(Clone)]
pub struct BroadcastDispatcher {
    registry: TopicRegistry,
}

impl BroadcastDispatcher {
    pub fn new(registry: TopicRegistry) -> Self {
        Self { registry }
    }

    /// Entregar `event` a todos los miembros actuales de `topic`.
    /// Quien se une después de tomar la lista de miembros no lo recibe.
    pub async fn publish(&self, topic: &TopicKey, event: ServerEvent) -> DeliveryReport {
        let members = self.registry.members(topic).await;
        let event_name = event.name();
        let event = Arc::new(event);
        let mut report = DeliveryReport::default();

        for member in &members {
            match member.try_deliver(Arc::clone(&event)) {
                Delivery::Delivered => report.delivered += 1,
                Delivery::QueueFull => {
                    report.dropped += 1;
                    warn!(
                        connection = %member.id(),
                        topic = %topic,
                        event = event_name,
                        "⚠️ Cola de salida llena, evento descartado"
                    );
                }
                Delivery::Closed => {
                    report.dropped += 1;
                    debug!(connection = %member.id(), topic = %topic, "conexión ya cerrada");
                }
            }
        }

        debug!(
            topic = %topic,
            event = event_name,
            delivered = report.delivered,
            dropped = report.dropped,
            "📡 publish"
        );
        report
    }
}
