//! Capa de tiempo real
//!
//! Conexiones autenticadas, topics (`user:<id>`, `route:<routeId>`),
//! broadcast y el formato de los mensajes del socket.

pub mod connection;
pub mod dispatcher;
pub mod events;
pub mod registry;
pub mod topic;

pub use connection::{ConnectionHandle, ConnectionId, OutboundEvent};
pub use dispatcher::{BroadcastDispatcher, DeliveryReport};
pub use events::{decode_client_event, ClientEvent, ServerEvent};
pub use registry::TopicRegistry;
pub use topic::TopicKey;
