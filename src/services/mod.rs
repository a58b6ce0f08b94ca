//! Services module
//!
//! Este módulo contiene la lógica de negocio del tracking: handshake,
//! ingesta de posición, máquina de estados de waypoints y cálculo de ETA.

pub mod geo_service;
pub mod jwt_service;
pub mod route_locks;
pub mod session_service;
pub mod tracking_service;

pub use geo_service::{distance_meters, eta_minutes};
pub use jwt_service::{JwtConfig, JwtService};
pub use session_service::SessionGateway;
pub use tracking_service::TrackingService;
