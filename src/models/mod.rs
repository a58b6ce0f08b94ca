//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del tracking en tiempo real.

pub mod auth;
pub mod route;

pub use auth::{Identity, IdentityRecord, JwtClaims};
pub use route::{
    GeoPoint, HaulerSummary, Route, RouteStatus, VehicleSummary, Waypoint, WaypointStatus,
};
