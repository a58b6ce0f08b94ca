//! Modelo de Route
//!
//! Una ruta es una recogida programada: un hauler, una lista ordenada de
//! waypoints y la última posición reportada. Las waypoints viven dentro de
//! la ruta (JSONB en PostgreSQL) y no tienen identidad propia.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_geo_point;

/// Estado de la ruta - mapea al ENUM route_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "route_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    /// Una ruta cerrada ya no acepta escrituras del tracking
    pub fn is_closed(self) -> bool {
        matches!(self, RouteStatus::Completed | RouteStatus::Cancelled)
    }
}

/// Estado de una parada
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaypointStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

/// Par de coordenadas (grados decimales)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Validate)]
#[validate(schema(function = "validate_geo_point"))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub address: String,
    pub location: GeoPoint,
    pub status: WaypointStatus,
    pub estimated_time: Option<DateTime<Utc>>,
    pub actual_time: Option<DateTime<Utc>>,
}

impl Waypoint {
    pub fn pending(address: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            address: address.into(),
            location,
            status: WaypointStatus::Pending,
            estimated_time: None,
            actual_time: None,
        }
    }

    /// Solo pending e in_progress pueden pasar a completed
    pub fn can_complete(&self) -> bool {
        matches!(self.status, WaypointStatus::Pending | WaypointStatus::InProgress)
    }
}

/// Resumen del hauler que se incluye en el snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HaulerSummary {
    pub id: Uuid,
    pub name: String,
}

/// Resumen del vehículo asignado
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: Uuid,
    pub license_plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
}

/// Route principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Clave interna de almacenamiento
    pub id: Uuid,
    /// Identificador público de la ruta
    pub route_id: String,
    pub status: RouteStatus,
    pub hauler: HaulerSummary,
    pub vehicle: Option<VehicleSummary>,
    pub waypoints: Vec<Waypoint>,
    pub current_location: Option<GeoPoint>,
    pub last_location_update: Option<DateTime<Utc>>,
    /// Opt-in persistente a notificaciones; independiente de los topics en vivo
    pub subscribers: Vec<Uuid>,
    /// Versión para el compare-and-swap de `update_route`
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// Crear una ruta nueva en estado planned con todas las waypoints pending
    pub fn planned(
        route_id: impl Into<String>,
        hauler: HaulerSummary,
        vehicle: Option<VehicleSummary>,
        waypoints: Vec<Waypoint>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id: route_id.into(),
            status: RouteStatus::Planned,
            hauler,
            vehicle,
            waypoints,
            current_location: None,
            last_location_update: None,
            subscribers: Vec::new(),
            version: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_hauler(&self, user_id: Uuid) -> bool {
        self.hauler.id == user_id
    }

    /// Primera waypoint pending en el orden almacenado
    pub fn next_pending_waypoint(&self) -> Option<(usize, &Waypoint)> {
        self.waypoints
            .iter()
            .enumerate()
            .find(|(_, w)| w.status == WaypointStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hauler() -> HaulerSummary {
        HaulerSummary {
            id: Uuid::new_v4(),
            name: "Marta".to_string(),
        }
    }

    #[test]
    fn test_next_pending_skips_completed() {
        let mut route = Route::planned(
            "R-1",
            hauler(),
            None,
            vec![
                Waypoint::pending("Calle Mayor 1", GeoPoint::new(40.0, -3.0)),
                Waypoint::pending("Calle Mayor 2", GeoPoint::new(40.1, -3.0)),
            ],
        );
        route.waypoints[0].status = WaypointStatus::Completed;

        let (index, waypoint) = route.next_pending_waypoint().unwrap();
        assert_eq!(index, 1);
        assert_eq!(waypoint.address, "Calle Mayor 2");
    }

    #[test]
    fn test_in_progress_is_not_next_pending() {
        let mut route = Route::planned(
            "R-1",
            hauler(),
            None,
            vec![Waypoint::pending("A", GeoPoint::new(0.0, 0.0))],
        );
        route.waypoints[0].status = WaypointStatus::InProgress;
        assert!(route.next_pending_waypoint().is_none());
    }

    #[test]
    fn test_closed_statuses() {
        assert!(!RouteStatus::Planned.is_closed());
        assert!(!RouteStatus::InProgress.is_closed());
        assert!(RouteStatus::Completed.is_closed());
        assert!(RouteStatus::Cancelled.is_closed());
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(48.85, 2.35).validate().is_ok());
        assert!(GeoPoint::new(120.0, 2.35).validate().is_err());
    }

    #[test]
    fn test_waypoint_serializes_camel_case() {
        let json = serde_json::to_value(Waypoint::pending("A", GeoPoint::new(1.0, 2.0))).unwrap();
        assert_eq!(json["status"], "pending");
        assert!(json.get("actualTime").is_some());
    }
}
