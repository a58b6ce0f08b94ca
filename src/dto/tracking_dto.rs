use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::route::{GeoPoint, HaulerSummary, Route, RouteStatus, VehicleSummary, Waypoint};
use crate::utils::validation::validate_not_empty;

// Payload de `update_location`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    #[validate(custom = "validate_not_empty")]
    pub route_id: String,
    #[validate]
    pub location: GeoPoint,
}

// Payload de `complete_waypoint`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteWaypointRequest {
    #[validate(custom = "validate_not_empty")]
    pub route_id: String,
    pub waypoint_index: i64,
}

// Broadcast `location_update`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdateEvent {
    pub route_id: String,
    pub location: GeoPoint,
    pub timestamp: DateTime<Utc>,
    pub eta: Option<i64>,
    pub next_waypoint_address: Option<String>,
}

// Broadcast `waypoint_completed`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointCompletedEvent {
    pub route_id: String,
    pub waypoint_index: usize,
    pub address: String,
}

// Unicast `route_data`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSnapshot {
    pub route_id: String,
    pub status: RouteStatus,
    pub hauler: HaulerSummary,
    pub waypoints: Vec<Waypoint>,
    pub current_location: Option<GeoPoint>,
    pub last_location_update: Option<DateTime<Utc>>,
    pub vehicle: Option<VehicleSummary>,
}

impl From<Route> for RouteSnapshot {
    fn from(route: Route) -> Self {
        Self {
            route_id: route.route_id,
            status: route.status,
            hauler: route.hauler,
            waypoints: route.waypoints,
            current_location: route.current_location,
            last_location_update: route.last_location_update,
            vehicle: route.vehicle,
        }
    }
}
