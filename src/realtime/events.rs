//! Mensajes del socket
//!
//! Cada frame de texto es `{"event": "<nombre>", "data": <payload>}`.
//! Los eventos entrantes se decodifican una sola vez en `ClientEvent`.

use serde::{Deserialize, Serialize};

use crate::dto::tracking_dto::{
    CompleteWaypointRequest, LocationUpdateEvent, RouteSnapshot, UpdateLocationRequest,
    WaypointCompletedEvent,
};
use crate::utils::errors::{AppError, AppResult, ErrorResponse};

/// Eventos cliente -> servidor
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    TrackRoute(String),
    UpdateLocation(UpdateLocationRequest),
    CompleteWaypoint(CompleteWaypointRequest),
    StopTracking(String),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::TrackRoute(_) => "track_route",
            ClientEvent::UpdateLocation(_) => "update_location",
            ClientEvent::CompleteWaypoint(_) => "complete_waypoint",
            ClientEvent::StopTracking(_) => "stop_tracking",
        }
    }
}

/// Eventos servidor -> cliente
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    RouteData(RouteSnapshot),
    LocationUpdate(LocationUpdateEvent),
    WaypointCompleted(WaypointCompletedEvent),
    Error(ErrorResponse),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::RouteData(_) => "route_data",
            ServerEvent::LocationUpdate(_) => "location_update",
            ServerEvent::WaypointCompleted(_) => "waypoint_completed",
            ServerEvent::Error(_) => "error",
        }
    }

    pub fn error(err: &AppError) -> Self {
        ServerEvent::Error(err.to_response())
    }

    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(self)
            .map_err(|e| AppError::Internal(format!("Error serializing {}: {}", self.name(), e)))
    }
}

/// Decodificar un frame de texto entrante
pub fn decode_client_event(text: &str) -> AppResult<ClientEvent> {
    serde_json::from_str(text).map_err(|e| AppError::ValidationFailed(format!("Malformed message: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::route::GeoPoint;
    use chrono::Utc;

    #[test]
    fn test_decode_track_route() {
        let event = decode_client_event(r#"{"event":"track_route","data":"R-1"}"#).unwrap();
        assert!(matches!(event, ClientEvent::TrackRoute(ref id) if id == "R-1"));
    }

    #[test]
    fn test_decode_update_location() {
        let event = decode_client_event(
            r#"{"event":"update_location","data":{"routeId":"R-1","location":{"lat":40.4,"lng":-3.7}}}"#,
        )
        .unwrap();
        match event {
            ClientEvent::UpdateLocation(req) => {
                assert_eq!(req.route_id, "R-1");
                assert_eq!(req.location, GeoPoint::new(40.4, -3.7));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_decode_complete_waypoint() {
        let event = decode_client_event(
            r#"{"event":"complete_waypoint","data":{"routeId":"R-1","waypointIndex":2}}"#,
        )
        .unwrap();
        assert!(matches!(event, ClientEvent::CompleteWaypoint(ref req) if req.waypoint_index == 2));
    }

    #[test]
    fn test_decode_rejects_unknown_event() {
        let err = decode_client_event(r#"{"event":"delete_route","data":"R-1"}"#).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_decode_rejects_wrong_payload_shape() {
        assert!(decode_client_event(r#"{"event":"update_location","data":"R-1"}"#).is_err());
        assert!(decode_client_event("not json").is_err());
    }

    #[test]
    fn test_location_update_wire_format() {
        let event = ServerEvent::LocationUpdate(LocationUpdateEvent {
            route_id: "R-1".to_string(),
            location: GeoPoint::new(1.0, 2.0),
            timestamp: Utc::now(),
            eta: None,
            next_waypoint_address: None,
        });
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(json["event"], "location_update");
        assert_eq!(json["data"]["routeId"], "R-1");
        assert!(json["data"]["eta"].is_null());
        assert!(json["data"]["nextWaypointAddress"].is_null());
    }

    #[test]
    fn test_error_wire_format() {
        let event = ServerEvent::error(&AppError::Unauthorized("not your route".to_string()));
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(json["event"], "error");
        assert_eq!(json["data"]["message"], "not your route");
        assert_eq!(json["data"]["code"], "UNAUTHORIZED");
    }
}
