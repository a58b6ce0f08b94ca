//! Distancias y ETA
//!
//! Distancia de gran círculo (haversine, tierra esférica) y ETA en minutos
//! a partir de una velocidad media asumida.

use crate::models::route::GeoPoint;

/// Radio medio de la Tierra en metros
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Distancia de gran círculo entre dos puntos, en metros
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// ETA en minutos: `round((distance / 1000) / speed * 60)`
pub fn eta_minutes(distance_meters: f64, avg_speed_kmh: f64) -> i64 {
    round_minutes((distance_meters / 1000.0) / avg_speed_kmh * 60.0)
}

// Entradas no negativas: `round` equivale a half-up
fn round_minutes(minutes: f64) -> i64 {
    minutes.round() as i64
}
