//! Utilidades de validación
//!
//! Funciones helper usadas por los derives de `validator` en los modelos
//! y los payloads del socket.

use validator::ValidationError;

use crate::models::route::GeoPoint;

/// Validar formato de coordenadas GPS (finitas y dentro de rango)
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat.to_string());
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng.to_string());
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validación a nivel de struct para `GeoPoint`
pub fn validate_geo_point(point: &GeoPoint) -> Result<(), ValidationError> {
    validate_coordinates(point.lat, point.lng)
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
