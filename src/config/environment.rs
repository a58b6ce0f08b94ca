//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{anyhow, Context, Result};
use std::env;

/// Velocidad media asumida para el cálculo de ETA (km/h)
pub const DEFAULT_AVG_SPEED_KMH: f64 = 30.0;

/// Capacidad por defecto de la cola de salida de cada conexión
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Almacén de rutas e identidades
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Stores en memoria, opcionalmente cargados desde un fichero JSON
    Memory { seed_path: Option<String> },
}

impl StoreBackend {
    fn from_env() -> Result<Self> {
        match env::var("TRACKING_STORE").as_deref() {
            Err(_) | Ok("postgres") => Ok(StoreBackend::Postgres),
            Ok("memory") => Ok(StoreBackend::Memory {
                seed_path: env::var("TRACKING_SEED").ok(),
            }),
            Ok(other) => Err(anyhow!(
                "TRACKING_STORE must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub avg_speed_kmh: f64,
    pub ws_outbound_buffer: usize,
    pub store: StoreBackend,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        let avg_speed_kmh = parse_var("AVG_SPEED_KMH", DEFAULT_AVG_SPEED_KMH)?;
        if !(avg_speed_kmh > 0.0 && avg_speed_kmh.is_finite()) {
            return Err(anyhow!("AVG_SPEED_KMH must be a positive number"));
        }

        let ws_outbound_buffer = parse_var("WS_OUTBOUND_BUFFER", DEFAULT_OUTBOUND_BUFFER)?;
        if ws_outbound_buffer == 0 {
            return Err(anyhow!("WS_OUTBOUND_BUFFER must be greater than zero"));
        }

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: parse_var("PORT", 3000)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiration: parse_var("JWT_EXPIRATION", 86_400)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
            avg_speed_kmh,
            ws_outbound_buffer,
            store: StoreBackend::from_env()?,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} must be a valid number: {}", name, e)),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blanks() {
        let origins = parse_origins("https://a.example, ,https://b.example,");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_parse_var_default_when_missing() {
        let value: u16 = parse_var("COLLECTION_TRACKING_TEST_UNSET_VAR", 4242).unwrap();
        assert_eq!(value, 4242);
    }
}
