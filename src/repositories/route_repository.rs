use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use crate::models::route::{
    GeoPoint, HaulerSummary, Route, RouteStatus, VehicleSummary, Waypoint,
};
use crate::utils::errors::{conflict_error, AppResult};

/// Acceso al almacén durable de rutas
#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn find_route_by_id(&self, route_id: &str) -> AppResult<Option<Route>>;

    /// Persiste el estado mutable de la ruta si `route.version` sigue siendo
    /// la versión almacenada; en caso contrario falla con `Conflict`.
    /// Devuelve la ruta con la versión nueva.
    async fn update_route(&self, route: &Route) -> AppResult<Route>;
}

#[derive(Debug, FromRow)]
struct RouteRow {
    id: Uuid,
    route_id: String,
    status: RouteStatus,
    hauler_id: Uuid,
    hauler_name: String,
    vehicle_id: Option<Uuid>,
    vehicle_license_plate: Option<String>,
    vehicle_brand: Option<String>,
    vehicle_model: Option<String>,
    waypoints: Json<Vec<Waypoint>>,
    current_location: Option<Json<GeoPoint>>,
    last_location_update: Option<DateTime<Utc>>,
    subscribers: Vec<Uuid>,
    version: i64,
    created_at: DateTime<Utc>,
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        let vehicle = match (row.vehicle_id, row.vehicle_license_plate) {
            (Some(id), Some(license_plate)) => Some(VehicleSummary {
                id,
                license_plate,
                brand: row.vehicle_brand,
                model: row.vehicle_model,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            route_id: row.route_id,
            status: row.status,
            hauler: HaulerSummary {
                id: row.hauler_id,
                name: row.hauler_name,
            },
            vehicle,
            waypoints: row.waypoints.0,
            current_location: row.current_location.map(|location| location.0),
            last_location_update: row.last_location_update,
            subscribers: row.subscribers,
            version: row.version,
            created_at: row.created_at,
        }
    }
}

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteStore for RouteRepository {
    async fn find_route_by_id(&self, route_id: &str) -> AppResult<Option<Route>> {
        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            SELECT
                r.id, r.route_id, r.status, r.hauler_id,
                u.full_name AS hauler_name,
                v.id AS vehicle_id,
                v.license_plate AS vehicle_license_plate,
                v.brand AS vehicle_brand,
                v.model AS vehicle_model,
                r.waypoints, r.current_location, r.last_location_update,
                r.subscribers, r.version, r.created_at
            FROM routes r
            JOIN users u ON u.id = r.hauler_id
            LEFT JOIN vehicles v ON v.id = r.vehicle_id
            WHERE r.route_id = $1
            "#,
        )
        .bind(route_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Route::from))
    }

    async fn update_route(&self, route: &Route) -> AppResult<Route> {
        let new_version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE routes
            SET status = $3,
                waypoints = $4,
                current_location = $5,
                last_location_update = $6,
                version = version + 1,
                updated_at = NOW()
            WHERE route_id = $1 AND version = $2
            RETURNING version
            "#,
        )
        .bind(&route.route_id)
        .bind(route.version)
        .bind(route.status)
        .bind(Json(route.waypoints.clone()))
        .bind(route.current_location.map(Json))
        .bind(route.last_location_update)
        .fetch_optional(&self.pool)
        .await?;

        match new_version {
            Some(version) => Ok(Route {
                version,
                ..route.clone()
            }),
            None => {
                warn!(route_id = %route.route_id, version = route.version, "🔁 Conflicto de versión");
                Err(conflict_error("Route", &route.route_id, "was modified concurrently"))
            }
        }
    }
}
