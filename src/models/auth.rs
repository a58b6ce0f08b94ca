use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user_id
    pub exp: i64,    // expiration timestamp
    pub iat: i64,    // issued at timestamp
}

/// Registro de usuario tal como lo devuelve el IdentityStore
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct IdentityRecord {
    pub id: Uuid,
    pub full_name: String,
    pub is_active: bool,
}

/// Identidad verificada, ligada a una conexión durante toda su vida
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub display_name: String,
}

impl From<IdentityRecord> for Identity {
    fn from(record: IdentityRecord) -> Self {
        Self {
            user_id: record.id,
            display_name: record.full_name,
        }
    }
}
