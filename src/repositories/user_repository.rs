use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::auth::IdentityRecord;
use crate::utils::errors::AppResult;

/// Resolución de identidades para el handshake
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_identity(&self, user_id: Uuid) -> AppResult<Option<IdentityRecord>>;
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for UserRepository {
    async fn find_identity(&self, user_id: Uuid) -> AppResult<Option<IdentityRecord>> {
        let record = sqlx::query_as::<_, IdentityRecord>(
            "SELECT id, full_name, is_active FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
