//! Handshake de conexiones persistentes
//!
//! Autentica una vez por conexión con la credencial bearer, liga la identidad
//! verificada al handle de la conexión y la une a su topic personal. Todas las
//! causas de rechazo se reportan igual (`AuthenticationFailed`).

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use super::jwt_service::JwtService;
use crate::models::auth::Identity;
use crate::realtime::{ConnectionHandle, OutboundEvent, TopicKey, TopicRegistry};
use crate::repositories::IdentityStore;
use crate::utils::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct SessionGateway {
    jwt: JwtService,
    identities: Arc<dyn IdentityStore>,
    registry: TopicRegistry,
}

impl SessionGateway {
    pub fn new(jwt: JwtService, identities: Arc<dyn IdentityStore>, registry: TopicRegistry) -> Self {
        Self {
            jwt,
            identities,
            registry,
        }
    }

    /// Verificar la credencial y resolver la identidad
    pub async fn authenticate(&self, credential: Option<&str>) -> AppResult<Identity> {
        let token = credential
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::AuthenticationFailed)?;

        let user_id = self.jwt.get_user_id(token)?;

        let record = match self.identities.find_identity(user_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(user_id = %user_id, "🔒 Handshake rechazado: usuario no encontrado");
                return Err(AppError::AuthenticationFailed);
            }
            Err(e) => {
                warn!(user_id = %user_id, "🔒 Handshake rechazado: {}", e);
                return Err(AppError::AuthenticationFailed);
            }
        };

        if !record.is_active {
            warn!(user_id = %user_id, "🔒 Handshake rechazado: usuario inactivo");
            return Err(AppError::AuthenticationFailed);
        }

        Ok(Identity::from(record))
    }

    /// Crear el handle de una conexión aceptada y unirla a `user:<id>`
    pub async fn open_session(
        &self,
        identity: Identity,
        outbound: mpsc::Sender<OutboundEvent>,
    ) -> ConnectionHandle {
        let connection = ConnectionHandle::new(identity, outbound);
        self.registry
            .join(TopicKey::user(connection.identity().user_id), &connection)
            .await;
        info!(
            connection = %connection.id(),
            user_id = %connection.identity().user_id,
            "🔌 Conexión abierta"
        );
        connection
    }

    /// Quitar la conexión de todos sus topics
    pub async fn close_session(&self, connection: &ConnectionHandle) {
        let topics = self.registry.remove_connection(connection.id()).await;
        info!(
            connection = %connection.id(),
            user_id = %connection.identity().user_id,
            topics,
            "🔌 Conexión cerrada"
        );
    }
}

/// Extraer la credencial del header `Authorization: Bearer ...` o, si no hay,
/// del parámetro `token` de la query
pub fn extract_credential<'a>(
    authorization: Option<&'a str>,
    query_token: Option<&'a str>,
) -> Option<&'a str> {
    authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .or(query_token)
}
