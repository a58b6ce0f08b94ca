//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema de tracking
//! y su conversión a respuestas HTTP y a eventos `error` del socket.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Credencial ausente, inválida, expirada o usuario inactivo.
    /// Nunca revela cuál de las causas fue.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Payload de error para HTTP y para el evento `error` del socket
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
}

impl AppError {
    /// Código estable que ve el cliente
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Validation(_) | AppError::ValidationFailed(_) => "VALIDATION_FAILED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Database(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) | AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convierte el error en lo que se le envía al cliente.
    /// Los fallos de almacenamiento se reportan de forma genérica; el detalle va al log.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                "An unexpected error occurred".to_string()
            }
            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                "An unexpected error occurred".to_string()
            }
            AppError::AuthenticationFailed => "Authentication failed".to_string(),
            AppError::Validation(e) => format!("Invalid payload: {}", e),
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::ValidationFailed(msg)
            | AppError::Conflict(msg) => {
                warn!("⚠️ {}: {}", self.code(), msg);
                msg.clone()
            }
        };

        ErrorResponse {
            message,
            code: self.code().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, id: &str, reason: &str) -> AppError {
    AppError::Conflict(format!("{} '{}' {}", resource, id, reason))
}
