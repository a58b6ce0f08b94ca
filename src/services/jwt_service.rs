use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::models::auth::JwtClaims;
use crate::utils::errors::{AppError, AppResult};

/// Configuración JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_duration: Duration,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::seconds(config.jwt_expiration as i64),
        }
    }
}

/// Servicio JWT
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Genera un token de acceso. Solo lo usan herramientas y tests;
    /// la emisión real de credenciales vive fuera de este servicio.
    pub fn generate_access_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            exp: (now + self.config.access_token_duration).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Error generating access token: {}", e)))
    }

    /// Valida firma y expiración y decodifica los claims
    pub fn validate_token(&self, token: &str) -> AppResult<JwtClaims> {
        let validation = Validation::new(self.config.algorithm);

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("🔑 Token rechazado: {}", e);
                AppError::AuthenticationFailed
            })
    }

    /// Extrae el user_id del token
    pub fn get_user_id(&self, token: &str) -> AppResult<Uuid> {
        let claims = self.validate_token(token)?;
        Uuid::parse_str(&claims.sub).map_err(|_| AppError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::hours(1),
        })
    }

    #[test]
    fn test_generate_and_validate_token() {
        let jwt_service = service("test-secret");
        let user_id = Uuid::new_v4();

        let token = jwt_service.generate_access_token(user_id).unwrap();
        assert!(!token.is_empty());
        assert_eq!(jwt_service.get_user_id(&token).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service("secret-a").generate_access_token(Uuid::new_v4()).unwrap();
        let result = service("secret-b").validate_token(&token);
        assert!(matches!(result, Err(AppError::AuthenticationFailed)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt_service = service("test-secret");
        let past = Utc::now() - Duration::hours(2);
        let claims = JwtClaims {
            sub: Uuid::new_v4().to_string(),
            exp: (past + Duration::minutes(5)).timestamp(),
            iat: past.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            jwt_service.validate_token(&token),
            Err(AppError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let claims = JwtClaims {
            sub: "not-a-uuid".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            service("test-secret").get_user_id(&token),
            Err(AppError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(service("test-secret").validate_token("abc.def").is_err());
    }
}
