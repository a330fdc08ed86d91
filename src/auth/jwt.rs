//! JWT token generation and validation
//! Stateless `{sub, exp}` tokens signed with a process-wide HMAC secret

use crate::{config::SecurityConfig, error::AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,

    /// Expiration (unix seconds)
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::Unauthenticated
    }
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_token_ttl: Duration,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AppError> {
        let secret = config.secret_key.expose_secret();

        // Ensure secret is at least 32 bytes for HMAC
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: config.jwt_algorithm()?,
            access_token_ttl: Duration::minutes(config.access_token_expire_minutes),
        })
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    /// Issue a token for `subject` that expires after `ttl`
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AppError::Internal(format!("Failed to encode access token: {}", e))
        })
    }

    /// Issue an access token with the configured lifetime
    pub fn issue_access_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue(subject, self.access_token_ttl)
    }

    /// Validate and decode token
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature
                    | ErrorKind::InvalidAlgorithm
                    | ErrorKind::InvalidAlgorithmName
                    | ErrorKind::InvalidKeyFormat => TokenError::SignatureInvalid,
                    _ => TokenError::Malformed,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn test_config(secret: &str, algorithm: &str) -> SecurityConfig {
        SecurityConfig {
            secret_key: Secret::new(secret.to_string()),
            algorithm: algorithm.to_string(),
            access_token_expire_minutes: 30,
            password_hash_memory_kib: 1024,
            password_hash_iterations: 1,
            password_hash_parallelism: 1,
            cookie_secure: false,
        }
    }

    fn service() -> JwtService {
        JwtService::from_config(&test_config("test_secret_key_32_characters_long!", "HS256"))
            .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service();
        let before = Utc::now().timestamp();

        let token = service.issue_access_token("admin@admin.ru").unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, "admin@admin.ru");
        let expected = before + 30 * 60;
        assert!(claims.exp >= expected && claims.exp <= expected + 5);
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let token = service.issue("admin@admin.ru", Duration::minutes(-5)).unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_signature_invalid() {
        let other = JwtService::from_config(&test_config(
            "another_secret_key_32_characters_long",
            "HS256",
        ))
        .unwrap();
        let token = other.issue_access_token("admin@admin.ru").unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let other = JwtService::from_config(&test_config(
            "test_secret_key_32_characters_long!",
            "HS512",
        ))
        .unwrap();
        let token = other.issue_access_token("admin@admin.ru").unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_malformed_token() {
        assert_eq!(service().verify("invalid_token"), Err(TokenError::Malformed));
        assert_eq!(service().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(JwtService::from_config(&test_config("secret_key", "HS256")).is_err());
    }

    #[test]
    fn test_token_error_maps_to_unauthenticated() {
        let error: AppError = TokenError::Expired.into();
        assert_eq!(error.code(), 401);
    }
}
