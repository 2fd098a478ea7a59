// JWT issuing and verification (HS256)
//
// Access and refresh tokens share the claims shape and differ in the
// token_type claim, so one can never be used where the other is expected.

use chrono::Utc;
use gatherly_contracts::TokenPair;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::JwtConfig;
use crate::error::ApiError;

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub username: String,
    /// "access" or "refresh"
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies the access/refresh token pair
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    /// Issue a fresh access/refresh pair for a user
    pub fn issue_pair(&self, user_id: Uuid, username: &str) -> Result<TokenPair, ApiError> {
        Ok(TokenPair {
            access: self.issue_access(user_id, username)?,
            refresh: self.issue(
                user_id,
                username,
                TOKEN_TYPE_REFRESH,
                self.config.refresh_token_lifetime.as_secs() as i64,
            )?,
        })
    }

    /// Issue a single access token
    pub fn issue_access(&self, user_id: Uuid, username: &str) -> Result<String, ApiError> {
        self.issue(
            user_id,
            username,
            TOKEN_TYPE_ACCESS,
            self.config.access_token_lifetime.as_secs() as i64,
        )
    }

    fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        token_type: &str,
        lifetime_secs: i64,
    ) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            token_type: token_type.to_string(),
            iat: now,
            exp: now + lifetime_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    /// Verify an access token from the Authorization header
    pub fn verify_access(&self, token: &str) -> Result<Claims, ApiError> {
        self.verify(token, TOKEN_TYPE_ACCESS)
    }

    /// Verify a refresh token from the refresh endpoint
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, ApiError> {
        self.verify(token, TOKEN_TYPE_REFRESH)
    }

    fn verify(&self, token: &str, expected_type: &str) -> Result<Claims, ApiError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| ApiError::unauthorized("Token is invalid or expired."))?;

        if data.claims.token_type != expected_type {
            return Err(ApiError::unauthorized(format!(
                "Expected a {} token.",
                expected_type
            )));
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service() -> TokenService {
        TokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            access_token_lifetime: Duration::from_secs(60),
            refresh_token_lifetime: Duration::from_secs(3600),
        })
    }

    #[test]
    fn test_issue_and_verify_pair() {
        let svc = service();
        let user_id = Uuid::now_v7();
        let pair = svc.issue_pair(user_id, "alice").unwrap();

        let access = svc.verify_access(&pair.access).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.username, "alice");

        let refresh = svc.verify_refresh(&pair.refresh).unwrap();
        assert_eq!(refresh.sub, user_id);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let svc = service();
        let pair = svc.issue_pair(Uuid::now_v7(), "alice").unwrap();

        assert!(svc.verify_access(&pair.refresh).is_err());
        assert!(svc.verify_refresh(&pair.access).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let svc = service();
        let pair = svc.issue_pair(Uuid::now_v7(), "alice").unwrap();

        let other = TokenService::new(JwtConfig {
            secret: "different-secret".to_string(),
            ..JwtConfig::default()
        });
        assert!(other.verify_access(&pair.access).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(service().verify_access("not-a-jwt").is_err());
    }
}
