// Account service: registration, credential login, token refresh
//
// Every new user gets an empty profile row alongside the user row, so
// profile endpoints never have to handle a missing profile.

use gatherly_contracts::{AccessToken, Profile, RegisterRequest, TokenPair};
use gatherly_storage::{hash_password, is_unique_violation, verify_password, CreateUser, Database};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::TokenService;
use crate::error::ApiError;
use crate::services::profile::row_to_profile;

const MIN_PASSWORD_LEN: usize = 8;

pub struct AccountService {
    db: Arc<Database>,
    tokens: Arc<TokenService>,
}

fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::field("username", "This field may not be blank."));
    }
    if !req.email.contains('@') {
        return Err(ApiError::field("email", "Enter a valid email address."));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::field(
            "password",
            format!(
                "This password is too short. It must contain at least {} characters.",
                MIN_PASSWORD_LEN
            ),
        ));
    }
    Ok(())
}

impl AccountService {
    pub fn new(db: Arc<Database>, tokens: Arc<TokenService>) -> Self {
        Self { db, tokens }
    }

    /// Create a user plus empty profile and sign them in
    pub async fn register(&self, req: RegisterRequest) -> Result<TokenPair, ApiError> {
        validate_register(&req)?;

        if self.db.get_user_by_username(&req.username).await?.is_some() {
            return Err(ApiError::Conflict(
                "A user with that username already exists.".to_string(),
            ));
        }
        if self.db.get_user_by_email(&req.email).await?.is_some() {
            return Err(ApiError::Conflict(
                "A user with that email already exists.".to_string(),
            ));
        }

        let password_hash = hash_password(&req.password)?;
        let user = match self
            .db
            .create_user(CreateUser {
                username: req.username,
                email: req.email,
                password_hash,
            })
            .await
        {
            Ok(user) => user,
            // Lost the race with a concurrent registration
            Err(e) if is_unique_violation(&e) => {
                return Err(ApiError::Conflict(
                    "A user with that username or email already exists.".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };
        self.db.create_profile(user.id).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        self.tokens.issue_pair(user.id, &user.username)
    }

    /// Exchange credentials for a token pair.
    /// Unknown username and wrong password are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let user = self
            .db
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| {
                ApiError::unauthorized("No active account found with the given credentials.")
            })?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ApiError::unauthorized(
                "No active account found with the given credentials.",
            ));
        }

        self.tokens.issue_pair(user.id, &user.username)
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, ApiError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        // The user may have been deleted since the refresh token was issued
        let user = self
            .db
            .get_user(claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Token is invalid or expired."))?;

        Ok(AccessToken {
            access: self.tokens.issue_access(user.id, &user.username)?,
        })
    }

    /// Current user with profile
    pub async fn me(&self, user_id: Uuid) -> Result<Profile, ApiError> {
        let row = self
            .db
            .get_profile(user_id)
            .await?
            .ok_or(ApiError::NotFound)?;
        Ok(row_to_profile(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "a-long-password".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(validate_register(&request()).is_ok());
    }

    #[test]
    fn test_blank_username_rejected() {
        let mut req = request();
        req.username = "  ".to_string();
        assert!(validate_register(&req).is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut req = request();
        req.email = "not-an-email".to_string();
        assert!(validate_register(&req).is_err());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = request();
        req.password = "short".to_string();
        assert!(validate_register(&req).is_err());
    }
}
