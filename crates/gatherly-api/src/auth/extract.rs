// Axum extractors for the authenticated caller
//
// CurrentUser rejects with 401 when credentials are missing or bad.
// MaybeUser is for public endpoints with visibility rules: absent
// credentials yield None, but a present-and-invalid token is still a 401.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use uuid::Uuid;

use super::jwt::TokenService;
use crate::error::ApiError;

/// The authenticated caller, decoded from the bearer access token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// Optional caller for endpoints that are readable anonymously
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header."))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use the Bearer scheme."))?;

    Ok(Some(token))
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            ApiError::unauthorized("Authentication credentials were not provided.")
        })?;

        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens.verify_access(token)?;

        Ok(CurrentUser {
            id: claims.sub,
            username: claims.username,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(MaybeUser(None)),
            Some(token) => {
                let tokens = Arc::<TokenService>::from_ref(state);
                let claims = tokens.verify_access(token)?;
                Ok(MaybeUser(Some(CurrentUser {
                    id: claims.sub,
                    username: claims.username,
                })))
            }
        }
    }
}
