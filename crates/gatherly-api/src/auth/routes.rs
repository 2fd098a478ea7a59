// Authentication HTTP routes: register, token pair, refresh, current user

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use gatherly_contracts::{
    AccessToken, Profile, RegisterRequest, TokenPair, TokenRefreshRequest, TokenRequest,
};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Create auth routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/token", post(token))
        .route("/auth/token/refresh", post(token_refresh))
        .route("/auth/me", get(me))
        .with_state(state)
}

/// POST /api/auth/register - Create an account and sign in
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenPair),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username or email already taken")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenPair>), ApiError> {
    let pair = state.accounts.register(req).await?;
    Ok((StatusCode::CREATED, Json(pair)))
}

/// POST /api/auth/token - Obtain a token pair from credentials
#[utoipa::path(
    post,
    path = "/api/auth/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPair),
        (status = 401, description = "Bad credentials")
    ),
    tag = "auth"
)]
pub async fn token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let pair = state.accounts.login(&req.username, &req.password).await?;
    Ok(Json(pair))
}

/// POST /api/auth/token/refresh - Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/auth/token/refresh",
    request_body = TokenRefreshRequest,
    responses(
        (status = 200, description = "New access token issued", body = AccessToken),
        (status = 401, description = "Refresh token invalid or expired")
    ),
    tag = "auth"
)]
pub async fn token_refresh(
    State(state): State<AppState>,
    Json(req): Json<TokenRefreshRequest>,
) -> Result<Json<AccessToken>, ApiError> {
    let access = state.accounts.refresh(&req.refresh).await?;
    Ok(Json(access))
}

/// GET /api/auth/me - Current user with profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = Profile),
        (status = 401, description = "Not authenticated")
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.accounts.me(user.id).await?;
    Ok(Json(profile))
}
