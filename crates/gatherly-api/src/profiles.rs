// Profile HTTP routes: anyone can read, only the owner can edit

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use gatherly_contracts::{ListResponse, Profile, UpdateProfileRequest};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Create profile routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/profiles", get(list_profiles))
        .route(
            "/profiles/:user_id",
            get(get_profile).put(update_profile).patch(update_profile),
        )
        .with_state(state)
}

/// GET /api/profiles - List profiles
#[utoipa::path(
    get,
    path = "/api/profiles",
    responses(
        (status = 200, description = "List of profiles", body = ListResponse<Profile>)
    ),
    tag = "profiles"
)]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Profile>>, ApiError> {
    let profiles = state.profiles.list().await?;
    Ok(Json(ListResponse::new(profiles)))
}

/// GET /api/profiles/{user_id} - Get a user's profile
#[utoipa::path(
    get,
    path = "/api/profiles/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Profile found", body = Profile),
        (status = 404, description = "Profile not found")
    ),
    tag = "profiles"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.profiles.get(user_id).await?;
    Ok(Json(profile))
}

/// PUT/PATCH /api/profiles/{user_id} - Update own profile
#[utoipa::path(
    put,
    path = "/api/profiles/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller does not own this profile"),
        (status = 404, description = "Profile not found")
    ),
    tag = "profiles"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.profiles.update(user_id, &user, req).await?;
    Ok(Json(profile))
}
