// RSVP HTTP routes (read-only).
// Creating and updating RSVPs happens through the event sub-resource.

use axum::{extract::State, routing::get, Json, Router};
use gatherly_contracts::{ListResponse, Rsvp};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Create RSVP routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/rsvps", get(list_rsvps))
        .with_state(state)
}

/// GET /api/rsvps - List the caller's RSVPs
#[utoipa::path(
    get,
    path = "/api/rsvps",
    responses(
        (status = 200, description = "List of the caller's RSVPs", body = ListResponse<Rsvp>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "rsvps"
)]
pub async fn list_rsvps(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ListResponse<Rsvp>>, ApiError> {
    let rsvps = state.rsvps.list_for_user(user.id).await?;
    Ok(Json(ListResponse::new(rsvps)))
}
