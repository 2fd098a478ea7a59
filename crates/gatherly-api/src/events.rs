// Event CRUD HTTP routes, plus the RSVP and review sub-resources

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use gatherly_contracts::{
    CreateEventRequest, CreateReviewRequest, EventDetail, EventSummary, ListResponse, Review,
    Rsvp, RsvpRequest, RsvpStatus, UpdateEventRequest,
};
use gatherly_storage::{EventFilter, EventOrdering};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::{CurrentUser, MaybeUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/:event_id",
            get(get_event)
                .put(update_event)
                .patch(update_event)
                .delete(delete_event),
        )
        .route("/events/:event_id/rsvp", post(rsvp_event).patch(rsvp_event))
        .route(
            "/events/:event_id/reviews",
            get(list_event_reviews).post(create_event_review),
        )
        .with_state(state)
}

/// Query parameters for the event list
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EventListQuery {
    /// Exact location match
    pub location: Option<String>,
    /// Filter by organizer user ID
    pub organizer: Option<Uuid>,
    pub is_public: Option<bool>,
    /// Case-insensitive substring search over title, description and location
    pub search: Option<String>,
    /// One of: start_time, -start_time, created_at, -created_at, title, -title
    pub ordering: Option<String>,
}

impl EventListQuery {
    fn into_filter(self, viewer: Option<Uuid>) -> Result<EventFilter, ApiError> {
        let ordering = match self.ordering.as_deref() {
            None => EventOrdering::default(),
            Some(raw) => raw
                .parse()
                .map_err(|e: String| ApiError::field("ordering", e))?,
        };

        Ok(EventFilter {
            viewer,
            location: self.location,
            organizer: self.organizer,
            is_public: self.is_public,
            search: self.search,
            ordering,
        })
    }
}

/// GET /api/events - List visible events
#[utoipa::path(
    get,
    path = "/api/events",
    params(EventListQuery),
    responses(
        (status = 200, description = "List of events", body = ListResponse<EventSummary>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<EventListQuery>,
) -> Result<Json<ListResponse<EventSummary>>, ApiError> {
    let filter = query.into_filter(user.map(|u| u.id))?;
    let events = state.events.list(&filter).await?;
    Ok(Json(ListResponse::new(events)))
}

/// POST /api/events - Create a new event
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created successfully", body = EventDetail),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDetail>), ApiError> {
    let event = state.events.create(&user, req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventDetail),
        (status = 404, description = "Event not found or not visible")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetail>, ApiError> {
    let event = state.events.get(event_id, user.map(|u| u.id)).await?;
    Ok(Json(event))
}

/// PUT/PATCH /api/events/{event_id} - Update event (organizer only)
#[utoipa::path(
    put,
    path = "/api/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated successfully", body = EventDetail),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<EventDetail>, ApiError> {
    let event = state.events.update(event_id, &user, req).await?;
    Ok(Json(event))
}

/// DELETE /api/events/{event_id} - Delete event (organizer only)
#[utoipa::path(
    delete,
    path = "/api/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted successfully"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.events.delete(event_id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST/PATCH /api/events/{event_id}/rsvp - Create or update the caller's RSVP
#[utoipa::path(
    post,
    path = "/api/events/{event_id}/rsvp",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = RsvpRequest,
    responses(
        (status = 201, description = "RSVP created", body = Rsvp),
        (status = 200, description = "RSVP updated", body = Rsvp),
        (status = 400, description = "Unknown RSVP status"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Event not found")
    ),
    tag = "rsvps"
)]
pub async fn rsvp_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(req): Json<RsvpRequest>,
) -> Result<(StatusCode, Json<Rsvp>), ApiError> {
    let status = match req.status.as_deref() {
        None => RsvpStatus::Maybe,
        Some(raw) => raw
            .parse()
            .map_err(|e: String| ApiError::field("status", e))?,
    };
    let (rsvp, created) = state.events.rsvp(event_id, &user, status).await?;

    let code = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((code, Json(rsvp)))
}

/// GET /api/events/{event_id}/reviews - List reviews for an event
#[utoipa::path(
    get,
    path = "/api/events/{event_id}/reviews",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "List of reviews", body = ListResponse<Review>),
        (status = 404, description = "Event not found")
    ),
    tag = "reviews"
)]
pub async fn list_event_reviews(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ListResponse<Review>>, ApiError> {
    let reviews = state
        .reviews
        .list_for_event(event_id, user.map(|u| u.id))
        .await?;
    Ok(Json(ListResponse::new(reviews)))
}

/// POST /api/events/{event_id}/reviews - Add a review to an event
#[utoipa::path(
    post,
    path = "/api/events/{event_id}/reviews",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid rating or duplicate review"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Event not found")
    ),
    tag = "reviews"
)]
pub async fn create_event_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = state.reviews.create_for_event(event_id, &user, req).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
