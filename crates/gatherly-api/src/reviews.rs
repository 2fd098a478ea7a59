// Review HTTP routes.
// Reviews can be created here with the event named in the body, or
// through the event sub-resource; mutation is author-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use gatherly_contracts::{
    CreateReviewRequest, ListResponse, Review, ReviewRequest, UpdateReviewRequest,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Create review routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route(
            "/reviews/:review_id",
            get(get_review)
                .put(update_review)
                .patch(update_review)
                .delete(delete_review),
        )
        .with_state(state)
}

/// Query parameters for the review list
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReviewListQuery {
    /// Restrict to reviews of one event
    pub event: Option<Uuid>,
}

/// GET /api/reviews - List reviews, optionally filtered by event
#[utoipa::path(
    get,
    path = "/api/reviews",
    params(ReviewListQuery),
    responses(
        (status = 200, description = "List of reviews", body = ListResponse<Review>)
    ),
    tag = "reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<ListResponse<Review>>, ApiError> {
    let reviews = state.reviews.list(query.event).await?;
    Ok(Json(ListResponse::new(reviews)))
}

/// POST /api/reviews - Add a review to the event named in the body
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid rating or duplicate review"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Event not found")
    ),
    tag = "reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = state
        .reviews
        .create_for_event(
            req.event,
            &user,
            CreateReviewRequest {
                rating: req.rating,
                comment: req.comment,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/reviews/{review_id} - Get review by ID
#[utoipa::path(
    get,
    path = "/api/reviews/{review_id}",
    params(
        ("review_id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review found", body = Review),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
) -> Result<Json<Review>, ApiError> {
    let review = state.reviews.get(review_id).await?;
    Ok(Json(review))
}

/// PUT/PATCH /api/reviews/{review_id} - Update own review
#[utoipa::path(
    put,
    path = "/api/reviews/{review_id}",
    params(
        ("review_id" = Uuid, Path, description = "Review ID")
    ),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(review_id): Path<Uuid>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    let review = state.reviews.update(review_id, &user, req).await?;
    Ok(Json(review))
}

/// DELETE /api/reviews/{review_id} - Delete own review
#[utoipa::path(
    delete,
    path = "/api/reviews/{review_id}",
    params(
        ("review_id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(review_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.reviews.delete(review_id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
