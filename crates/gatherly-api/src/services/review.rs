// Review business logic: rating bounds, one review per user per event,
// author-only mutation

use gatherly_contracts::{CreateReviewRequest, Review, UpdateReviewRequest, UserSummary};
use gatherly_storage::{
    is_unique_violation, CreateReview, Database, ReviewRow, ReviewWithUserRow, UpdateReview,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::services::event::is_visible;

pub struct ReviewService {
    db: Arc<Database>,
}

fn validate_rating(rating: i32) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::field("rating", "Rating must be between 1 and 5."));
    }
    Ok(())
}

impl ReviewService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Add a review to an event. One review per user per event.
    pub async fn create_for_event(
        &self,
        event_id: Uuid,
        caller: &CurrentUser,
        req: CreateReviewRequest,
    ) -> Result<Review, ApiError> {
        let event = self
            .db
            .get_event(event_id)
            .await?
            .ok_or(ApiError::NotFound)?;
        if !is_visible(event.is_public, event.organizer_id, Some(caller.id)) {
            return Err(ApiError::NotFound);
        }

        validate_rating(req.rating)?;

        if self
            .db
            .get_review_for_event_user(event_id, caller.id)
            .await?
            .is_some()
        {
            return Err(ApiError::validation(
                "You have already reviewed this event.",
            ));
        }

        let row = match self
            .db
            .create_review(CreateReview {
                event_id,
                user_id: caller.id,
                rating: req.rating,
                comment: req.comment.unwrap_or_default(),
            })
            .await
        {
            Ok(row) => row,
            // Lost the race with a concurrent submission
            Err(e) if is_unique_violation(&e) => {
                return Err(ApiError::validation(
                    "You have already reviewed this event.",
                ))
            }
            Err(e) => return Err(e.into()),
        };

        self.get(row.id).await
    }

    /// List reviews for one event, enforcing event visibility
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<Review>, ApiError> {
        let event = self
            .db
            .get_event(event_id)
            .await?
            .ok_or(ApiError::NotFound)?;
        if !is_visible(event.is_public, event.organizer_id, viewer) {
            return Err(ApiError::NotFound);
        }

        let rows = self.db.list_reviews(Some(event_id)).await?;
        rows.into_iter().map(review_to_dto).collect()
    }

    /// List all reviews, optionally filtered to one event
    pub async fn list(&self, event_id: Option<Uuid>) -> Result<Vec<Review>, ApiError> {
        let rows = self.db.list_reviews(event_id).await?;
        rows.into_iter().map(review_to_dto).collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<Review, ApiError> {
        let row = self
            .db
            .get_review_with_user(id)
            .await?
            .ok_or(ApiError::NotFound)?;
        review_to_dto(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        caller: &CurrentUser,
        req: UpdateReviewRequest,
    ) -> Result<Review, ApiError> {
        self.owned_review(id, caller).await?;

        if let Some(rating) = req.rating {
            validate_rating(rating)?;
        }

        self.db
            .update_review(
                id,
                UpdateReview {
                    rating: req.rating,
                    comment: req.comment,
                },
            )
            .await?
            .ok_or(ApiError::NotFound)?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid, caller: &CurrentUser) -> Result<(), ApiError> {
        self.owned_review(id, caller).await?;

        if self.db.delete_review(id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }

    async fn owned_review(&self, id: Uuid, caller: &CurrentUser) -> Result<ReviewRow, ApiError> {
        let review = self.db.get_review(id).await?.ok_or(ApiError::NotFound)?;
        if review.user_id != caller.id {
            return Err(ApiError::forbidden("You can only edit your own reviews."));
        }
        Ok(review)
    }
}

pub(crate) fn review_to_dto(row: ReviewWithUserRow) -> Result<Review, ApiError> {
    Ok(Review {
        id: row.id,
        event_id: row.event_id,
        user: UserSummary {
            id: row.user_id,
            username: row.username,
            full_name: row.full_name,
        },
        rating: row.rating,
        comment: row.comment,
        created_at: row.created_at,
    })
}
