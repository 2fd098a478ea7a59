// Review DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A review left by a user on an event. One per (event, user).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user: crate::UserSummary,
    /// Rating from 1 to 5 stars
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Request to add a review to an event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    /// Rating from 1 to 5 stars
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Request to add a review through the top-level collection; the event
/// is named in the body instead of the path
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub event: Uuid,
    /// Rating from 1 to 5 stars
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Request to update an existing review (author only)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
}
