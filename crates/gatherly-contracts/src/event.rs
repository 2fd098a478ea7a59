// Event DTOs for the public API
//
// List and detail use different representations, mirroring the two
// serializers the mobile client already consumes: summaries stay light,
// detail carries nested reviews and the caller's own RSVP status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{Review, RsvpStatus, UserSummary};

/// Lightweight event representation for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer: UserSummary,
    pub is_public: bool,
    /// Number of RSVPs with status `going`
    pub rsvp_count: i64,
    /// Mean review rating rounded to one decimal, null without reviews
    pub average_rating: Option<f64>,
}

/// Full event representation for the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub organizer: UserSummary,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rsvp_count: i64,
    pub average_rating: Option<f64>,
    pub reviews: Vec<Review>,
    /// The caller's RSVP status for this event, null when anonymous
    /// or not yet responded
    pub user_rsvp_status: Option<RsvpStatus>,
}

/// Request to create an event. The organizer is always the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Whether this event is visible to all users (default true)
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_is_public() -> bool {
    true
}

/// Request to update an event. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_event_request_defaults_to_public() {
        let req: CreateEventRequest = serde_json::from_str(
            r#"{
                "title": "Rust Meetup",
                "description": "Monthly meetup",
                "location": "Berlin",
                "start_time": "2026-09-01T18:00:00Z",
                "end_time": "2026-09-01T21:00:00Z"
            }"#,
        )
        .unwrap();
        assert!(req.is_public);
    }

    #[test]
    fn test_update_event_request_all_fields_optional() {
        let req: UpdateEventRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_none());
        assert!(req.end_time.is_none());
        assert!(req.is_public.is_none());
    }
}
