// RSVP DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A user's response to an event. One per (event, user).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Rsvp {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub user: crate::UserSummary,
    pub status: RsvpStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// RSVP status choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Going,
    Maybe,
    NotGoing,
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsvpStatus::Going => write!(f, "going"),
            RsvpStatus::Maybe => write!(f, "maybe"),
            RsvpStatus::NotGoing => write!(f, "not_going"),
        }
    }
}

impl std::str::FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "going" => Ok(RsvpStatus::Going),
            "maybe" => Ok(RsvpStatus::Maybe),
            "not_going" => Ok(RsvpStatus::NotGoing),
            _ => Err(format!("Unknown RSVP status: {}", s)),
        }
    }
}

/// Request body for POST/PATCH /api/events/{id}/rsvp.
/// Omitting `status` defaults to `maybe`; an unknown status is a
/// field-level validation error rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RsvpRequest {
    /// One of: going, maybe, not_going
    #[serde(default)]
    pub status: Option<String>,
}
