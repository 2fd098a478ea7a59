// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// User models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

// ============================================
// Profile models
// ============================================

/// Profile joined with its user (username/email come from the users table)
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub picture_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub picture_url: Option<String>,
}

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub organizer_id: Uuid,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event with organizer info and RSVP/review aggregates joined
#[derive(Debug, Clone, FromRow)]
pub struct EventWithMetaRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub organizer_id: Uuid,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub organizer_username: String,
    pub organizer_full_name: Option<String>,
    /// Count of RSVPs with status 'going'
    pub rsvp_count: i64,
    /// Mean review rating rounded to one decimal
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub organizer_id: Uuid,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_public: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_public: Option<bool>,
}

/// Filter for event listing.
/// `viewer` widens visibility to the caller's own private events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub viewer: Option<Uuid>,
    pub location: Option<String>,
    pub organizer: Option<Uuid>,
    pub is_public: Option<bool>,
    pub search: Option<String>,
    pub ordering: EventOrdering,
}

/// Whitelisted orderings for the event list.
/// Anything outside this set never reaches the SQL string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOrdering {
    StartTimeAsc,
    #[default]
    StartTimeDesc,
    CreatedAtAsc,
    CreatedAtDesc,
    TitleAsc,
    TitleDesc,
}

impl EventOrdering {
    pub fn as_sql(&self) -> &'static str {
        match self {
            EventOrdering::StartTimeAsc => "e.start_time ASC",
            EventOrdering::StartTimeDesc => "e.start_time DESC",
            EventOrdering::CreatedAtAsc => "e.created_at ASC",
            EventOrdering::CreatedAtDesc => "e.created_at DESC",
            EventOrdering::TitleAsc => "e.title ASC",
            EventOrdering::TitleDesc => "e.title DESC",
        }
    }
}

impl std::str::FromStr for EventOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start_time" => Ok(EventOrdering::StartTimeAsc),
            "-start_time" => Ok(EventOrdering::StartTimeDesc),
            "created_at" => Ok(EventOrdering::CreatedAtAsc),
            "-created_at" => Ok(EventOrdering::CreatedAtDesc),
            "title" => Ok(EventOrdering::TitleAsc),
            "-title" => Ok(EventOrdering::TitleDesc),
            _ => Err(format!("Unknown ordering: {}", s)),
        }
    }
}

// ============================================
// RSVP models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct RsvpRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// RSVP joined with event title and responding user
#[derive(Debug, Clone, FromRow)]
pub struct RsvpWithContextRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub user_id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateRsvp {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
}

// ============================================
// Review models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Review joined with its author
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithUserRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateReview {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_event_ordering_parses_django_style_params() {
        assert_eq!(
            EventOrdering::from_str("start_time"),
            Ok(EventOrdering::StartTimeAsc)
        );
        assert_eq!(
            EventOrdering::from_str("-start_time"),
            Ok(EventOrdering::StartTimeDesc)
        );
        assert_eq!(
            EventOrdering::from_str("-title"),
            Ok(EventOrdering::TitleDesc)
        );
        assert!(EventOrdering::from_str("location").is_err());
        assert!(EventOrdering::from_str("").is_err());
    }

    #[test]
    fn test_event_ordering_default_is_newest_first() {
        assert_eq!(EventOrdering::default(), EventOrdering::StartTimeDesc);
    }

    #[test]
    fn test_event_ordering_sql_is_column_qualified() {
        for ordering in [
            EventOrdering::StartTimeAsc,
            EventOrdering::StartTimeDesc,
            EventOrdering::CreatedAtAsc,
            EventOrdering::CreatedAtDesc,
            EventOrdering::TitleAsc,
            EventOrdering::TitleDesc,
        ] {
            assert!(ordering.as_sql().starts_with("e."));
        }
    }
}
