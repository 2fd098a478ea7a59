// RSVP queries for the caller's own responses.
// Creating and updating RSVPs goes through EventService::rsvp.

use gatherly_contracts::{Rsvp, UserSummary};
use gatherly_storage::{Database, RsvpWithContextRow};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::event::parse_status;

pub struct RsvpService {
    db: Arc<Database>,
}

impl RsvpService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// List the caller's RSVPs, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Rsvp>, ApiError> {
        let rows = self.db.list_rsvps_for_user(user_id).await?;
        rows.into_iter().map(rsvp_to_dto).collect()
    }
}

pub(crate) fn rsvp_to_dto(row: RsvpWithContextRow) -> Result<Rsvp, ApiError> {
    Ok(Rsvp {
        id: row.id,
        event_id: row.event_id,
        event_title: row.event_title,
        user: UserSummary {
            id: row.user_id,
            username: row.username,
            full_name: row.full_name,
        },
        status: parse_status(&row.status)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
