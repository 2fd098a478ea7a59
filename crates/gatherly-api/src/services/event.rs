// Event business logic: visibility, time validation, organizer permission

use gatherly_contracts::{
    CreateEventRequest, EventDetail, EventSummary, Rsvp, RsvpStatus, UpdateEventRequest,
    UserSummary,
};
use gatherly_storage::{
    CreateEvent, CreateRsvp, Database, EventFilter, EventRow, EventWithMetaRow, UpdateEvent,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::services::review::review_to_dto;
use crate::services::rsvp::rsvp_to_dto;

pub struct EventService {
    db: Arc<Database>,
}

/// Whether an event is visible to the given viewer.
/// Private events are only visible to their organizer.
pub(crate) fn is_visible(is_public: bool, organizer_id: Uuid, viewer: Option<Uuid>) -> bool {
    is_public || viewer == Some(organizer_id)
}

/// Events must end after they start
fn validate_times(
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
) -> Result<(), ApiError> {
    if end <= start {
        return Err(ApiError::field(
            "end_time",
            "End time must be after start time.",
        ));
    }
    Ok(())
}

fn validate_required(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::field(field, "This field may not be blank."));
    }
    Ok(())
}

impl EventService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &EventFilter) -> Result<Vec<EventSummary>, ApiError> {
        let rows = self.db.list_events(filter).await?;
        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    pub async fn create(
        &self,
        organizer: &CurrentUser,
        req: CreateEventRequest,
    ) -> Result<EventDetail, ApiError> {
        validate_required("title", &req.title)?;
        validate_required("description", &req.description)?;
        validate_required("location", &req.location)?;
        validate_times(req.start_time, req.end_time)?;

        let row = self
            .db
            .create_event(CreateEvent {
                title: req.title,
                description: req.description,
                organizer_id: organizer.id,
                location: req.location,
                start_time: req.start_time,
                end_time: req.end_time,
                is_public: req.is_public,
            })
            .await?;

        self.detail(row.id, Some(organizer.id)).await
    }

    pub async fn get(&self, id: Uuid, viewer: Option<Uuid>) -> Result<EventDetail, ApiError> {
        self.detail(id, viewer).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        caller: &CurrentUser,
        req: UpdateEventRequest,
    ) -> Result<EventDetail, ApiError> {
        let existing = self.owned_event(id, caller).await?;

        if let Some(title) = &req.title {
            validate_required("title", title)?;
        }
        if let Some(description) = &req.description {
            validate_required("description", description)?;
        }
        if let Some(location) = &req.location {
            validate_required("location", location)?;
        }

        // Validate the effective times, mixing patched and stored values
        let start = req.start_time.unwrap_or(existing.start_time);
        let end = req.end_time.unwrap_or(existing.end_time);
        validate_times(start, end)?;

        self.db
            .update_event(
                id,
                UpdateEvent {
                    title: req.title,
                    description: req.description,
                    location: req.location,
                    start_time: req.start_time,
                    end_time: req.end_time,
                    is_public: req.is_public,
                },
            )
            .await?
            .ok_or(ApiError::NotFound)?;

        self.detail(id, Some(caller.id)).await
    }

    pub async fn delete(&self, id: Uuid, caller: &CurrentUser) -> Result<(), ApiError> {
        self.owned_event(id, caller).await?;

        if self.db.delete_event(id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }

    /// Create or update the caller's RSVP.
    /// Returns the RSVP and whether it was newly created.
    pub async fn rsvp(
        &self,
        event_id: Uuid,
        caller: &CurrentUser,
        status: RsvpStatus,
    ) -> Result<(Rsvp, bool), ApiError> {
        let event = self.visible_event(event_id, Some(caller.id)).await?;

        let created = match self.db.get_rsvp(event.id, caller.id).await? {
            None => {
                self.db
                    .create_rsvp(CreateRsvp {
                        event_id: event.id,
                        user_id: caller.id,
                        status: status.to_string(),
                    })
                    .await?;
                true
            }
            Some(existing) => {
                self.db
                    .update_rsvp_status(existing.id, &status.to_string())
                    .await?
                    .ok_or(ApiError::NotFound)?;
                false
            }
        };

        let row = self
            .db
            .get_rsvp_with_context(event.id, caller.id)
            .await?
            .ok_or(ApiError::NotFound)?;

        Ok((rsvp_to_dto(row)?, created))
    }

    /// Fetch an event enforcing visibility; private events 404 for strangers
    pub(crate) async fn visible_event(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<EventRow, ApiError> {
        let event = self.db.get_event(id).await?.ok_or(ApiError::NotFound)?;
        if !is_visible(event.is_public, event.organizer_id, viewer) {
            return Err(ApiError::NotFound);
        }
        Ok(event)
    }

    /// Fetch an event the caller must own. Events the caller cannot see
    /// stay 404; visible events owned by someone else are 403.
    async fn owned_event(&self, id: Uuid, caller: &CurrentUser) -> Result<EventRow, ApiError> {
        let event = self.db.get_event(id).await?.ok_or(ApiError::NotFound)?;
        if !is_visible(event.is_public, event.organizer_id, Some(caller.id)) {
            return Err(ApiError::NotFound);
        }
        if event.organizer_id != caller.id {
            return Err(ApiError::forbidden(
                "Only the organizer may modify this event.",
            ));
        }
        Ok(event)
    }

    async fn detail(&self, id: Uuid, viewer: Option<Uuid>) -> Result<EventDetail, ApiError> {
        let row = self
            .db
            .get_event_with_meta(id)
            .await?
            .ok_or(ApiError::NotFound)?;

        if !is_visible(row.is_public, row.organizer_id, viewer) {
            return Err(ApiError::NotFound);
        }

        let reviews = self
            .db
            .list_reviews(Some(id))
            .await?
            .into_iter()
            .map(review_to_dto)
            .collect::<Result<Vec<_>, _>>()?;

        let user_rsvp_status = match viewer {
            Some(user_id) => match self.db.get_rsvp(id, user_id).await? {
                Some(rsvp) => Some(parse_status(&rsvp.status)?),
                None => None,
            },
            None => None,
        };

        Ok(EventDetail {
            id: row.id,
            title: row.title,
            description: row.description,
            organizer: UserSummary {
                id: row.organizer_id,
                username: row.organizer_username,
                full_name: row.organizer_full_name,
            },
            location: row.location,
            start_time: row.start_time,
            end_time: row.end_time,
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
            rsvp_count: row.rsvp_count,
            average_rating: row.average_rating,
            reviews,
            user_rsvp_status,
        })
    }
}

fn row_to_summary(row: EventWithMetaRow) -> EventSummary {
    EventSummary {
        id: row.id,
        title: row.title,
        location: row.location,
        start_time: row.start_time,
        end_time: row.end_time,
        organizer: UserSummary {
            id: row.organizer_id,
            username: row.organizer_username,
            full_name: row.organizer_full_name,
        },
        is_public: row.is_public,
        rsvp_count: row.rsvp_count,
        average_rating: row.average_rating,
    }
}

/// Stored status strings are constrained by a CHECK, so a parse failure
/// here means schema drift
pub(crate) fn parse_status(status: &str) -> Result<RsvpStatus, ApiError> {
    status
        .parse()
        .map_err(|e: String| ApiError::Internal(anyhow::anyhow!(e)))
}
