// Profile business logic: anyone can read, only the owner can edit

use gatherly_contracts::{Profile, UpdateProfileRequest};
use gatherly_storage::{Database, ProfileRow, UpdateProfile};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiError;

pub struct ProfileService {
    db: Arc<Database>,
}

impl ProfileService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Profile>, ApiError> {
        let rows = self.db.list_profiles().await?;
        Ok(rows.into_iter().map(row_to_profile).collect())
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Profile, ApiError> {
        let row = self
            .db
            .get_profile(user_id)
            .await?
            .ok_or(ApiError::NotFound)?;
        Ok(row_to_profile(row))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        caller: &CurrentUser,
        req: UpdateProfileRequest,
    ) -> Result<Profile, ApiError> {
        if user_id != caller.id {
            return Err(ApiError::forbidden("You can only edit your own profile."));
        }

        let row = self
            .db
            .update_profile(
                user_id,
                UpdateProfile {
                    full_name: req.full_name,
                    bio: req.bio,
                    location: req.location,
                    picture_url: req.picture_url,
                },
            )
            .await?
            .ok_or(ApiError::NotFound)?;

        Ok(row_to_profile(row))
    }
}

pub(crate) fn row_to_profile(row: ProfileRow) -> Profile {
    Profile {
        user_id: row.user_id,
        username: row.username,
        email: row.email,
        full_name: row.full_name,
        bio: row.bio,
        location: row.location,
        picture_url: row.picture_url,
    }
}
