// App state shared across routes

use axum::extract::FromRef;
use gatherly_storage::Database;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::services::{AccountService, EventService, ProfileService, ReviewService, RsvpService};

#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
    pub rsvps: Arc<RsvpService>,
    pub reviews: Arc<ReviewService>,
    pub profiles: Arc<ProfileService>,
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: Arc<Database>, tokens: Arc<TokenService>) -> Self {
        Self {
            events: Arc::new(EventService::new(db.clone())),
            rsvps: Arc::new(RsvpService::new(db.clone())),
            reviews: Arc::new(ReviewService::new(db.clone())),
            profiles: Arc::new(ProfileService::new(db.clone())),
            accounts: Arc::new(AccountService::new(db, tokens.clone())),
            tokens,
        }
    }
}

// Lets the auth extractors work against any router using this state
impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
