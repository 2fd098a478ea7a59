// Gatherly API server

mod auth;
mod error;
mod events;
mod profiles;
mod reviews;
mod rsvps;
mod services;
mod state;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use gatherly_contracts::*;
use gatherly_storage::Database;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        events::list_events,
        events::create_event,
        events::get_event,
        events::update_event,
        events::delete_event,
        events::rsvp_event,
        events::list_event_reviews,
        events::create_event_review,
        rsvps::list_rsvps,
        reviews::list_reviews,
        reviews::create_review,
        reviews::get_review,
        reviews::update_review,
        reviews::delete_review,
        profiles::list_profiles,
        profiles::get_profile,
        profiles::update_profile,
        auth::routes::register,
        auth::routes::token,
        auth::routes::token_refresh,
        auth::routes::me,
    ),
    components(
        schemas(
            EventSummary, EventDetail,
            CreateEventRequest, UpdateEventRequest,
            Rsvp, RsvpStatus, RsvpRequest,
            Review, CreateReviewRequest, ReviewRequest, UpdateReviewRequest,
            Profile, UpdateProfileRequest, UserSummary,
            RegisterRequest, TokenRequest, TokenRefreshRequest,
            TokenPair, AccessToken,
            ListResponse<EventSummary>,
            ListResponse<Rsvp>,
            ListResponse<Review>,
            ListResponse<Profile>,
        )
    ),
    tags(
        (name = "events", description = "Event management endpoints"),
        (name = "rsvps", description = "RSVP endpoints"),
        (name = "reviews", description = "Review endpoints"),
        (name = "profiles", description = "User profile endpoints"),
        (name = "auth", description = "Authentication endpoints")
    ),
    info(
        title = "Gatherly API",
        version = "0.2.0",
        description = "API for managing events, RSVPs, reviews, and profiles",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatherly_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("gatherly-api starting...");

    dotenvy::dotenv().ok();

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    // Load authentication configuration
    let auth_config = auth::AuthConfig::from_env();
    let tokens = Arc::new(auth::TokenService::new(auth_config.jwt));

    // Create app state
    let db = Arc::new(db);
    let state = AppState::new(db, tokens);

    // Load API prefix from environment (default: /api)
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string());
    tracing::info!(prefix = %api_prefix, "API prefix configured");

    // Load CORS allowed origins from environment (optional)
    // Only needed when a UI is served from a different origin than the API
    // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    let api_routes = Router::new()
        .merge(events::routes(state.clone()))
        .merge(rsvps::routes(state.clone()))
        .merge(reviews::routes(state.clone()))
        .merge(profiles::routes(state.clone()))
        .merge(auth::routes(state));

    // Build main router with health and prefixed API routes
    let mut app = Router::new().route("/health", get(health));
    app = app.merge(build_router_with_prefix(api_routes, &api_prefix));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
