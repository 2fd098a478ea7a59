// Integration tests for the Gatherly API
// Run against a live server with: cargo test --test integration_test -- --ignored

use gatherly_contracts::{EventDetail, ListResponse, Profile, Review, Rsvp, RsvpStatus, TokenPair};
use serde_json::json;
use uuid::Uuid;

const API_BASE_URL: &str = "http://localhost:8000";

async fn register(client: &reqwest::Client, username: &str) -> TokenPair {
    let response = client
        .post(format!("{}/api/auth/register", API_BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "a-long-password"
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(response.status(), 201, "Expected 201 Created for register");
    response.json().await.expect("Failed to parse token pair")
}

fn unique(name: &str) -> String {
    format!("{}-{}", name, Uuid::now_v7().simple())
}

#[tokio::test]
#[ignore]
async fn test_event_crud_workflow() {
    let client = reqwest::Client::new();

    let alice = register(&client, &unique("alice")).await;

    // Create an event
    let response = client
        .post(format!("{}/api/events", API_BASE_URL))
        .bearer_auth(&alice.access)
        .json(&json!({
            "title": "Rust Meetup",
            "description": "Monthly Rust meetup",
            "location": "Berlin",
            "start_time": "2026-09-01T18:00:00Z",
            "end_time": "2026-09-01T21:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create event");

    assert_eq!(response.status(), 201);
    let event: EventDetail = response.json().await.expect("Failed to parse event");
    assert_eq!(event.title, "Rust Meetup");
    assert!(event.is_public);
    assert_eq!(event.rsvp_count, 0);
    assert!(event.average_rating.is_none());

    // The detail endpoint returns the same representation
    let response = client
        .get(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .send()
        .await
        .expect("Failed to get event");
    assert_eq!(response.status(), 200);
    let fetched: EventDetail = response.json().await.expect("Failed to parse event");
    assert_eq!(fetched.id, event.id);
    assert_eq!(fetched.title, event.title);
    assert_eq!(fetched.organizer.id, event.organizer.id);

    // The event appears in the list
    let response = client
        .get(format!("{}/api/events", API_BASE_URL))
        .send()
        .await
        .expect("Failed to list events");
    assert_eq!(response.status(), 200);
    let events: ListResponse<gatherly_contracts::EventSummary> =
        response.json().await.expect("Failed to parse events");
    assert!(events.data.iter().any(|e| e.id == event.id));

    // Update it with PUT
    let response = client
        .put(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&alice.access)
        .json(&json!({ "title": "Rust Meetup (Updated)" }))
        .send()
        .await
        .expect("Failed to update event");
    assert_eq!(response.status(), 200);
    let updated: EventDetail = response.json().await.expect("Failed to parse event");
    assert_eq!(updated.title, "Rust Meetup (Updated)");
    assert_eq!(updated.description, event.description);

    // Delete it
    let response = client
        .delete(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&alice.access)
        .send()
        .await
        .expect("Failed to delete event");
    assert_eq!(response.status(), 204);

    // Gone now
    let response = client
        .get(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .send()
        .await
        .expect("Failed to get event");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_permissions() {
    let client = reqwest::Client::new();

    let alice = register(&client, &unique("alice")).await;
    let bob = register(&client, &unique("bob")).await;

    // Anonymous create is rejected
    let response = client
        .post(format!("{}/api/events", API_BASE_URL))
        .json(&json!({
            "title": "No auth",
            "description": "x",
            "location": "x",
            "start_time": "2026-09-01T18:00:00Z",
            "end_time": "2026-09-01T21:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // Alice creates an event
    let response = client
        .post(format!("{}/api/events", API_BASE_URL))
        .bearer_auth(&alice.access)
        .json(&json!({
            "title": "Alice's event",
            "description": "Organizer-only mutation",
            "location": "Berlin",
            "start_time": "2026-09-01T18:00:00Z",
            "end_time": "2026-09-01T21:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create event");
    assert_eq!(response.status(), 201);
    let event: EventDetail = response.json().await.expect("Failed to parse event");

    // Bob may not update or delete it
    let response = client
        .put(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&bob.access)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(response.status(), 403);

    let response = client
        .delete(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&bob.access)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_private_event_visibility() {
    let client = reqwest::Client::new();

    let alice = register(&client, &unique("alice")).await;
    let bob = register(&client, &unique("bob")).await;

    let response = client
        .post(format!("{}/api/events", API_BASE_URL))
        .bearer_auth(&alice.access)
        .json(&json!({
            "title": "Secret planning session",
            "description": "Invite only",
            "location": "Undisclosed",
            "start_time": "2026-09-01T18:00:00Z",
            "end_time": "2026-09-01T21:00:00Z",
            "is_public": false
        }))
        .send()
        .await
        .expect("Failed to create event");
    assert_eq!(response.status(), 201);
    let event: EventDetail = response.json().await.expect("Failed to parse event");

    // Organizer sees it
    let response = client
        .get(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&alice.access)
        .send()
        .await
        .expect("Failed to get event");
    assert_eq!(response.status(), 200);

    // Bob and anonymous callers get a 404
    let response = client
        .get(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&bob.access)
        .send()
        .await
        .expect("Failed to get event");
    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .send()
        .await
        .expect("Failed to get event");
    assert_eq!(response.status(), 404);

    // And it is absent from their event lists
    let response = client
        .get(format!("{}/api/events", API_BASE_URL))
        .bearer_auth(&bob.access)
        .send()
        .await
        .expect("Failed to list events");
    let events: ListResponse<gatherly_contracts::EventSummary> =
        response.json().await.expect("Failed to parse events");
    assert!(!events.data.iter().any(|e| e.id == event.id));

    // Mutations by a stranger are also 404, not 403, so the event's
    // existence is never revealed
    let response = client
        .put(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&bob.access)
        .json(&json!({ "title": "Found it" }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(response.status(), 404);

    let response = client
        .delete(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&bob.access)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_rsvp_and_review_workflow() {
    let client = reqwest::Client::new();

    let alice = register(&client, &unique("alice")).await;
    let bob = register(&client, &unique("bob")).await;

    let response = client
        .post(format!("{}/api/events", API_BASE_URL))
        .bearer_auth(&alice.access)
        .json(&json!({
            "title": "Swing night",
            "description": "Social dancing",
            "location": "Hamburg",
            "start_time": "2026-09-05T20:00:00Z",
            "end_time": "2026-09-05T23:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create event");
    let event: EventDetail = response.json().await.expect("Failed to parse event");

    // First RSVP creates
    let response = client
        .post(format!("{}/api/events/{}/rsvp", API_BASE_URL, event.id))
        .bearer_auth(&bob.access)
        .json(&json!({ "status": "going" }))
        .send()
        .await
        .expect("Failed to rsvp");
    assert_eq!(response.status(), 201);
    let rsvp: Rsvp = response.json().await.expect("Failed to parse rsvp");
    assert_eq!(rsvp.status, RsvpStatus::Going);
    assert_eq!(rsvp.event_id, event.id);

    // Second RSVP updates in place
    let response = client
        .patch(format!("{}/api/events/{}/rsvp", API_BASE_URL, event.id))
        .bearer_auth(&bob.access)
        .json(&json!({ "status": "maybe" }))
        .send()
        .await
        .expect("Failed to rsvp");
    assert_eq!(response.status(), 200);
    let rsvp: Rsvp = response.json().await.expect("Failed to parse rsvp");
    assert_eq!(rsvp.status, RsvpStatus::Maybe);

    // Only 'going' responses count
    let response = client
        .get(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .send()
        .await
        .expect("Failed to get event");
    let detail: EventDetail = response.json().await.expect("Failed to parse event");
    assert_eq!(detail.rsvp_count, 0);

    // Bob's RSVP list shows the response
    let response = client
        .get(format!("{}/api/rsvps", API_BASE_URL))
        .bearer_auth(&bob.access)
        .send()
        .await
        .expect("Failed to list rsvps");
    assert_eq!(response.status(), 200);
    let rsvps: ListResponse<Rsvp> = response.json().await.expect("Failed to parse rsvps");
    assert!(rsvps.data.iter().any(|r| r.event_id == event.id));

    // Bob reviews the event
    let response = client
        .post(format!("{}/api/events/{}/reviews", API_BASE_URL, event.id))
        .bearer_auth(&bob.access)
        .json(&json!({ "rating": 5, "comment": "Great event!" }))
        .send()
        .await
        .expect("Failed to create review");
    assert_eq!(response.status(), 201);
    let review: Review = response.json().await.expect("Failed to parse review");
    assert_eq!(review.rating, 5);

    // A second review from the same user is rejected
    let response = client
        .post(format!("{}/api/events/{}/reviews", API_BASE_URL, event.id))
        .bearer_auth(&bob.access)
        .json(&json!({ "rating": 1 }))
        .send()
        .await
        .expect("Failed to send review");
    assert_eq!(response.status(), 400);

    // Review shows up in the event detail with the average
    let response = client
        .get(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .send()
        .await
        .expect("Failed to get event");
    let detail: EventDetail = response.json().await.expect("Failed to parse event");
    assert_eq!(detail.reviews.len(), 1);
    assert_eq!(detail.average_rating, Some(5.0));

    // Alice may not edit Bob's review
    let response = client
        .put(format!("{}/api/reviews/{}", API_BASE_URL, review.id))
        .bearer_auth(&alice.access)
        .json(&json!({ "rating": 1 }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(response.status(), 403);

    // Bob may
    let response = client
        .patch(format!("{}/api/reviews/{}", API_BASE_URL, review.id))
        .bearer_auth(&bob.access)
        .json(&json!({ "rating": 4 }))
        .send()
        .await
        .expect("Failed to update review");
    assert_eq!(response.status(), 200);
    let updated: Review = response.json().await.expect("Failed to parse review");
    assert_eq!(updated.rating, 4);

    // Reviews can also be created through the top-level collection,
    // with the event named in the body
    let response = client
        .post(format!("{}/api/reviews", API_BASE_URL))
        .bearer_auth(&alice.access)
        .json(&json!({ "event": event.id, "rating": 3, "comment": "Organizer's view" }))
        .send()
        .await
        .expect("Failed to create review");
    assert_eq!(response.status(), 201);
    let second: Review = response.json().await.expect("Failed to parse review");
    assert_eq!(second.event_id, event.id);
    assert_eq!(second.rating, 3);

    // Average now spans both reviews
    let response = client
        .get(format!("{}/api/events/{}", API_BASE_URL, event.id))
        .send()
        .await
        .expect("Failed to get event");
    let detail: EventDetail = response.json().await.expect("Failed to parse event");
    assert_eq!(detail.reviews.len(), 2);
    assert_eq!(detail.average_rating, Some(3.5));
}

#[tokio::test]
#[ignore]
async fn test_validation_errors() {
    let client = reqwest::Client::new();

    let alice = register(&client, &unique("alice")).await;

    // end_time before start_time
    let response = client
        .post(format!("{}/api/events", API_BASE_URL))
        .bearer_auth(&alice.access)
        .json(&json!({
            "title": "Backwards event",
            "description": "Ends before it starts",
            "location": "Nowhere",
            "start_time": "2026-09-01T21:00:00Z",
            "end_time": "2026-09-01T18:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse error");
    assert!(body["fields"]["end_time"].is_string());

    // Rating out of range
    let response = client
        .post(format!("{}/api/events", API_BASE_URL))
        .bearer_auth(&alice.access)
        .json(&json!({
            "title": "Rated event",
            "description": "x",
            "location": "x",
            "start_time": "2026-09-01T18:00:00Z",
            "end_time": "2026-09-01T21:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create event");
    let event: EventDetail = response.json().await.expect("Failed to parse event");

    let response = client
        .post(format!("{}/api/events/{}/reviews", API_BASE_URL, event.id))
        .bearer_auth(&alice.access)
        .json(&json!({ "rating": 6 }))
        .send()
        .await
        .expect("Failed to send review");
    assert_eq!(response.status(), 400);

    // Unknown RSVP status
    let response = client
        .post(format!("{}/api/events/{}/rsvp", API_BASE_URL, event.id))
        .bearer_auth(&alice.access)
        .json(&json!({ "status": "attending" }))
        .send()
        .await
        .expect("Failed to send rsvp");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_auth_workflow() {
    let client = reqwest::Client::new();

    let username = unique("carol");
    let pair = register(&client, &username).await;

    // Credentials also work through the token endpoint
    let response = client
        .post(format!("{}/api/auth/token", API_BASE_URL))
        .json(&json!({ "username": username, "password": "a-long-password" }))
        .send()
        .await
        .expect("Failed to obtain token");
    assert_eq!(response.status(), 200);
    let fresh: TokenPair = response.json().await.expect("Failed to parse pair");

    // Refresh yields a new access token
    let response = client
        .post(format!("{}/api/auth/token/refresh", API_BASE_URL))
        .json(&json!({ "refresh": fresh.refresh }))
        .send()
        .await
        .expect("Failed to refresh");
    assert_eq!(response.status(), 200);

    // Access tokens are rejected where a refresh token is expected
    let response = client
        .post(format!("{}/api/auth/token/refresh", API_BASE_URL))
        .json(&json!({ "refresh": fresh.access }))
        .send()
        .await
        .expect("Failed to send refresh");
    assert_eq!(response.status(), 401);

    // Bad credentials are rejected
    let response = client
        .post(format!("{}/api/auth/token", API_BASE_URL))
        .json(&json!({ "username": username, "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send token request");
    assert_eq!(response.status(), 401);

    // Duplicate registration conflicts
    let response = client
        .post(format!("{}/api/auth/register", API_BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "a-long-password"
        }))
        .send()
        .await
        .expect("Failed to send register");
    assert_eq!(response.status(), 409);

    // /auth/me returns the profile
    let response = client
        .get(format!("{}/api/auth/me", API_BASE_URL))
        .bearer_auth(&pair.access)
        .send()
        .await
        .expect("Failed to get me");
    assert_eq!(response.status(), 200);
    let me: Profile = response.json().await.expect("Failed to parse profile");
    assert_eq!(me.username, username);

    // Profile can be updated by its owner
    let response = client
        .put(format!("{}/api/profiles/{}", API_BASE_URL, me.user_id))
        .bearer_auth(&pair.access)
        .json(&json!({ "full_name": "Carol Example", "location": "Oslo" }))
        .send()
        .await
        .expect("Failed to update profile");
    assert_eq!(response.status(), 200);
    let updated: Profile = response.json().await.expect("Failed to parse profile");
    assert_eq!(updated.full_name.as_deref(), Some("Carol Example"));
}

#[tokio::test]
#[ignore]
async fn test_health_endpoint() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", API_BASE_URL))
        .send()
        .await
        .expect("Failed to call health endpoint");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[ignore]
async fn test_openapi_spec() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api-doc/openapi.json", API_BASE_URL))
        .send()
        .await
        .expect("Failed to get OpenAPI spec");

    assert_eq!(response.status(), 200);
    let spec: serde_json::Value = response.json().await.expect("Failed to parse spec");
    assert_eq!(spec["info"]["title"], "Gatherly API");
}
