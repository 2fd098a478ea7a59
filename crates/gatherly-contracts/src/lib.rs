// Public contracts for the Gatherly API
// This crate defines the DTOs exchanged over HTTP; database rows live in
// gatherly-storage and may differ from these shapes.

pub mod auth;
pub mod common;
pub mod event;
pub mod review;
pub mod rsvp;
pub mod user;

pub use auth::*;
pub use common::*;
pub use event::*;
pub use review::*;
pub use rsvp::*;
pub use user::*;
