// Service layer: business rules between the HTTP handlers and storage

mod account;
mod event;
mod profile;
mod review;
mod rsvp;

pub use account::AccountService;
pub use event::EventService;
pub use profile::ProfileService;
pub use review::ReviewService;
pub use rsvp::RsvpService;
