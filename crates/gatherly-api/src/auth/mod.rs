// Authentication module
// Decision: stateless JWT access/refresh pair, no server-side session table

pub mod config;
pub mod extract;
pub mod jwt;
pub mod routes;

pub use config::AuthConfig;
pub use extract::{CurrentUser, MaybeUser};
pub use jwt::TokenService;
pub use routes::routes;
