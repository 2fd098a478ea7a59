// Postgres storage layer with sqlx
//
// This crate provides the database layer for the Gatherly API:
// - Database: repository over a PgPool with all queries
// - row structs and Create/Update inputs (internal, may differ from public DTOs)
// - password: argon2 hashing and verification

pub mod models;
pub mod password;
pub mod repositories;

pub use models::*;
pub use password::{hash_password, verify_password};
pub use repositories::{is_unique_violation, Database};
