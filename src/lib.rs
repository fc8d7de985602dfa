//! Booking Agent library crate, shared by the binary and integration tests.
//!
//! Accepts `POST /book`, validates the payload and persists one confirmed
//! booking per request into SQLite.

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod store;

use store::sqlite::SqliteStore;

/// Shared application state passed to handlers.
pub struct AppState {
    pub db: SqliteStore,
    pub config: config::Config,
}
