//! Persistence layer. Everything the handlers need from the database goes
//! through [`sqlite::SqliteStore`].

use thiserror::Error;

pub mod sqlite;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
