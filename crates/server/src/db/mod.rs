//! Database operations for the SQLite store.
//!
//! ## Tables
//!
//! - `users` - Registered users and the global delete-stores grant
//! - `stores` - Vendors, optionally owned by a user
//! - `menu_items` - Priced items, children of a store
//! - `events` - Lunch-ordering windows, children of a store
//! - `orders` - One row per (event, user), upserted on re-submission
//! - `sessions` - tower-sessions storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p lunchbox-cli -- migrate
//! ```

pub mod events;
pub mod orders;
pub mod stores;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use events::EventRepository;
pub use orders::OrderRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Embedded migrations for the application schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g. duplicate user name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Translate a sqlx error, turning unique- and foreign-key-constraint
    /// violations into `Conflict` so callers never see a raw database
    /// error for them.
    pub(crate) fn from_sqlx(err: sqlx::Error, conflict_msg: &str) -> Self {
        let is_constraint = err.as_database_error().is_some_and(|db| {
            matches!(
                db.kind(),
                sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
            )
        });
        if is_constraint {
            Self::Conflict(conflict_msg.to_owned())
        } else {
            Self::Database(err)
        }
    }
}

/// Create a SQLite connection pool with sensible defaults.
///
/// Foreign key enforcement is enabled per connection; the cascade rules
/// in the schema depend on it.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
