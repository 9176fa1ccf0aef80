//! Event repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use lunchbox_core::{EventId, StoreId};

use super::RepositoryError;
use crate::models::Event;

/// Internal row type for event queries.
#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i64,
    store_id: i64,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::new(row.id),
            store_id: StoreId::new(row.store_id),
            created_at: row.created_at,
        }
    }
}

/// Repository for event database operations.
pub struct EventRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an event for a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(&self, store_id: StoreId) -> Result<Event, RepositoryError> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stores WHERE id = ?")
            .bind(store_id)
            .fetch_one(self.pool)
            .await?;
        if exists == 0 {
            return Err(RepositoryError::NotFound);
        }

        let row = sqlx::query_as::<_, EventRow>(
            "INSERT INTO events (store_id) VALUES (?) RETURNING id, store_id, created_at",
        )
        .bind(store_id)
        .fetch_one(self.pool)
        .await?;

        Ok(Event::from(row))
    }

    /// Fetch one event by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, store_id, created_at FROM events WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    /// The most recently created event across all stores, if any.
    ///
    /// Recency is keyed by row id, not by timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(&self) -> Result<Option<Event>, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, store_id, created_at FROM events ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Event::from))
    }
}
