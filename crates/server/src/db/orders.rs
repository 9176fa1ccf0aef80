//! Order repository.
//!
//! Orders are keyed by (event, user). The upsert leans on the unique
//! index so two concurrent submissions for the same pair resolve to a
//! single row, whichever insert wins.

use sqlx::SqlitePool;

use lunchbox_core::{EventId, MenuItemId, OrderId, Price, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderDetails};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    event_id: i64,
    user_id: i64,
    item_id: i64,
    notes: String,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            event_id: EventId::new(row.event_id),
            user_id: UserId::new(row.user_id),
            item_id: MenuItemId::new(row.item_id),
            notes: row.notes,
        }
    }
}

/// Internal row type for order listings joined with users and items.
#[derive(Debug, sqlx::FromRow)]
struct OrderDetailsRow {
    id: i64,
    event_id: i64,
    user_id: i64,
    item_id: i64,
    notes: String,
    user_name: String,
    item_name: String,
    item_price: i64,
}

impl From<OrderDetailsRow> for OrderDetails {
    fn from(row: OrderDetailsRow) -> Self {
        Self {
            order: Order {
                id: OrderId::new(row.id),
                event_id: EventId::new(row.event_id),
                user_id: UserId::new(row.user_id),
                item_id: MenuItemId::new(row.item_id),
                notes: row.notes,
            },
            user_name: row.user_name,
            item_name: row.item_name,
            item_price: Price::new(row.item_price),
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch the order a user placed against an event, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, event_id, user_id, item_id, notes FROM orders \
             WHERE event_id = ? AND user_id = ?",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Create or update the user's order for an event.
    ///
    /// A re-submission keeps the existing row's identity and replaces its
    /// item and notes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the item disappeared
    /// between validation and the insert (its foreign key no longer
    /// resolves), `RepositoryError::Database` for other failures.
    pub async fn upsert(
        &self,
        event_id: EventId,
        user_id: UserId,
        item_id: MenuItemId,
        notes: &str,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (event_id, user_id, item_id, notes) VALUES (?, ?, ?, ?) \
             ON CONFLICT (event_id, user_id) \
             DO UPDATE SET item_id = excluded.item_id, notes = excluded.notes \
             RETURNING id, event_id, user_id, item_id, notes",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(item_id)
        .bind(notes)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "ordered item is no longer on the menu"))?;

        Ok(Order::from(row))
    }

    /// List an event's orders with user and item details, in insertion
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<OrderDetails>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderDetailsRow>(
            "SELECT o.id, o.event_id, o.user_id, o.item_id, o.notes, \
                    u.name AS user_name, m.name AS item_name, m.price AS item_price \
             FROM orders o \
             JOIN users u ON u.id = o.user_id \
             JOIN menu_items m ON m.id = o.item_id \
             WHERE o.event_id = ? \
             ORDER BY o.id",
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderDetails::from).collect())
    }

    /// Count the orders for an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_event(&self, event_id: EventId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
