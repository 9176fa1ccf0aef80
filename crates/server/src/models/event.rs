//! Lunch events and the orders placed against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lunchbox_core::{EventId, MenuItemId, OrderId, Price, StoreId, UserId};

/// One instance of "today's lunch order window" for a store.
///
/// Events are ordered by id; the landing page treats the highest id as
/// the current event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub store_id: StoreId,
    pub created_at: DateTime<Utc>,
}

/// One user's chosen menu item (plus notes) for one event.
///
/// At most one order exists per (event, user); re-submitting replaces the
/// item and notes on the existing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub item_id: MenuItemId,
    pub notes: String,
}

/// An order joined with the ordering user and chosen item, for display on
/// the event detail page.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub user_name: String,
    pub item_name: String,
    pub item_price: Price,
}
