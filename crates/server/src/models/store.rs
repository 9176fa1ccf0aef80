//! Stores and their menus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lunchbox_core::{MenuItemId, Price, StoreId, UserId, can_user_delete};

use super::CurrentUser;

/// A vendor offering menu items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    /// Owning user; `None` marks an unowned/legacy store.
    pub owner_id: Option<UserId>,
    pub name: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// Whether `user` may delete this store. Delegates to the shared rule
    /// so the HTML workflow and the APIs cannot drift apart.
    #[must_use]
    pub fn deletable_by(&self, user: &CurrentUser) -> bool {
        can_user_delete(self.owner_id, user.id, user.can_delete_stores)
    }
}

/// A priced item belonging to one store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub store_id: StoreId,
    pub name: String,
    pub price: Price,
}
