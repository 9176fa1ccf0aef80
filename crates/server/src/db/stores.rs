//! Store and menu item repository.
//!
//! The store update operation edits the store row and its menu item rows
//! as one transaction: either every change lands or none do.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use lunchbox_core::{MenuItemId, Price, StoreId, UserId};

use super::RepositoryError;
use crate::models::{MenuItem, Store};

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: i64,
    owner_id: Option<i64>,
    name: String,
    notes: String,
    created_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            owner_id: row.owner_id.map(UserId::new),
            name: row.name,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for menu item queries.
#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    store_id: i64,
    name: String,
    price: i64,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: MenuItemId::new(row.id),
            store_id: StoreId::new(row.store_id),
            name: row.name,
            price: Price::new(row.price),
        }
    }
}

/// Fields for a new store.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub notes: String,
    /// Set only when the creating request was authenticated.
    pub owner_id: Option<UserId>,
}

/// A validated store update: new field values plus the menu edits that
/// must be applied with them atomically.
#[derive(Debug, Clone)]
pub struct StoreUpdate {
    pub name: String,
    pub notes: String,
    pub menu: Vec<MenuChange>,
}

/// One edit to a store's menu.
#[derive(Debug, Clone)]
pub enum MenuChange {
    /// Update an existing row (must belong to the store being edited).
    Update {
        id: MenuItemId,
        name: String,
        price: Price,
    },
    /// Add a new row.
    Insert { name: String, price: Price },
    /// Remove an existing row.
    Delete { id: MenuItemId },
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all stores in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            "SELECT id, owner_id, name, notes, created_at FROM stores ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Store::from).collect())
    }

    /// Fetch one store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            "SELECT id, owner_id, name, notes, created_at FROM stores WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Store::from))
    }

    /// List a store's menu items in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn menu_items(&self, store_id: StoreId) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            "SELECT id, store_id, name, price FROM menu_items WHERE store_id = ? ORDER BY id",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Fetch one menu item by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_menu_item(
        &self,
        id: MenuItemId,
    ) -> Result<Option<MenuItem>, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            "SELECT id, store_id, name, price FROM menu_items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(MenuItem::from))
    }

    /// Create a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewStore) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            "INSERT INTO stores (owner_id, name, notes) VALUES (?, ?, ?) \
             RETURNING id, owner_id, name, notes, created_at",
        )
        .bind(new.owner_id)
        .bind(&new.name)
        .bind(&new.notes)
        .fetch_one(self.pool)
        .await?;

        Ok(Store::from(row))
    }

    /// Add a menu item to a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn create_menu_item(
        &self,
        store_id: StoreId,
        name: &str,
        price: Price,
    ) -> Result<MenuItem, RepositoryError> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stores WHERE id = ?")
            .bind(store_id)
            .fetch_one(self.pool)
            .await?;
        if exists == 0 {
            return Err(RepositoryError::NotFound);
        }

        let row = sqlx::query_as::<_, MenuItemRow>(
            "INSERT INTO menu_items (store_id, name, price) VALUES (?, ?, ?) \
             RETURNING id, store_id, name, price",
        )
        .bind(store_id)
        .bind(name)
        .bind(price)
        .fetch_one(self.pool)
        .await?;

        Ok(MenuItem::from(row))
    }

    /// Update an existing menu item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn update_menu_item(
        &self,
        id: MenuItemId,
        name: &str,
        price: Price,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE menu_items SET name = ?, price = ? WHERE id = ?")
            .bind(name)
            .bind(price)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a menu item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Apply a store update and its menu edits in one transaction.
    ///
    /// Menu edits are scoped to the store being edited; a change naming a
    /// row from another store rolls the whole update back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store or a named menu
    /// row does not exist (or belongs to another store),
    /// `RepositoryError::Database` for other failures.
    pub async fn update_with_menu(
        &self,
        id: StoreId,
        update: &StoreUpdate,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE stores SET name = ?, notes = ? WHERE id = ?")
            .bind(&update.name)
            .bind(&update.notes)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        for change in &update.menu {
            match change {
                MenuChange::Update {
                    id: item_id,
                    name,
                    price,
                } => {
                    let result = sqlx::query(
                        "UPDATE menu_items SET name = ?, price = ? \
                         WHERE id = ? AND store_id = ?",
                    )
                    .bind(name)
                    .bind(price)
                    .bind(item_id)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                    if result.rows_affected() == 0 {
                        return Err(RepositoryError::NotFound);
                    }
                }
                MenuChange::Insert { name, price } => {
                    sqlx::query("INSERT INTO menu_items (store_id, name, price) VALUES (?, ?, ?)")
                        .bind(id)
                        .bind(name)
                        .bind(price)
                        .execute(&mut *tx)
                        .await?;
                }
                MenuChange::Delete { id: item_id } => {
                    let result =
                        sqlx::query("DELETE FROM menu_items WHERE id = ? AND store_id = ?")
                            .bind(item_id)
                            .bind(id)
                            .execute(&mut *tx)
                            .await?;
                    if result.rows_affected() == 0 {
                        return Err(RepositoryError::NotFound);
                    }
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a store, cascading to its menu items, events, and orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn delete(&self, id: StoreId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
