//! User repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use lunchbox_core::UserId;

use super::RepositoryError;
use crate::models::User;

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    can_delete_stores: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            name: row.name,
            can_delete_stores: row.can_delete_stores,
            created_at: row.created_at,
        }
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, can_delete_stores, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Fetch a user by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, can_delete_stores, created_at FROM users WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the name is already taken,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(
        &self,
        name: &str,
        can_delete_stores: bool,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, can_delete_stores) VALUES (?, ?) \
             RETURNING id, name, can_delete_stores, created_at",
        )
        .bind(name)
        .bind(can_delete_stores)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "user name already taken"))?;

        Ok(User::from(row))
    }

    /// Fetch a user by name, creating it if absent.
    ///
    /// Two concurrent sign-ins for a new name race on the unique index;
    /// the loser re-reads the winner's row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the queries fail.
    pub async fn get_or_create(&self, name: &str) -> Result<User, RepositoryError> {
        if let Some(user) = self.get_by_name(name).await? {
            return Ok(user);
        }

        match self.create(name, false).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::Conflict(_)) => {
                self.get_by_name(name).await?.ok_or(RepositoryError::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Set the global delete-stores grant for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn set_can_delete_stores(
        &self,
        id: UserId,
        can_delete_stores: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET can_delete_stores = ? WHERE id = ?")
            .bind(can_delete_stores)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
