//! User management commands.
//!
//! ```bash
//! # Create a user
//! lunchbox user create -n "Alice"
//!
//! # Create a user who may delete any store
//! lunchbox user create -n "Alice" --can-delete-stores
//! ```

use lunchbox_server::db::{RepositoryError, UserRepository};

use super::CommandError;

/// Create a new user.
///
/// # Errors
///
/// Returns `CommandError::Invalid` if the name is empty or already
/// taken.
pub async fn create(name: &str, can_delete_stores: bool) -> Result<(), CommandError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::Invalid("Name must not be empty".to_owned()));
    }

    let pool = super::connect().await?;

    let user = UserRepository::new(&pool)
        .create(name, can_delete_stores)
        .await
        .map_err(|err| match err {
            RepositoryError::Conflict(_) => {
                CommandError::Invalid(format!("User already exists with name: {name}"))
            }
            other => CommandError::Invalid(other.to_string()),
        })?;

    tracing::info!(
        "User created successfully! ID: {}, Name: {}, can_delete_stores: {}",
        user.id,
        user.name,
        user.can_delete_stores
    );
    Ok(())
}
