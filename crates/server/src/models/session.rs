//! Session model for the acting user.

use serde::{Deserialize, Serialize};

use lunchbox_core::UserId;

use super::User;

/// Session storage keys.
pub mod session_keys {
    /// Key under which the signed-in user is stored.
    pub const CURRENT_USER: &str = "current_user";
}

/// The acting user as stored in the session.
///
/// This is the single capability the workflows consume from the auth
/// subsystem: "the current acting user, or none".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub can_delete_stores: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            can_delete_stores: user.can_delete_stores,
        }
    }
}
