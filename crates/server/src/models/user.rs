//! Users of the lunch system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lunchbox_core::UserId;

/// A registered user.
///
/// Authentication is an external concern; the application only needs a
/// stable identity plus the one global grant the deletion rule consults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Global grant: may delete any store regardless of ownership.
    pub can_delete_stores: bool,
    pub created_at: DateTime<Utc>,
}
