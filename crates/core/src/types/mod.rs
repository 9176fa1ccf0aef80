//! Shared newtype wrappers.

pub mod id;
pub mod price;

pub use id::{EventId, MenuItemId, OrderId, StoreId, UserId};
pub use price::Price;
