//! Domain models.

pub mod event;
pub mod session;
pub mod store;
pub mod user;

pub use event::{Event, Order, OrderDetails};
pub use session::{CurrentUser, session_keys};
pub use store::{MenuItem, Store};
pub use user::User;
