//! Request middleware: session layer and auth extractors.

pub mod auth;
pub mod session;

pub use auth::{OptionalUser, RequireAuth};
pub use session::{clear_current_user, create_session_layer, set_current_user};
