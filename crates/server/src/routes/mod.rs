//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Pages
//! GET  /                       - Landing page with the current event
//!
//! # Auth (name-based sign-in; real authentication is out of scope)
//! GET  /login                  - Login page
//! POST /login                  - Sign in (creates the user if new)
//! POST /logout                 - Sign out
//!
//! # Stores
//! GET  /store                  - Store listing
//! GET  /store/new              - Store creation form
//! POST /store/new              - Create store
//! GET  /store/{id}             - Store detail with event-creation form
//! GET  /store/{id}/update      - Store + menu editor
//! POST /store/{id}/update      - Apply store + menu edits atomically
//! POST|DELETE /store/{id}/delete - Delete store (owner rule applies)
//!
//! # Events and orders
//! POST /event/new              - Create an event for a store
//! GET  /event/{id}             - Event detail with order form
//! POST /event/{id}             - Upsert the acting user's order
//!
//! # JSON APIs (thin adapters over the same repositories)
//! /api/v1/...                  - Anonymous reads, authenticated writes
//! /api/v2/...                  - Authentication required throughout
//! ```

use axum::Router;

use crate::state::AppState;

pub mod api;
pub mod auth;
pub mod events;
pub mod home;
pub mod stores;

/// Build the application router (everything except health endpoints and
/// middleware, which `crate::app` adds).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(home::router())
        .merge(auth::router())
        .merge(stores::router())
        .merge(events::router())
        .merge(api::router())
}
