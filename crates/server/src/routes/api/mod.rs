//! JSON API surfaces for stores and menu items.
//!
//! Two conventions coexist for compatibility with older clients:
//!
//! - `/api/v1` allows anonymous reads but requires a signed-in user for
//!   writes,
//! - `/api/v2` requires a signed-in user for everything.
//!
//! Both are thin adapters over the repositories and the shared deletion
//! rule; neither re-implements validation or cascade behavior.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

pub mod menu_items;
pub mod stores;

/// Error response body for API endpoints.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Build both API routers.
pub fn router() -> Router<AppState> {
    Router::new()
        // v1: anonymous reads, authenticated writes
        .route(
            "/api/v1/store",
            get(stores::list).post(stores::create),
        )
        .route(
            "/api/v1/store/{id}",
            get(stores::detail)
                .put(stores::update)
                .delete(stores::delete),
        )
        .route("/api/v1/menu-item", post(menu_items::create))
        .route(
            "/api/v1/menu-item/{id}",
            put(menu_items::update).delete(menu_items::delete),
        )
        // v2: everything requires a signed-in user
        .route("/api/v2/store", get(stores::list_authed))
        .route("/api/v2/store/{id}", get(stores::detail_authed))
        .route("/api/v2/menu-item", post(menu_items::create))
        .route(
            "/api/v2/menu-item/{id}",
            put(menu_items::update).delete(menu_items::delete),
        )
}
