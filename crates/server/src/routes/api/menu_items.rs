//! Menu item API handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use lunchbox_core::{MenuItemId, Price, StoreId};

use crate::db::StoreRepository;
use crate::error::AppError;
use crate::forms::validate_name;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::ApiError;
use super::stores::MenuItemPayload;

/// Request body for menu item creation.
#[derive(Debug, Deserialize)]
pub struct MenuItemCreateRequest {
    pub store: i64,
    pub name: String,
    pub price: i64,
}

/// Request body for menu item updates.
#[derive(Debug, Deserialize)]
pub struct MenuItemUpdateRequest {
    pub name: String,
    pub price: i64,
}

/// Add a menu item to a store.
///
/// POST /api/v1/menu-item
#[instrument(skip(state, _user, req))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(req): Json<MenuItemCreateRequest>,
) -> Result<Response, AppError> {
    let name = match validate_name(&req.name) {
        Ok(name) => name,
        Err(msg) => return Ok(ApiError::new(msg).into_response()),
    };

    let item = StoreRepository::new(state.pool())
        .create_menu_item(StoreId::new(req.store), &name, Price::new(req.price))
        .await?;

    Ok((StatusCode::CREATED, Json(MenuItemPayload::from(&item))).into_response())
}

/// Rename or reprice a menu item.
///
/// PUT /api/v1/menu-item/{id}
#[instrument(skip(state, _user, req))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
    Json(req): Json<MenuItemUpdateRequest>,
) -> Result<Response, AppError> {
    let name = match validate_name(&req.name) {
        Ok(name) => name,
        Err(msg) => return Ok(ApiError::new(msg).into_response()),
    };

    let repo = StoreRepository::new(state.pool());
    let id = MenuItemId::new(id);
    repo.update_menu_item(id, &name, Price::new(req.price))
        .await?;

    let item = repo
        .get_menu_item(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("menu item {id}")))?;

    Ok(Json(MenuItemPayload::from(&item)).into_response())
}

/// Remove a menu item. Existing orders for the item go with it.
///
/// DELETE /api/v1/menu-item/{id}
#[instrument(skip(state, _user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    StoreRepository::new(state.pool())
        .delete_menu_item(MenuItemId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
