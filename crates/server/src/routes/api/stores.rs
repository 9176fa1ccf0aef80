//! Store API handlers, shared by both API conventions.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lunchbox_core::StoreId;

use crate::db::StoreRepository;
use crate::db::stores::NewStore;
use crate::error::AppError;
use crate::forms::StoreForm;
use crate::middleware::RequireAuth;
use crate::models::{MenuItem, Store};
use crate::state::AppState;

use super::ApiError;

// =============================================================================
// Payloads
// =============================================================================

/// A menu item as serialized by the APIs.
#[derive(Debug, Serialize)]
pub struct MenuItemPayload {
    pub id: i64,
    pub name: String,
    pub price: i64,
}

impl From<&MenuItem> for MenuItemPayload {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name.clone(),
            price: item.price.amount(),
        }
    }
}

/// A store with its nested menu, as serialized by the APIs.
#[derive(Debug, Serialize)]
pub struct StorePayload {
    pub id: i64,
    pub name: String,
    pub notes: String,
    pub owner: Option<i64>,
    pub menu_items: Vec<MenuItemPayload>,
}

impl StorePayload {
    fn new(store: &Store, menu: &[MenuItem]) -> Self {
        Self {
            id: store.id.as_i64(),
            name: store.name.clone(),
            notes: store.notes.clone(),
            owner: store.owner_id.map(|id| id.as_i64()),
            menu_items: menu.iter().map(MenuItemPayload::from).collect(),
        }
    }
}

/// Request body for store create/update.
#[derive(Debug, Deserialize)]
pub struct StoreWriteRequest {
    pub name: String,
    #[serde(default)]
    pub notes: String,
}

impl StoreWriteRequest {
    /// Run the same validation the HTML workflow uses.
    fn validate(&self) -> Result<(String, String), ApiError> {
        StoreForm {
            name: self.name.clone(),
            notes: self.notes.clone(),
        }
        .validate()
        .map_err(|errors| {
            ApiError::new(errors.name.unwrap_or_else(|| "invalid store".to_owned()))
        })
    }
}

// =============================================================================
// Shared fetches
// =============================================================================

async fn fetch_all(state: &AppState) -> Result<Vec<StorePayload>, AppError> {
    let repo = StoreRepository::new(state.pool());
    let stores = repo.list_all().await?;

    let mut payloads = Vec::with_capacity(stores.len());
    for store in &stores {
        let menu = repo.menu_items(store.id).await?;
        payloads.push(StorePayload::new(store, &menu));
    }
    Ok(payloads)
}

async fn fetch_one(state: &AppState, id: i64) -> Result<StorePayload, AppError> {
    let repo = StoreRepository::new(state.pool());
    let id = StoreId::new(id);
    let store = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;
    let menu = repo.menu_items(id).await?;
    Ok(StorePayload::new(&store, &menu))
}

// =============================================================================
// Reads
// =============================================================================

/// List stores with nested menus (anonymous allowed).
///
/// GET /api/v1/store
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<StorePayload>>, AppError> {
    Ok(Json(fetch_all(&state).await?))
}

/// Fetch one store (anonymous allowed).
///
/// GET /api/v1/store/{id}
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StorePayload>, AppError> {
    Ok(Json(fetch_one(&state, id).await?))
}

/// List stores (signed-in users only).
///
/// GET /api/v2/store
#[instrument(skip(state, _user))]
pub async fn list_authed(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<StorePayload>>, AppError> {
    Ok(Json(fetch_all(&state).await?))
}

/// Fetch one store (signed-in users only).
///
/// GET /api/v2/store/{id}
#[instrument(skip(state, _user))]
pub async fn detail_authed(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<StorePayload>, AppError> {
    Ok(Json(fetch_one(&state, id).await?))
}

// =============================================================================
// Writes (authenticated on every surface)
// =============================================================================

/// Create a store. The signed-in caller becomes the owner.
///
/// POST /api/v1/store
#[instrument(skip(state, user, req))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<StoreWriteRequest>,
) -> Result<Response, AppError> {
    let (name, notes) = match req.validate() {
        Ok(fields) => fields,
        Err(e) => return Ok(e.into_response()),
    };

    let store = StoreRepository::new(state.pool())
        .create(&NewStore {
            name,
            notes,
            owner_id: Some(user.id),
        })
        .await?;
    let payload = fetch_one(&state, store.id.as_i64()).await?;

    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

/// Update a store's own fields (menu rows have their own endpoints).
///
/// PUT /api/v1/store/{id}
#[instrument(skip(state, _user, req))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
    Json(req): Json<StoreWriteRequest>,
) -> Result<Response, AppError> {
    let (name, notes) = match req.validate() {
        Ok(fields) => fields,
        Err(e) => return Ok(e.into_response()),
    };

    let repo = StoreRepository::new(state.pool());
    let store_id = StoreId::new(id);
    if repo.get(store_id).await?.is_none() {
        return Err(AppError::NotFound(format!("store {id}")));
    }

    repo.update_with_menu(
        store_id,
        &crate::db::stores::StoreUpdate {
            name,
            notes,
            menu: Vec::new(),
        },
    )
    .await?;

    Ok(Json(fetch_one(&state, id).await?).into_response())
}

/// Delete a store. Consults the same ownership rule as the HTML
/// workflow.
///
/// DELETE /api/v1/store/{id}
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let repo = StoreRepository::new(state.pool());
    let store_id = StoreId::new(id);
    let store = repo
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;

    if !store.deletable_by(&user) {
        return Err(AppError::Forbidden(format!(
            "store {id} belongs to another user"
        )));
    }

    repo.delete(store_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
