//! Store CRUD workflow.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, RawForm, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tracing::instrument;

use lunchbox_core::StoreId;

use crate::db::StoreRepository;
use crate::db::stores::NewStore;
use crate::error::AppError;
use crate::filters;
use crate::forms::{StoreForm, StoreUpdateForm};
use crate::middleware::{OptionalUser, RequireAuth};
use crate::models::{CurrentUser, MenuItem, Store};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Store view for template rendering.
#[derive(Debug, Clone)]
pub struct StoreView {
    pub id: i64,
    pub name: String,
    pub notes: String,
}

impl From<&Store> for StoreView {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id.as_i64(),
            name: store.name.clone(),
            notes: store.notes.clone(),
        }
    }
}

/// Menu item view for template rendering.
#[derive(Debug, Clone)]
pub struct MenuItemView {
    pub id: i64,
    pub name: String,
    pub price: i64,
}

impl From<&MenuItem> for MenuItemView {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name.clone(),
            price: item.price.amount(),
        }
    }
}

/// One row of the menu editor, carrying its own error if validation
/// rejected it.
#[derive(Debug, Clone)]
pub struct MenuRowView {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub price: String,
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Store listing template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/list.html")]
pub struct StoreListTemplate {
    pub user: Option<CurrentUser>,
    pub stores: Vec<StoreView>,
}

/// Store detail template, with the embedded event-creation form.
#[derive(Template, WebTemplate)]
#[template(path = "stores/detail.html")]
pub struct StoreDetailTemplate {
    pub user: Option<CurrentUser>,
    pub store: StoreView,
    pub menu: Vec<MenuItemView>,
    pub can_delete: bool,
}

/// Store creation form template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/create.html")]
pub struct StoreCreateTemplate {
    pub user: Option<CurrentUser>,
    pub name: String,
    pub notes: String,
    pub name_error: Option<String>,
}

/// Store + menu editor template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/update.html")]
pub struct StoreUpdateTemplate {
    pub user: Option<CurrentUser>,
    pub store_id: i64,
    pub name: String,
    pub notes: String,
    pub name_error: Option<String>,
    pub rows: Vec<MenuRowView>,
    /// Index for the next blank editor row.
    pub next_index: usize,
}

/// Build the store router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/store", get(store_list))
        .route("/store/new", get(store_create_page).post(store_create))
        .route("/store/{id}", get(store_detail))
        .route(
            "/store/{id}/update",
            get(store_update_page).post(store_update),
        )
        .route(
            "/store/{id}/delete",
            axum::routing::post(store_delete).delete(store_delete),
        )
}

// =============================================================================
// List and detail
// =============================================================================

/// List all stores.
///
/// GET /store
#[instrument(skip(state, user))]
async fn store_list(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<StoreListTemplate, AppError> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;
    Ok(StoreListTemplate {
        user,
        stores: stores.iter().map(StoreView::from).collect(),
    })
}

/// Display one store with its menu and an event-creation form.
///
/// GET /store/{id}
#[instrument(skip(state, user))]
async fn store_detail(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
) -> Result<StoreDetailTemplate, AppError> {
    let repo = StoreRepository::new(state.pool());
    let id = StoreId::new(id);
    let store = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;
    let menu = repo.menu_items(id).await?;

    let can_delete = user.as_ref().is_some_and(|u| store.deletable_by(u));

    Ok(StoreDetailTemplate {
        user,
        store: StoreView::from(&store),
        menu: menu.iter().map(MenuItemView::from).collect(),
        can_delete,
    })
}

// =============================================================================
// Create
// =============================================================================

/// Display the store creation form.
///
/// GET /store/new
async fn store_create_page(OptionalUser(user): OptionalUser) -> StoreCreateTemplate {
    StoreCreateTemplate {
        user,
        name: String::new(),
        notes: String::new(),
        name_error: None,
    }
}

/// Create a store.
///
/// Anonymous creation is allowed; the owner is recorded only when the
/// request is authenticated.
///
/// POST /store/new
#[instrument(skip(state, user, form))]
async fn store_create(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Form(form): Form<StoreForm>,
) -> Result<Response, AppError> {
    let (name, notes) = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            let template = StoreCreateTemplate {
                user,
                name: form.name,
                notes: form.notes,
                name_error: errors.name,
            };
            return Ok((StatusCode::BAD_REQUEST, template).into_response());
        }
    };

    let store = StoreRepository::new(state.pool())
        .create(&NewStore {
            name,
            notes,
            owner_id: user.map(|u| u.id),
        })
        .await?;

    Ok(Redirect::to(&format!("/store/{}", store.id)).into_response())
}

// =============================================================================
// Update
// =============================================================================

fn rows_from_menu(menu: &[MenuItem]) -> Vec<MenuRowView> {
    menu.iter()
        .enumerate()
        .map(|(index, item)| MenuRowView {
            index,
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price.to_string(),
            error: None,
        })
        .collect()
}

/// Display the store + menu editor.
///
/// GET /store/{id}/update
#[instrument(skip(state, user))]
async fn store_update_page(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
) -> Result<StoreUpdateTemplate, AppError> {
    let repo = StoreRepository::new(state.pool());
    let id = StoreId::new(id);
    let store = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;
    let menu = repo.menu_items(id).await?;
    let rows = rows_from_menu(&menu);

    Ok(StoreUpdateTemplate {
        user,
        store_id: store.id.as_i64(),
        name: store.name,
        notes: store.notes,
        name_error: None,
        next_index: rows.len(),
        rows,
    })
}

/// Apply a store update together with its menu edits.
///
/// Validation covers the store fields and every submitted row at once;
/// any failure re-renders the form and persists nothing.
///
/// POST /store/{id}/update
#[instrument(skip(state, user, body))]
async fn store_update(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
    RawForm(body): RawForm,
) -> Result<Response, AppError> {
    let repo = StoreRepository::new(state.pool());
    let id = StoreId::new(id);
    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound(format!("store {id}")));
    }

    let form = StoreUpdateForm::parse(&body);
    match form.validate() {
        Ok(update) => {
            repo.update_with_menu(id, &update).await?;
            Ok(Redirect::to(&format!("/store/{id}")).into_response())
        }
        Err(errors) => {
            let rows = form
                .rows
                .iter()
                .enumerate()
                .map(|(index, row)| MenuRowView {
                    index,
                    id: row.id.clone(),
                    name: row.name.clone(),
                    price: row.price.clone(),
                    error: errors.rows.get(index).cloned().flatten(),
                })
                .collect::<Vec<_>>();

            let template = StoreUpdateTemplate {
                user,
                store_id: id.as_i64(),
                name: form.name,
                notes: form.notes,
                name_error: errors.name,
                next_index: rows.len(),
                rows,
            };
            Ok((StatusCode::BAD_REQUEST, template).into_response())
        }
    }
}

// =============================================================================
// Delete
// =============================================================================

/// Delete a store, cascading to menu items, events, and orders.
///
/// Requires a signed-in user before the ownership rule is consulted.
/// AJAX-style callers (X-Requested-With) get an empty success body;
/// everyone else is redirected to the store list.
///
/// POST|DELETE /store/{id}/delete
#[instrument(skip(state, user, headers))]
async fn store_delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let repo = StoreRepository::new(state.pool());
    let id = StoreId::new(id);
    let store = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;

    if !store.deletable_by(&user) {
        return Err(AppError::Forbidden(format!(
            "store {id} belongs to another user"
        )));
    }

    repo.delete(id).await?;
    tracing::info!(store = %id, user = %user.id, "store deleted");

    let is_ajax = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    if is_ajax {
        Ok(StatusCode::OK.into_response())
    } else {
        Ok(Redirect::to("/store").into_response())
    }
}
