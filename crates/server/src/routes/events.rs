//! Event and order workflow.
//!
//! An event is one lunch-ordering window for a store. Each signed-in
//! user has at most one order per event; submitting the form again
//! updates the existing order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use lunchbox_core::EventId;

use crate::db::{EventRepository, OrderRepository, StoreRepository};
use crate::error::AppError;
use crate::filters;
use crate::forms::OrderForm;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Event};
use crate::state::AppState;

use super::stores::{MenuItemView, StoreView};

// =============================================================================
// Views and templates
// =============================================================================

/// A placed order as listed on the event detail page.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub user_name: String,
    pub item_name: String,
    pub item_price: i64,
    pub notes: String,
}

/// Event detail template with the order form.
#[derive(Template, WebTemplate)]
#[template(path = "events/detail.html")]
pub struct EventDetailTemplate {
    pub user: Option<CurrentUser>,
    pub event_id: i64,
    pub store: StoreView,
    pub menu: Vec<MenuItemView>,
    /// The item the acting user already ordered, for pre-selection.
    pub selected_item: Option<i64>,
    pub notes: String,
    pub orders: Vec<OrderView>,
}

/// Event creation form fields (posted from the store detail page).
#[derive(Debug, Deserialize)]
pub struct EventForm {
    pub store: i64,
}

/// Build the event router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/event/new", post(event_create))
        .route("/event/{id}", get(event_detail).post(order_submit))
}

async fn load_event(state: &AppState, id: i64) -> Result<Event, AppError> {
    EventRepository::new(state.pool())
        .get(EventId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {id}")))
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an event for a store.
///
/// POST /event/new
#[instrument(skip(state, user, form))]
async fn event_create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<EventForm>,
) -> Result<Redirect, AppError> {
    let event = EventRepository::new(state.pool())
        .create(lunchbox_core::StoreId::new(form.store))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("store {}", form.store))
            }
            other => other.into(),
        })?;

    tracing::info!(event = %event.id, store = %event.store_id, user = %user.id, "event created");
    Ok(Redirect::to(&format!("/event/{}", event.id)))
}

/// Display an event with its order form.
///
/// The item choices are limited to the event's store's menu, and the
/// form is pre-filled when the acting user already has an order.
///
/// GET /event/{id}
#[instrument(skip(state, user))]
async fn event_detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<EventDetailTemplate, AppError> {
    let event = load_event(&state, id).await?;

    let stores = StoreRepository::new(state.pool());
    let store = stores
        .get(event.store_id)
        .await?
        .ok_or_else(|| AppError::Internal("event references missing store".to_owned()))?;
    let menu = stores.menu_items(event.store_id).await?;

    let orders = OrderRepository::new(state.pool());
    let existing = orders.find(event.id, user.id).await?;
    let placed = orders.list_for_event(event.id).await?;

    Ok(EventDetailTemplate {
        event_id: event.id.as_i64(),
        store: StoreView::from(&store),
        menu: menu.iter().map(MenuItemView::from).collect(),
        selected_item: existing.as_ref().map(|o| o.item_id.as_i64()),
        notes: existing.map(|o| o.notes).unwrap_or_default(),
        orders: placed
            .into_iter()
            .map(|details| OrderView {
                user_name: details.user_name,
                item_name: details.item_name,
                item_price: details.item_price.amount(),
                notes: details.order.notes,
            })
            .collect(),
        user: Some(user),
    })
}

/// Create or update the acting user's order for this event.
///
/// The order's user and event always come from the session and the path;
/// client-supplied values cannot move an order to someone else. The item
/// must be on the event's store's menu.
///
/// POST /event/{id}
#[instrument(skip(state, user, form))]
async fn order_submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Form(form): Form<OrderForm>,
) -> Result<Response, AppError> {
    let event = load_event(&state, id).await?;

    let allowed: Vec<_> = StoreRepository::new(state.pool())
        .menu_items(event.store_id)
        .await?
        .iter()
        .map(|item| item.id)
        .collect();

    let (item, notes) = form
        .validate(&allowed)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let order = OrderRepository::new(state.pool())
        .upsert(event.id, user.id, item, &notes)
        .await?;
    tracing::info!(order = %order.id, event = %event.id, user = %user.id, "order recorded");

    Ok(Redirect::to(&format!("/event/{}", event.id)).into_response())
}
