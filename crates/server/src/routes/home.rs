//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tracing::instrument;

use crate::db::{EventRepository, StoreRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;
use crate::state::AppState;

/// The current event as shown on the landing page.
#[derive(Debug, Clone)]
pub struct CurrentEventView {
    pub event_id: i64,
    pub store_name: String,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub current_event: Option<CurrentEventView>,
}

/// Build the landing page router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

/// Render the landing page.
///
/// The "current event" is the most recently created event across all
/// stores; with no events yet the page degrades to a friendly prompt.
///
/// GET /
#[instrument(skip(state, user))]
async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<HomeTemplate, AppError> {
    let events = EventRepository::new(state.pool());
    let stores = StoreRepository::new(state.pool());

    let current_event = match events.latest().await? {
        Some(event) => {
            let store = stores
                .get(event.store_id)
                .await?
                .ok_or_else(|| AppError::Internal("event references missing store".to_owned()))?;
            Some(CurrentEventView {
                event_id: event.id.as_i64(),
                store_name: store.name,
            })
        }
        None => None,
    };

    Ok(HomeTemplate {
        user,
        current_event,
    })
}
