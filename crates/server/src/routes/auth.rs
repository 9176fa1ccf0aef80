//! Sign-in routes.
//!
//! Authentication proper is delegated; this internal tool only needs to
//! know who is acting, so sign-in is by name and creates the user on
//! first use. The rest of the application consumes the session through
//! the extractors in `crate::middleware`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub name: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Display the login page.
///
/// GET /login
async fn login_page(Query(query): Query<LoginQuery>) -> LoginTemplate {
    let error = query.error.map(|e| match e.as_str() {
        "name" => "Please enter a name.".to_owned(),
        "session" => "Could not start a session, try again.".to_owned(),
        _ => e,
    });
    LoginTemplate { user: None, error }
}

/// Handle the login form.
///
/// POST /login
#[instrument(skip(state, session, form))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(Redirect::to("/login?error=name").into_response());
    }

    let users = UserRepository::new(state.pool());
    let user = users.get_or_create(name).await?;

    if let Err(e) = set_current_user(&session, &CurrentUser::from(&user)).await {
        tracing::error!(error = %e, "failed to set session");
        return Ok(Redirect::to("/login?error=session").into_response());
    }

    tracing::info!(user = %user.id, "signed in");
    Ok(Redirect::to("/").into_response())
}

/// Sign the current user out.
///
/// POST /logout
#[instrument(skip(session))]
async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!(error = %e, "failed to clear session");
    }
    Redirect::to("/")
}
