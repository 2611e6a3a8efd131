//! Route definitions for the authenticated user's progress views.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET    /lives     -> get_lives (auth)
/// GET    /progress  -> get_progress (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lives", get(users::get_lives))
        .route("/progress", get(users::get_progress))
}
