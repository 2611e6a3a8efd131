//! Route definitions for levels.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{lessons, levels};
use crate::state::AppState;

/// Routes mounted at `/levels`.
///
/// ```text
/// POST   /              -> create_level (admin)
/// PUT    /{id}          -> update_level (admin)
/// DELETE /{id}          -> delete_level (admin)
/// GET    /{id}/lessons  -> list_lessons_for_level (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(levels::create_level))
        .route(
            "/{id}",
            put(levels::update_level).delete(levels::delete_level),
        )
        .route("/{id}/lessons", get(lessons::list_lessons_for_level))
}
