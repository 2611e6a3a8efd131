//! Route definitions for lessons.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::lessons;
use crate::state::AppState;

/// Routes mounted at `/lessons`.
///
/// ```text
/// POST   /              -> create_lesson (admin)
/// PUT    /{id}          -> update_lesson (admin)
/// DELETE /{id}          -> delete_lesson (admin)
/// GET    /{id}/content  -> get_lesson_content (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(lessons::create_lesson))
        .route(
            "/{id}",
            put(lessons::update_lesson).delete(lessons::delete_lesson),
        )
        .route("/{id}/content", get(lessons::get_lesson_content))
}
