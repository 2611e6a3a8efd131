//! Route definitions for lesson play.

use axum::routing::post;
use axum::Router;

use crate::handlers::play;
use crate::state::AppState;

/// Routes mounted at `/play`.
///
/// ```text
/// POST   /lessons/{id}/answers   -> submit_answer (auth)
/// POST   /lessons/{id}/complete  -> complete_lesson (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lessons/{id}/answers", post(play::submit_answer))
        .route("/lessons/{id}/complete", post(play::complete_lesson))
}
