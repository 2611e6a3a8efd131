//! Route definitions for the module catalog.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{levels, modules};
use crate::state::AppState;

/// Routes mounted at `/modules`.
///
/// ```text
/// GET    /             -> list_modules (auth)
/// POST   /             -> create_module (admin)
/// PUT    /{id}         -> update_module (admin)
/// DELETE /{id}         -> delete_module (admin)
/// GET    /{id}/levels  -> list_levels_for_module (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(modules::list_modules).post(modules::create_module),
        )
        .route(
            "/{id}",
            put(modules::update_module).delete(modules::delete_module),
        )
        .route("/{id}/levels", get(levels::list_levels_for_module))
}
