//! Route definitions for the store.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::store;
use crate::state::AppState;

/// Routes mounted at `/store`.
///
/// ```text
/// GET    /catalog           -> get_catalog (auth)
/// POST   /checkout-session  -> create_checkout_session (auth)
/// POST   /lives/refill      -> refill_lives (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(store::get_catalog))
        .route("/checkout-session", post(store::create_checkout_session))
        .route("/lives/refill", post(store::refill_lives))
}
