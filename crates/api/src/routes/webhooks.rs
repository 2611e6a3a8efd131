//! Route definitions for external webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST   /stripe  -> stripe_webhook (public, signature-verified)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stripe", post(webhooks::stripe_webhook))
}
