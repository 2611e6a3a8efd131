use std::sync::Arc;

use crate::config::ServerConfig;
use crate::payments::stripe::StripeClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fixgo_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Stripe API client for checkout-session creation.
    pub stripe: Arc<StripeClient>,
}
