//! Payment-webhook bookkeeping models.

use fixgo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A processed webhook event, recorded for duplicate short-circuiting.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentEvent {
    pub id: DbId,
    pub event_id: String,
    pub event_type: String,
    pub processed_at: Timestamp,
}
