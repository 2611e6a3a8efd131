//! Repository for the `payment_events` table.

use sqlx::PgPool;

/// Provides webhook idempotency bookkeeping.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a webhook event id before processing it.
    ///
    /// Returns `false` when the event was already recorded, in which case
    /// the caller must short-circuit without re-applying its effects.
    pub async fn try_record_event(
        pool: &PgPool,
        event_id: &str,
        event_type: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO payment_events (event_id, event_type) VALUES ($1, $2)
             ON CONFLICT (event_id) DO NOTHING",
        )
        .bind(event_id)
        .bind(event_type)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
