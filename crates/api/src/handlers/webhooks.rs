//! Stripe webhook endpoint.
//!
//! Verifies the signature over the raw body, short-circuits duplicate
//! deliveries by event id, and applies `checkout.session.completed`
//! effects: an additive tuerquita credit of `amount_total / 100`, and
//! subscription activation when the session started one.
//!
//! Credits are increments, never absolute writes: this handler and the
//! completion engine mutate the same balance independently.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use fixgo_core::types::DbId;
use fixgo_db::repositories::{PaymentRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::payments::webhook::{
    verify_signature, StripeEvent, CHECKOUT_SESSION_COMPLETED,
};
use crate::state::AppState;

/// POST /api/v1/webhooks/stripe
///
/// Public endpoint; authentication is the signature itself.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".into()))?;

    verify_signature(
        &body,
        signature,
        &state.config.stripe.webhook_secret,
        Utc::now().timestamp(),
    )
    .map_err(|e| AppError::BadRequest(format!("Webhook signature verification failed: {e}")))?;

    let event: StripeEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed event payload: {e}")))?;

    if event.event_type != CHECKOUT_SESSION_COMPLETED {
        tracing::debug!(event_type = %event.event_type, "Ignoring webhook event");
        return Ok(Json(serde_json::json!({ "received": true })));
    }

    let session = &event.data.object;
    let Some(user_id) = resolve_user_id(session.client_reference_id.as_deref(), &session.metadata)
    else {
        tracing::warn!(event_id = %event.id, "Ignoring event without a user reference");
        return Ok(Json(serde_json::json!({ "received": true })));
    };

    // Duplicate delivery: the event was already applied.
    if !PaymentRepo::try_record_event(&state.pool, &event.id, &event.event_type).await? {
        tracing::info!(event_id = %event.id, "Duplicate webhook event skipped");
        return Ok(Json(serde_json::json!({ "received": true })));
    }

    if let Some(amount_total) = session.amount_total {
        let credited = (amount_total / 100) as i32;
        if credited > 0 {
            if UserRepo::credit_tuerquitas(&state.pool, user_id, credited).await? {
                tracing::info!(user_id, credited, "Tuerquitas credited from checkout");
            } else {
                tracing::warn!(user_id, event_id = %event.id, "Credit target user not found");
            }
        }
    }

    if session.subscription.is_some() {
        let plan = session.metadata.get("plan").map(String::as_str);
        if UserRepo::activate_subscription(&state.pool, user_id, plan).await? {
            tracing::info!(user_id, plan = ?plan, "Subscription activated");
        } else {
            tracing::warn!(user_id, event_id = %event.id, "Subscription target user not found");
        }
    }

    Ok(Json(serde_json::json!({ "received": true })))
}

/// The purchasing user, from `client_reference_id` or the session metadata.
fn resolve_user_id(
    client_reference_id: Option<&str>,
    metadata: &std::collections::HashMap<String, String>,
) -> Option<DbId> {
    client_reference_id
        .or_else(|| metadata.get("user_id").map(String::as_str))
        .and_then(|raw| raw.parse().ok())
}
