//! Stripe webhook signature verification and event payloads.
//!
//! Signatures use Stripe's scheme: the `Stripe-Signature` header carries
//! `t=<unix>,v1=<hex hmac>` pairs where the MAC is HMAC-SHA256 over
//! `"{t}.{raw body}"` with the endpoint's shared secret. Verification is
//! constant-time via [`Mac::verify_slice`], and the timestamp must be
//! within the replay tolerance.

use std::collections::HashMap;

use fixgo_core::error::CoreError;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a signed payload, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Event type credited by the webhook handler.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// A Stripe event envelope, trimmed to the fields the handler consumes.
#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: CheckoutSessionObject,
}

/// The `checkout.session` object inside a completed-checkout event.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    /// The purchasing user's id, as set at session creation.
    pub client_reference_id: Option<String>,
    /// Total charged, in cents.
    pub amount_total: Option<i64>,
    /// Present when the session started a subscription.
    pub subscription: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Verify a `Stripe-Signature` header against the raw request body.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now_unix: i64,
) -> Result<(), CoreError> {
    if secret.is_empty() {
        return Err(CoreError::Internal(
            "Webhook secret is not configured".into(),
        ));
    }

    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<Vec<u8>> = Vec::new();

    for pair in header.split(',') {
        let mut parts = pair.trim().splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some("t"), Some(value)) => timestamp = value.parse().ok(),
            (Some("v1"), Some(value)) => {
                if let Some(bytes) = hex_decode(value) {
                    candidates.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| CoreError::Validation("Malformed signature header: missing t".into()))?;

    if (now_unix - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(CoreError::Validation(
            "Signature timestamp outside tolerance".into(),
        ));
    }

    if candidates.is_empty() {
        return Err(CoreError::Validation(
            "Malformed signature header: missing v1".into(),
        ));
    }

    for candidate in &candidates {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(candidate).is_ok() {
            return Ok(());
        }
    }

    Err(CoreError::Validation("Signature mismatch".into()))
}

/// Produce a valid signature header for the given payload.
///
/// Used by tests and documented here because the format is shared with
/// [`verify_signature`].
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let digest = mac.finalize().into_bytes();
    format!("t={timestamp},v1={}", hex_encode(&digest))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
