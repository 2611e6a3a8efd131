//! Minimal Stripe Checkout client.
//!
//! Talks to the Stripe REST API directly with form-encoded requests. Only
//! the two session kinds the store needs are implemented: a one-off payment
//! for a tuerquita package, and a subscription for a monthly plan.

use fixgo_core::types::DbId;

use crate::config::StripeConfig;
use crate::error::AppError;

/// Stripe REST API base URL.
const API_BASE: &str = "https://api.stripe.com/v1";

/// Currency for all store prices.
const CURRENCY: &str = "mxn";

/// A created hosted-checkout session.
#[derive(Debug, serde::Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted page the browser is redirected to.
    pub url: Option<String>,
}

/// Stripe API client bound to the configured secret key.
pub struct StripeClient {
    config: StripeConfig,
    http: reqwest::Client,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        StripeClient {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn ensure_configured(&self) -> Result<(), AppError> {
        if self.config.secret_key.is_empty() {
            return Err(AppError::InternalError(
                "Stripe secret key is not configured".into(),
            ));
        }
        Ok(())
    }

    /// Create a one-off payment session for a tuerquita package.
    ///
    /// The user id and the purchased amount travel in the session metadata
    /// and `client_reference_id`, which the webhook reads back.
    pub async fn create_package_session(
        &self,
        user_id: DbId,
        package_name: &str,
        tuerquitas: i32,
        price_cents: i64,
    ) -> Result<CheckoutSession, AppError> {
        self.ensure_configured()?;

        let user_id = user_id.to_string();
        let tuerquitas = tuerquitas.to_string();
        let price_cents = price_cents.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("client_reference_id", &user_id),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", CURRENCY),
            ("line_items[0][price_data][unit_amount]", &price_cents),
            (
                "line_items[0][price_data][product_data][name]",
                package_name,
            ),
            ("metadata[user_id]", &user_id),
            ("metadata[tuerquitas]", &tuerquitas),
            ("success_url", &self.config.success_url),
            ("cancel_url", &self.config.cancel_url),
        ];

        self.post_session(&params).await
    }

    /// Create a subscription session for a monthly plan price id.
    pub async fn create_subscription_session(
        &self,
        user_id: DbId,
        plan_id: &str,
        price_id: &str,
    ) -> Result<CheckoutSession, AppError> {
        self.ensure_configured()?;

        let user_id = user_id.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("mode", "subscription"),
            ("client_reference_id", &user_id),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price]", price_id),
            ("metadata[user_id]", &user_id),
            ("metadata[plan]", plan_id),
            ("success_url", &self.config.success_url),
            ("cancel_url", &self.config.cancel_url),
        ];

        self.post_session(&params).await
    }

    async fn post_session(&self, params: &[(&str, &str)]) -> Result<CheckoutSession, AppError> {
        let response = self
            .http
            .post(format!("{API_BASE}/checkout/sessions"))
            .bearer_auth(&self.config.secret_key)
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::InternalError(format!("Stripe request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body, "Stripe checkout-session creation failed");
            return Err(AppError::InternalError(
                "Could not create checkout session".into(),
            ));
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| AppError::InternalError(format!("Invalid Stripe response: {e}")))
    }
}
