use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development,
/// except the secrets, which must be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Stripe checkout/webhook configuration.
    pub stripe: StripeConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            stripe: StripeConfig::from_env(),
        }
    }
}

/// Stripe configuration for checkout sessions and webhook verification.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key used for checkout-session creation.
    pub secret_key: String,
    /// Shared secret for webhook signature verification.
    pub webhook_secret: String,
    /// Where the hosted checkout redirects after payment.
    pub success_url: String,
    /// Where the hosted checkout redirects on cancellation.
    pub cancel_url: String,
    /// Stripe price id for the "Aprendiz PRO" monthly plan.
    pub aprendiz_price_id: String,
    /// Stripe price id for the "Técnico PRO" monthly plan.
    pub tecnico_price_id: String,
}

impl StripeConfig {
    /// Load Stripe configuration from environment variables.
    ///
    /// | Env Var                   | Default                             |
    /// |---------------------------|-------------------------------------|
    /// | `STRIPE_SECRET_KEY`       | empty (store endpoints reject)      |
    /// | `STRIPE_WEBHOOK_SECRET`   | empty (webhook endpoint rejects)    |
    /// | `CHECKOUT_SUCCESS_URL`    | `http://localhost:5173/success`     |
    /// | `CHECKOUT_CANCEL_URL`     | `http://localhost:5173/cancel`      |
    /// | `STRIPE_PRICE_APRENDIZ`   | empty                               |
    /// | `STRIPE_PRICE_TECNICO`    | empty                               |
    pub fn from_env() -> Self {
        Self {
            secret_key: std::env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            success_url: std::env::var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:5173/success".into()),
            cancel_url: std::env::var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:5173/cancel".into()),
            aprendiz_price_id: std::env::var("STRIPE_PRICE_APRENDIZ").unwrap_or_default(),
            tecnico_price_id: std::env::var("STRIPE_PRICE_TECNICO").unwrap_or_default(),
        }
    }
}
