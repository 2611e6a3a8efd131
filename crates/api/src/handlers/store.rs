//! Handlers for the store: tuerquita packages, subscription plans, and the
//! lives refill.
//!
//! Checkout is delegated to Stripe's hosted page; the actual credit happens
//! later, when the payment webhook arrives.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use fixgo_core::error::CoreError;
use fixgo_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Tuerquitas spent on a full lives refill.
pub const LIFE_REFILL_COST: i32 = 10;

/// A purchasable tuerquita package.
#[derive(Debug, Clone, Serialize)]
pub struct TuerquitaPackage {
    pub id: &'static str,
    pub name: &'static str,
    pub tuerquitas: i32,
    /// Price in MXN cents.
    pub price_cents: i64,
}

/// The store's tuerquita packages.
pub const TUERQUITA_PACKAGES: &[TuerquitaPackage] = &[
    TuerquitaPackage {
        id: "t10",
        name: "Paquete Básico",
        tuerquitas: 10,
        price_cents: 1000,
    },
    TuerquitaPackage {
        id: "t50",
        name: "Paquete Impulso",
        tuerquitas: 50,
        price_cents: 1500,
    },
    TuerquitaPackage {
        id: "t100",
        name: "Kit Esencial",
        tuerquitas: 100,
        price_cents: 2500,
    },
    TuerquitaPackage {
        id: "t250",
        name: "Experto FixGo",
        tuerquitas: 250,
        price_cents: 5000,
    },
];

/// A monthly subscription plan.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionPlan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in MXN cents.
    pub price_cents: i64,
    pub features: &'static [&'static str],
}

/// The store's subscription plans. An active plan grants infinite lives.
pub const SUBSCRIPTION_PLANS: &[SubscriptionPlan] = &[
    SubscriptionPlan {
        id: "aprendiz_monthly",
        name: "Aprendiz PRO",
        price_cents: 4900,
        features: &["Vidas Infinitas", "Sin Anuncios", "5 Tuerquitas Diarias"],
    },
    SubscriptionPlan {
        id: "tecnico_monthly",
        name: "Técnico PRO",
        price_cents: 9900,
        features: &["Todo lo anterior + boost y descuentos"],
    },
];

/// GET /api/v1/store/catalog
///
/// The purchasable packages and plans.
pub async fn get_catalog(RequireAuth(_auth): RequireAuth) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: serde_json::json!({
            "packages": TUERQUITA_PACKAGES,
            "plans": SUBSCRIPTION_PLANS,
            "life_refill_cost": LIFE_REFILL_COST,
        }),
    }))
}

/// Request body for `POST /store/checkout-session`.
///
/// Exactly one of `package_id` / `plan_id` must be set.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub package_id: Option<String>,
    pub plan_id: Option<String>,
}

/// Response for a created checkout session.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    /// Hosted checkout URL the browser is redirected to.
    pub url: Option<String>,
}

/// POST /api/v1/store/checkout-session
///
/// Create a hosted checkout session for a package or a plan.
pub async fn create_checkout_session(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<impl IntoResponse> {
    let session = match (input.package_id.as_deref(), input.plan_id.as_deref()) {
        (Some(package_id), None) => {
            let package = TUERQUITA_PACKAGES
                .iter()
                .find(|p| p.id == package_id)
                .ok_or_else(|| CoreError::not_found("package", package_id))?;
            state
                .stripe
                .create_package_session(
                    auth.user_id,
                    package.name,
                    package.tuerquitas,
                    package.price_cents,
                )
                .await?
        }
        (None, Some(plan_id)) => {
            let plan = SUBSCRIPTION_PLANS
                .iter()
                .find(|p| p.id == plan_id)
                .ok_or_else(|| CoreError::not_found("plan", plan_id))?;
            let price_id = match plan.id {
                "aprendiz_monthly" => &state.config.stripe.aprendiz_price_id,
                _ => &state.config.stripe.tecnico_price_id,
            };
            if price_id.is_empty() {
                return Err(CoreError::Internal(format!(
                    "No Stripe price configured for plan {}",
                    plan.id
                ))
                .into());
            }
            state
                .stripe
                .create_subscription_session(auth.user_id, plan.id, price_id)
                .await?
        }
        _ => {
            return Err(CoreError::Validation(
                "Provide exactly one of package_id or plan_id".into(),
            )
            .into());
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        session_id = %session.id,
        "Checkout session created",
    );

    Ok(Json(DataResponse {
        data: CheckoutResponse {
            session_id: session.id,
            url: session.url,
        },
    }))
}

/// POST /api/v1/store/lives/refill
///
/// Spend tuerquitas to refill lives to the maximum and clear the recovery
/// schedule. The spend is conditional, so the balance can never go
/// negative.
pub async fn refill_lives(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", auth.user_id))?;

    if user.lives >= fixgo_core::lives::MAX_LIVES {
        return Err(CoreError::Conflict("Lives are already full".into()).into());
    }

    let updated = UserRepo::purchase_life_refill(&state.pool, auth.user_id, LIFE_REFILL_COST)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Not enough tuerquitas: a refill costs {LIFE_REFILL_COST}"
            ))
        })?;

    tracing::info!(user_id = auth.user_id, "Lives refilled via purchase");

    Ok(Json(DataResponse {
        data: serde_json::json!({
            "lives": updated.lives,
            "tuerquitas": updated.tuerquitas,
        }),
    }))
}
