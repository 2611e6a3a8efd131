//! HTTP-level integration tests for the Stripe payment webhook.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use common::{body_json, create_test_user, get_auth, question, seed_lesson, TEST_WEBHOOK_SECRET};
use fixgo_api::payments::webhook::sign_payload;
use sqlx::PgPool;
use tower::ServiceExt;

/// Post a raw webhook payload with the given signature header.
async fn post_webhook(app: Router, payload: &[u8], signature: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/stripe")
        .header("Content-Type", "application/json")
        .header("Stripe-Signature", signature)
        .body(Body::from(payload.to_vec()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

fn checkout_completed_event(event_id: &str, user_id: i64, amount_total: i64) -> Vec<u8> {
    serde_json::json!({
        "id": event_id,
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "client_reference_id": user_id.to_string(),
                "amount_total": amount_total,
                "subscription": null,
                "metadata": { "user_id": user_id.to_string() }
            }
        }
    })
    .to_string()
    .into_bytes()
}

/// A signed completed-checkout event credits amount_total / 100 tuerquitas.
#[sqlx::test(migrations = "../../db/migrations")]
async fn completed_checkout_credits_tuerquitas(pool: PgPool) {
    let (user, token) = create_test_user(&pool, "pagador@fixgo.mx").await;
    let app = common::build_test_app(pool);

    let payload = checkout_completed_event("evt_1", user.id, 2500);
    let signature = sign_payload(&payload, TEST_WEBHOOK_SECRET, Utc::now().timestamp());

    let response = post_webhook(app.clone(), &payload, &signature).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["received"], true);

    let me = body_json(get_auth(app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["data"]["tuerquitas"], 25);
}

/// Duplicate deliveries of the same event id are applied only once.
#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_event_credits_once(pool: PgPool) {
    let (user, token) = create_test_user(&pool, "duplicado@fixgo.mx").await;
    let app = common::build_test_app(pool);

    let payload = checkout_completed_event("evt_dup", user.id, 1000);
    let signature = sign_payload(&payload, TEST_WEBHOOK_SECRET, Utc::now().timestamp());

    for _ in 0..2 {
        let response = post_webhook(app.clone(), &payload, &signature).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let me = body_json(get_auth(app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["data"]["tuerquitas"], 10);
}

/// A bad signature is rejected with 400 and nothing is credited.
#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_signature_rejected(pool: PgPool) {
    let (user, token) = create_test_user(&pool, "falsificado@fixgo.mx").await;
    let app = common::build_test_app(pool);

    let payload = checkout_completed_event("evt_bad", user.id, 9900);
    let signature = sign_payload(&payload, "whsec_wrong_secret", Utc::now().timestamp());

    let response = post_webhook(app.clone(), &payload, &signature).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/stripe")
        .header("Content-Type", "application/json")
        .body(Body::from(payload.clone()))
        .unwrap();
    let response = app.clone().oneshot(missing).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let me = body_json(get_auth(app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["data"]["tuerquitas"], 0);
}

/// Unrelated event types are acknowledged without effects.
#[sqlx::test(migrations = "../../db/migrations")]
async fn unrelated_event_is_ignored(pool: PgPool) {
    let (user, token) = create_test_user(&pool, "ajeno@fixgo.mx").await;
    let app = common::build_test_app(pool);

    let payload = serde_json::json!({
        "id": "evt_other",
        "type": "invoice.paid",
        "data": { "object": { "metadata": { "user_id": user.id.to_string() } } }
    })
    .to_string()
    .into_bytes();
    let signature = sign_payload(&payload, TEST_WEBHOOK_SECRET, Utc::now().timestamp());

    let response = post_webhook(app.clone(), &payload, &signature).await;
    assert_eq!(response.status(), StatusCode::OK);

    let me = body_json(get_auth(app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["data"]["tuerquitas"], 0);
}

/// A subscription checkout activates the plan, and active subscribers stop
/// losing lives on wrong answers.
#[sqlx::test(migrations = "../../db/migrations")]
async fn subscription_event_activates_infinite_lives(pool: PgPool) {
    let (user, token) = create_test_user(&pool, "suscrito@fixgo.mx").await;
    let (_m, _l, lesson_id) = seed_lesson(&pool, vec![question(1, "q1", "a")]).await;
    let app = common::build_test_app(pool);

    let payload = serde_json::json!({
        "id": "evt_sub",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "client_reference_id": user.id.to_string(),
                "amount_total": 4900,
                "subscription": "sub_123",
                "metadata": { "user_id": user.id.to_string(), "plan": "aprendiz_monthly" }
            }
        }
    })
    .to_string()
    .into_bytes();
    let signature = sign_payload(&payload, TEST_WEBHOOK_SECRET, Utc::now().timestamp());

    let response = post_webhook(app.clone(), &payload, &signature).await;
    assert_eq!(response.status(), StatusCode::OK);

    let me = body_json(get_auth(app.clone(), "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["data"]["subscription_status"], "active");
    assert_eq!(me["data"]["subscription_plan"], "aprendiz_monthly");

    // Infinite lives: a wrong answer no longer costs one.
    let response = common::post_json_auth(
        app.clone(),
        &format!("/api/v1/play/lessons/{lesson_id}/answers"),
        &token,
        serde_json::json!({ "question_id": "q1", "answer": "wrong" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["correct"], false);
    assert_eq!(json["data"]["lives"], 5);
}
