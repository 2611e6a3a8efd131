//! Shared harness for HTTP-level integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) on a
//! `#[sqlx::test]`-provided pool, plus request and seeding helpers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use fixgo_api::auth::jwt::{generate_access_token, JwtConfig};
use fixgo_api::auth::password::hash_password;
use fixgo_api::config::{ServerConfig, StripeConfig};
use fixgo_api::payments::stripe::StripeClient;
use fixgo_api::router::build_app_router;
use fixgo_api::state::AppState;
use fixgo_core::content::ContentItem;
use fixgo_core::types::DbId;
use fixgo_db::models::lesson::CreateLesson;
use fixgo_db::models::level::CreateLevel;
use fixgo_db::models::module::CreateModule;
use fixgo_db::models::user::{CreateUser, User};
use fixgo_db::repositories::{LessonRepo, LevelRepo, ModuleRepo, UserRepo};

/// Webhook secret used by the test config and the webhook tests.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-jwt-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        stripe: StripeConfig {
            secret_key: String::new(),
            webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
            success_url: "http://localhost:5173/success".to_string(),
            cancel_url: "http://localhost:5173/cancel".to_string(),
            aprendiz_price_id: String::new(),
            tecnico_price_id: String::new(),
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Mirrors production via [`build_app_router`].
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        stripe: Arc::new(StripeClient::new(config.stripe.clone())),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database and return the row plus a valid
/// access token for it.
pub async fn create_test_user(pool: &PgPool, email: &str) -> (User, String) {
    let hashed = hash_password("test_password_123!").expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hashed,
            display_name: "Test User".to_string(),
            country: Some("MX".to_string()),
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Promote a user to admin and return a fresh token carrying the role.
pub async fn make_admin(pool: &PgPool, user_id: DbId) -> String {
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("role update should succeed");
    generate_access_token(user_id, "admin", &test_config().jwt)
        .expect("token generation should succeed")
}

/// A content question item for seeding lessons.
pub fn question(order: i32, id: &str, answer: &str) -> ContentItem {
    serde_json::from_value(serde_json::json!({
        "type": "question",
        "order": order,
        "id": id,
        "value": format!("Question {id}?"),
        "answer": answer,
        "options": [answer, "otra opción"],
        "explanation": format!("Explanation for {id}."),
        "points": 10
    }))
    .unwrap()
}

/// A content text item for seeding lessons.
pub fn text_item(order: i32, value: &str) -> ContentItem {
    serde_json::from_value(serde_json::json!({
        "type": "text",
        "order": order,
        "value": value
    }))
    .unwrap()
}

/// Seed one module -> one level -> one lesson with the given content.
/// Returns (module_id, level_id, lesson_id).
pub async fn seed_lesson(pool: &PgPool, content: Vec<ContentItem>) -> (DbId, DbId, DbId) {
    let module = ModuleRepo::create(
        pool,
        &CreateModule {
            title: "Módulo 1".to_string(),
            description: None,
            sort_order: 1,
        },
    )
    .await
    .unwrap();

    let level = LevelRepo::create(
        pool,
        &CreateLevel {
            module_id: module.id,
            title: "Nivel 1".to_string(),
            sort_order: 1,
        },
    )
    .await
    .unwrap();

    let lesson = LessonRepo::create(
        pool,
        &CreateLesson {
            level_id: level.id,
            title: "Lección 1".to_string(),
            sort_order: 1,
            content,
        },
    )
    .await
    .unwrap();

    (module.id, level.id, lesson.id)
}

/// Add another lesson to an existing level. Returns the lesson id.
pub async fn add_lesson(pool: &PgPool, level_id: DbId, content: Vec<ContentItem>) -> DbId {
    LessonRepo::create(
        pool,
        &CreateLesson {
            level_id,
            title: "Otra lección".to_string(),
            sort_order: 2,
            content,
        },
    )
    .await
    .unwrap()
    .id
}

/// Answer every question of a lesson correctly through the API.
pub async fn answer_all_correct(
    app: &Router,
    token: &str,
    lesson_id: DbId,
    answers: &[(&str, &str)],
) {
    for (question_id, answer) in answers {
        let response = post_json_auth(
            app.clone(),
            &format!("/api/v1/play/lessons/{lesson_id}/answers"),
            token,
            serde_json::json!({ "question_id": question_id, "answer": answer }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
