pub mod auth;
pub mod health;
pub mod lessons;
pub mod levels;
pub mod modules;
pub mod play;
pub mod store;
pub mod user;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/me                            profile (requires auth)
///
/// /modules                            list (auth), create (admin)
/// /modules/{id}                       update, delete (admin)
/// /modules/{id}/levels                list with unlock status (auth)
///
/// /levels                             create (admin)
/// /levels/{id}                        update, delete (admin)
/// /levels/{id}/lessons                list (auth)
///
/// /lessons                            create (admin)
/// /lessons/{id}                       update, delete (admin)
/// /lessons/{id}/content               walker view (auth)
///
/// /play/lessons/{id}/answers          submit answer (auth)
/// /play/lessons/{id}/complete         complete lesson (auth)
///
/// /user/lives                         lives + recovery countdown (auth)
/// /user/progress                      full progress record (auth)
///
/// /store/catalog                      packages and plans (auth)
/// /store/checkout-session             create hosted checkout (auth)
/// /store/lives/refill                 spend tuerquitas for lives (auth)
///
/// /webhooks/stripe                    payment webhook (signature-verified)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/modules", modules::router())
        .nest("/levels", levels::router())
        .nest("/lessons", lessons::router())
        .nest("/play", play::router())
        .nest("/user", user::router())
        .nest("/store", store::router())
        .nest("/webhooks", webhooks::router())
}
