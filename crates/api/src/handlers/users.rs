//! Handlers for the authenticated user's lives and progress record.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use fixgo_core::error::CoreError;
use fixgo_core::progress::{LessonLedger, LevelProgress, ProgressRecord};
use fixgo_db::repositories::{ProgressRepo, UserRepo};
use serde::Serialize;

use crate::engine::lives;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/user/lives
///
/// Run the recovery check, then return the current lives and countdown.
/// Polled by the client every second while a recovery is scheduled; the
/// absolute-time recomputation makes that safe.
pub async fn get_lives(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", auth.user_id))?;

    let status = lives::check_and_recover(&state.pool, &user).await?;

    Ok(Json(DataResponse { data: status }))
}

/// Progress response: the record plus identity fields.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub user_id: fixgo_core::types::DbId,
    #[serde(flatten)]
    pub record: ProgressRecord,
}

/// GET /api/v1/user/progress
///
/// The full progress record in its wire shape: camelCase scalars,
/// `levelProgress` nested under `lessons`, and the `adiamantadas` map.
pub async fn get_progress(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", auth.user_id))?;

    let completed_levels = ProgressRepo::list_completed_levels(&state.pool, user.id).await?;
    let completed_modules = ProgressRepo::list_completed_modules(&state.pool, user.id).await?;
    let ledgers = ProgressRepo::list_for_user(&state.pool, user.id).await?;
    let keys = ProgressRepo::list_adiamantada_keys(&state.pool, user.id).await?;

    let mut level_progress: BTreeMap<String, LevelProgress> = BTreeMap::new();
    for row in ledgers {
        level_progress
            .entry(row.level_id.to_string())
            .or_default()
            .lessons
            .insert(
                row.lesson_id.to_string(),
                LessonLedger {
                    attempts: row.attempts,
                    last_score: row.last_score,
                    had_errors: row.had_errors,
                },
            );
    }

    let adiamantadas: BTreeMap<String, bool> =
        keys.into_iter().map(|key| (key, true)).collect();

    Ok(Json(DataResponse {
        data: ProgressResponse {
            user_id: user.id,
            record: ProgressRecord {
                lives: user.lives,
                next_life_recovery_time: user.next_life_recovery_at,
                tuerquitas: user.tuerquitas,
                xp: user.xp,
                completed_levels,
                level_progress,
                adiamantadas,
                completed_modules,
            },
        },
    }))
}
