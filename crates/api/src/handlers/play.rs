//! Handlers for lesson play: answer submission and completion.
//!
//! Both delegate to the engine layer; nothing here computes rewards.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use fixgo_core::error::CoreError;
use fixgo_core::types::DbId;
use fixgo_db::repositories::UserRepo;
use serde::Deserialize;

use crate::engine::{answers, completion};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /play/lessons/{id}/answers`.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question_id: String,
    pub answer: String,
}

/// Request body for `POST /play/lessons/{id}/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteLessonRequest {
    /// The walker cursor; must be past the last content item.
    pub cursor: usize,
}

/// POST /api/v1/play/lessons/{id}/answers
///
/// Judge one submitted answer: correct answers join the pass's correctness
/// accumulator, incorrect ones set `hadErrors` and cost a life.
pub async fn submit_answer(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
    Json(input): Json<SubmitAnswerRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", auth.user_id))?;

    let outcome = answers::submit_answer(
        &state.pool,
        &user,
        lesson_id,
        &input.question_id,
        &input.answer,
    )
    .await?;

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/play/lessons/{id}/complete
///
/// Reconcile rewards and flags for a finished pass. Transactional: either
/// every award lands or none does.
pub async fn complete_lesson(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
    Json(input): Json<CompleteLessonRequest>,
) -> AppResult<impl IntoResponse> {
    let summary =
        completion::complete_lesson(&state.pool, auth.user_id, lesson_id, input.cursor).await?;

    Ok(Json(DataResponse { data: summary }))
}
