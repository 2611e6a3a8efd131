//! Handlers for lessons: listing, the content walker view, and admin CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fixgo_core::content::{validate_items, ContentItemView};
use fixgo_core::error::CoreError;
use fixgo_core::progress::AdiamantadaSet;
use fixgo_core::types::DbId;
use fixgo_core::walker::ContentWalker;
use fixgo_db::models::lesson::{CreateLesson, UpdateLesson};
use fixgo_db::repositories::{LessonRepo, LevelRepo, ProgressRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// A lesson summary decorated with the user's perfection flag.
#[derive(Debug, Serialize)]
pub struct LessonOverview {
    pub id: DbId,
    pub level_id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub question_count: i64,
    pub is_adiamantada: bool,
}

/// GET /api/v1/levels/{id}/lessons
///
/// List a level's lessons (content omitted).
pub async fn list_lessons_for_level(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(level_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if LevelRepo::find_by_id(&state.pool, level_id).await?.is_none() {
        return Err(CoreError::not_found("level", level_id).into());
    }

    let lessons = LessonRepo::list_for_level(&state.pool, level_id).await?;
    let adiamantadas = AdiamantadaSet::from_keys(
        ProgressRepo::list_adiamantada_keys(&state.pool, auth.user_id).await?,
    );

    let data: Vec<LessonOverview> = lessons
        .into_iter()
        .map(|lesson| LessonOverview {
            is_adiamantada: adiamantadas.lesson_is_perfect(lesson.id),
            id: lesson.id,
            level_id: lesson.level_id,
            title: lesson.title,
            sort_order: lesson.sort_order,
            question_count: lesson.question_count,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Content walker view
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    /// Walker cursor; defaults to the first item.
    #[serde(default)]
    pub cursor: usize,
}

/// The walker's view of a lesson at one cursor position.
#[derive(Debug, Serialize)]
pub struct ContentView {
    pub lesson_id: DbId,
    pub cursor: usize,
    /// Current item with the answer redacted; absent once past the end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_item: Option<ContentItemView>,
    /// 1-based display position ("item 2 of 5").
    pub position: usize,
    pub total: usize,
    pub is_last: bool,
    pub has_reached_end: bool,
}

/// GET /api/v1/lessons/{id}/content?cursor=N
///
/// The ordered-content cursor view: current item, display position, and
/// the end-of-lesson signal.
pub async fn get_lesson_content(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
    Query(query): Query<ContentQuery>,
) -> AppResult<impl IntoResponse> {
    let lesson = LessonRepo::find_by_id(&state.pool, lesson_id)
        .await?
        .ok_or_else(|| CoreError::not_found("lesson", lesson_id))?;

    let walker = ContentWalker::with_cursor(lesson.content.0.clone(), query.cursor);

    Ok(Json(DataResponse {
        data: ContentView {
            lesson_id,
            cursor: walker.cursor(),
            current_item: walker.current().map(|item| item.public_view()),
            position: walker.display_position(),
            total: walker.total(),
            is_last: walker.is_last(),
            has_reached_end: walker.has_reached_end(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Admin CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/lessons
///
/// Create a lesson (admin only). Content is validated before storage.
pub async fn create_lesson(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateLesson>,
) -> AppResult<impl IntoResponse> {
    if LevelRepo::find_by_id(&state.pool, input.level_id)
        .await?
        .is_none()
    {
        return Err(CoreError::not_found("level", input.level_id).into());
    }
    validate_items(&input.content)?;

    let lesson = LessonRepo::create(&state.pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: serde_json::json!({
                "id": lesson.id,
                "level_id": lesson.level_id,
                "title": lesson.title,
                "sort_order": lesson.sort_order,
                "content": lesson.content.0,
            }),
        }),
    ))
}

/// PUT /api/v1/lessons/{id}
///
/// Update a lesson (admin only).
pub async fn update_lesson(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLesson>,
) -> AppResult<impl IntoResponse> {
    if let Some(content) = &input.content {
        validate_items(content)?;
    }

    let lesson = LessonRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("lesson", id))?;

    Ok(Json(DataResponse {
        data: serde_json::json!({
            "id": lesson.id,
            "level_id": lesson.level_id,
            "title": lesson.title,
            "sort_order": lesson.sort_order,
            "content": lesson.content.0,
        }),
    }))
}

/// DELETE /api/v1/lessons/{id}
///
/// Delete a lesson (admin only).
pub async fn delete_lesson(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !LessonRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("lesson", id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
