//! Handlers for levels within a module.
//!
//! Same unlock rule as modules, against the user's completed levels.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fixgo_core::error::CoreError;
use fixgo_core::progress::{level_key, AdiamantadaSet};
use fixgo_core::types::{DbId, Timestamp};
use fixgo_core::unlock::unlock_statuses;
use fixgo_db::models::level::{CreateLevel, UpdateLevel};
use fixgo_db::repositories::{LevelRepo, ModuleRepo, ProgressRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// A level decorated with the requesting user's progress state.
#[derive(Debug, Serialize)]
pub struct LevelOverview {
    pub id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub is_unlocked: bool,
    pub is_completed: bool,
    pub is_adiamantado: bool,
    pub created_at: Timestamp,
}

/// GET /api/v1/modules/{id}/levels
///
/// List a module's levels with the user's unlock and completion status.
pub async fn list_levels_for_module(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(module_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if ModuleRepo::find_by_id(&state.pool, module_id).await?.is_none() {
        return Err(CoreError::not_found("module", module_id).into());
    }

    let levels = LevelRepo::list_for_module(&state.pool, module_id).await?;
    let completed: HashSet<DbId> = ProgressRepo::list_completed_levels(&state.pool, auth.user_id)
        .await?
        .into_iter()
        .collect();
    let adiamantadas = AdiamantadaSet::from_keys(
        ProgressRepo::list_adiamantada_keys(&state.pool, auth.user_id).await?,
    );

    let ids: Vec<DbId> = levels.iter().map(|l| l.id).collect();
    let unlocked = unlock_statuses(&ids, &completed);

    let data: Vec<LevelOverview> = levels
        .into_iter()
        .zip(unlocked)
        .map(|(level, is_unlocked)| LevelOverview {
            is_unlocked,
            is_completed: completed.contains(&level.id),
            is_adiamantado: adiamantadas.contains(&level_key(level.id)),
            id: level.id,
            module_id: level.module_id,
            title: level.title,
            sort_order: level.sort_order,
            created_at: level.created_at,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/levels
///
/// Create a level (admin only).
pub async fn create_level(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateLevel>,
) -> AppResult<impl IntoResponse> {
    if ModuleRepo::find_by_id(&state.pool, input.module_id)
        .await?
        .is_none()
    {
        return Err(CoreError::not_found("module", input.module_id).into());
    }
    let level = LevelRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: level })))
}

/// PUT /api/v1/levels/{id}
///
/// Update a level (admin only).
pub async fn update_level(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLevel>,
) -> AppResult<impl IntoResponse> {
    let level = LevelRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("level", id))?;
    Ok(Json(DataResponse { data: level }))
}

/// DELETE /api/v1/levels/{id}
///
/// Delete a level and its lessons (admin only).
pub async fn delete_level(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !LevelRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("level", id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
