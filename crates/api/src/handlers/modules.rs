//! Handlers for the module catalog.
//!
//! Listing is decorated with per-user unlock/completion state: a module is
//! unlocked iff it is the first by sort order or its predecessor has been
//! completed.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fixgo_core::error::CoreError;
use fixgo_core::progress::{module_key, AdiamantadaSet};
use fixgo_core::types::{DbId, Timestamp};
use fixgo_core::unlock::unlock_statuses;
use fixgo_db::models::module::{CreateModule, UpdateModule};
use fixgo_db::repositories::{ModuleRepo, ProgressRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// A module decorated with the requesting user's progress state.
#[derive(Debug, Serialize)]
pub struct ModuleOverview {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_unlocked: bool,
    pub is_completed: bool,
    pub is_adiamantado: bool,
    pub created_at: Timestamp,
}

/// GET /api/v1/modules
///
/// List all modules with the user's unlock and completion status.
pub async fn list_modules(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let modules = ModuleRepo::list(&state.pool).await?;
    let completed: HashSet<DbId> = ProgressRepo::list_completed_modules(&state.pool, auth.user_id)
        .await?
        .into_iter()
        .collect();
    let adiamantadas = AdiamantadaSet::from_keys(
        ProgressRepo::list_adiamantada_keys(&state.pool, auth.user_id).await?,
    );

    let ids: Vec<DbId> = modules.iter().map(|m| m.id).collect();
    let unlocked = unlock_statuses(&ids, &completed);

    let data: Vec<ModuleOverview> = modules
        .into_iter()
        .zip(unlocked)
        .map(|(module, is_unlocked)| ModuleOverview {
            is_unlocked,
            is_completed: completed.contains(&module.id),
            is_adiamantado: adiamantadas.contains(&module_key(module.id)),
            id: module.id,
            title: module.title,
            description: module.description,
            sort_order: module.sort_order,
            created_at: module.created_at,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/modules
///
/// Create a module (admin only).
pub async fn create_module(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateModule>,
) -> AppResult<impl IntoResponse> {
    let module = ModuleRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: module })))
}

/// PUT /api/v1/modules/{id}
///
/// Update a module (admin only).
pub async fn update_module(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateModule>,
) -> AppResult<impl IntoResponse> {
    let module = ModuleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("module", id))?;
    Ok(Json(DataResponse { data: module }))
}

/// DELETE /api/v1/modules/{id}
///
/// Delete a module and its levels/lessons (admin only).
pub async fn delete_module(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ModuleRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("module", id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
