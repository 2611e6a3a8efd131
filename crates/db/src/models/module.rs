//! Module entity model and DTOs.

use fixgo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `modules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Module {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a module.
#[derive(Debug, Deserialize)]
pub struct CreateModule {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// DTO for updating a module. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateModule {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}
