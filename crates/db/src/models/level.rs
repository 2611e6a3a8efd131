//! Level entity model and DTOs.

use fixgo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `levels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Level {
    pub id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a level.
#[derive(Debug, Deserialize)]
pub struct CreateLevel {
    pub module_id: DbId,
    pub title: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// DTO for updating a level. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateLevel {
    pub title: Option<String>,
    pub sort_order: Option<i32>,
}
