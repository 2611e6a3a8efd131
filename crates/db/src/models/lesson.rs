//! Lesson entity model and DTOs.

use fixgo_core::content::ContentItem;
use fixgo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A full row from the `lessons` table, content included.
#[derive(Debug, Clone, FromRow)]
pub struct Lesson {
    pub id: DbId,
    pub level_id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub content: Json<Vec<ContentItem>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lesson listing entry without the content payload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LessonSummary {
    pub id: DbId,
    pub level_id: DbId,
    pub title: String,
    pub sort_order: i32,
    /// Number of question items in the lesson content.
    pub question_count: i64,
}

/// DTO for creating a lesson.
#[derive(Debug, Deserialize)]
pub struct CreateLesson {
    pub level_id: DbId,
    pub title: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

/// DTO for updating a lesson. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateLesson {
    pub title: Option<String>,
    pub sort_order: Option<i32>,
    pub content: Option<Vec<ContentItem>>,
}
