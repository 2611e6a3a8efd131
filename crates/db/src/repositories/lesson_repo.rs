//! Repository for the `lessons` table.

use fixgo_core::content::ContentItem;
use fixgo_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::lesson::{CreateLesson, Lesson, LessonSummary, UpdateLesson};

/// Column list for full `lessons` queries.
const COLUMNS: &str = "id, level_id, title, sort_order, content, created_at, updated_at";

/// Column list for content-free listing queries, with a derived question
/// count from the JSONB content array.
const SUMMARY_COLUMNS: &str = "id, level_id, title, sort_order, \
    (SELECT COUNT(*) FROM jsonb_array_elements(content) AS item \
     WHERE item->>'type' = 'question') AS question_count";

/// Provides CRUD operations for lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Insert a new lesson, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLesson) -> Result<Lesson, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons (level_id, title, sort_order, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(input.level_id)
            .bind(&input.title)
            .bind(input.sort_order)
            .bind(Json(&input.content))
            .fetch_one(pool)
            .await
    }

    /// Find a lesson by ID, content included.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Transactional variant of [`LessonRepo::find_by_id`] for the
    /// completion path.
    pub async fn find_by_id_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// List the lessons of a level in display order, without content.
    pub async fn list_for_level(
        pool: &PgPool,
        level_id: DbId,
    ) -> Result<Vec<LessonSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM lessons WHERE level_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, LessonSummary>(&query)
            .bind(level_id)
            .fetch_all(pool)
            .await
    }

    /// Lesson IDs of a level, in display order (transactional; used by the
    /// level-perfection check).
    pub async fn list_ids_for_level(
        conn: &mut PgConnection,
        level_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM lessons WHERE level_id = $1 ORDER BY sort_order, id")
                .bind(level_id)
                .fetch_all(&mut *conn)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Update a lesson. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let content = input.content.as_ref().map(Json::<&Vec<ContentItem>>);
        let query = format!(
            "UPDATE lessons SET
                title = COALESCE($2, title),
                sort_order = COALESCE($3, sort_order),
                content = COALESCE($4, content)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.sort_order)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a lesson.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
