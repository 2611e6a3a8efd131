//! Repository for the `levels` table.

use fixgo_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::level::{CreateLevel, Level, UpdateLevel};

/// Column list for `levels` queries.
const COLUMNS: &str = "id, module_id, title, sort_order, created_at, updated_at";

/// Provides CRUD operations for levels.
pub struct LevelRepo;

impl LevelRepo {
    /// Insert a new level, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLevel) -> Result<Level, sqlx::Error> {
        let query = format!(
            "INSERT INTO levels (module_id, title, sort_order)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Level>(&query)
            .bind(input.module_id)
            .bind(&input.title)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Find a level by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Level>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM levels WHERE id = $1");
        sqlx::query_as::<_, Level>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Transactional variant of [`LevelRepo::find_by_id`] for the
    /// completion path.
    pub async fn find_by_id_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Level>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM levels WHERE id = $1");
        sqlx::query_as::<_, Level>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// List the levels of a module in display order.
    pub async fn list_for_module(
        pool: &PgPool,
        module_id: DbId,
    ) -> Result<Vec<Level>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM levels WHERE module_id = $1 ORDER BY sort_order, id");
        sqlx::query_as::<_, Level>(&query)
            .bind(module_id)
            .fetch_all(pool)
            .await
    }

    /// Level IDs of a module, in display order (transactional; used by the
    /// module-perfection check).
    pub async fn list_ids_for_module(
        conn: &mut PgConnection,
        module_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM levels WHERE module_id = $1 ORDER BY sort_order, id")
                .bind(module_id)
                .fetch_all(&mut *conn)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Update a level. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLevel,
    ) -> Result<Option<Level>, sqlx::Error> {
        let query = format!(
            "UPDATE levels SET
                title = COALESCE($2, title),
                sort_order = COALESCE($3, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Level>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a level (cascades to its lessons).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM levels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
