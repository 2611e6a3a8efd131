//! Repository for the `modules` table.

use fixgo_core::types::DbId;
use sqlx::PgPool;

use crate::models::module::{CreateModule, Module, UpdateModule};

/// Column list for `modules` queries.
const COLUMNS: &str = "id, title, description, sort_order, created_at, updated_at";

/// Provides CRUD operations for modules.
pub struct ModuleRepo;

impl ModuleRepo {
    /// Insert a new module, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateModule) -> Result<Module, sqlx::Error> {
        let query = format!(
            "INSERT INTO modules (title, description, sort_order)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Find a module by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules WHERE id = $1");
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all modules in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules ORDER BY sort_order, id");
        sqlx::query_as::<_, Module>(&query).fetch_all(pool).await
    }

    /// Update a module. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateModule,
    ) -> Result<Option<Module>, sqlx::Error> {
        let query = format!(
            "UPDATE modules SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                sort_order = COALESCE($4, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a module (cascades to its levels and lessons).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
