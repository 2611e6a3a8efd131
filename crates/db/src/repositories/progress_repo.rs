//! Repository for the progress satellites: `lesson_progress`,
//! `completed_levels`, `completed_modules` and `adiamantadas`.
//!
//! Methods on the completion path take `&mut PgConnection` so the engine
//! can run the whole read-compute-write sequence inside one transaction.

use fixgo_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::progress::LessonProgress;

/// Column list for `lesson_progress` queries.
const LP_COLUMNS: &str = "id, user_id, level_id, lesson_id, attempts, last_score, \
                          had_errors, correctly_answered, pass_had_errors, \
                          created_at, updated_at";

/// Provides operations over a user's progress satellites.
pub struct ProgressRepo;

impl ProgressRepo {
    // -----------------------------------------------------------------------
    // Lesson ledger + correctness accumulator
    // -----------------------------------------------------------------------

    /// Fetch the ledger row for one lesson, if any.
    pub async fn get_for_lesson(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<LessonProgress>, sqlx::Error> {
        let query =
            format!("SELECT {LP_COLUMNS} FROM lesson_progress WHERE user_id = $1 AND lesson_id = $2");
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .fetch_optional(pool)
            .await
    }

    /// Transactional variant of [`ProgressRepo::get_for_lesson`].
    pub async fn get_for_lesson_tx(
        conn: &mut PgConnection,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<LessonProgress>, sqlx::Error> {
        let query =
            format!("SELECT {LP_COLUMNS} FROM lesson_progress WHERE user_id = $1 AND lesson_id = $2");
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// All ledger rows for a user (progress-record assembly).
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<LessonProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {LP_COLUMNS} FROM lesson_progress WHERE user_id = $1 \
             ORDER BY level_id, lesson_id"
        );
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Add a question to the correctness accumulator, if not already there.
    ///
    /// `pass_had_errors` is left untouched on existing rows (preserved from
    /// any earlier incorrect attempt in the same pass) and defaults to
    /// false on fresh ones. Returns the updated row.
    pub async fn record_correct_answer(
        pool: &PgPool,
        user_id: DbId,
        level_id: DbId,
        lesson_id: DbId,
        question_id: &str,
    ) -> Result<LessonProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO lesson_progress (user_id, level_id, lesson_id, correctly_answered)
             VALUES ($1, $2, $3, jsonb_build_array($4::text))
             ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                 correctly_answered = CASE
                     WHEN lesson_progress.correctly_answered @> jsonb_build_array($4::text)
                     THEN lesson_progress.correctly_answered
                     ELSE lesson_progress.correctly_answered || jsonb_build_array($4::text)
                 END
             RETURNING {LP_COLUMNS}"
        );
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(user_id)
            .bind(level_id)
            .bind(lesson_id)
            .bind(question_id)
            .fetch_one(pool)
            .await
    }

    /// Record that the pass in flight has had at least one incorrect answer.
    pub async fn record_incorrect_answer(
        pool: &PgPool,
        user_id: DbId,
        level_id: DbId,
        lesson_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO lesson_progress (user_id, level_id, lesson_id, pass_had_errors)
             VALUES ($1, $2, $3, TRUE)
             ON CONFLICT (user_id, lesson_id) DO UPDATE SET pass_had_errors = TRUE",
        )
        .bind(user_id)
        .bind(level_id)
        .bind(lesson_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Close out a pass: bump `attempts`, write the ledger fields, and
    /// reset the transient pass state (accumulator and error flag) so the
    /// next pass starts fresh.
    pub async fn finish_lesson(
        conn: &mut PgConnection,
        user_id: DbId,
        level_id: DbId,
        lesson_id: DbId,
        last_score: i32,
        had_errors: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO lesson_progress \
                 (user_id, level_id, lesson_id, attempts, last_score, had_errors)
             VALUES ($1, $2, $3, 1, $4, $5)
             ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                 attempts = lesson_progress.attempts + 1,
                 last_score = $4,
                 had_errors = $5,
                 correctly_answered = '[]'::jsonb,
                 pass_had_errors = FALSE",
        )
        .bind(user_id)
        .bind(level_id)
        .bind(lesson_id)
        .bind(last_score)
        .bind(had_errors)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Completed levels / modules
    // -----------------------------------------------------------------------

    /// Level IDs the user has completed at least once.
    pub async fn list_completed_levels(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT level_id FROM completed_levels WHERE user_id = $1 ORDER BY level_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Whether the user has already completed the given level.
    pub async fn level_is_completed_tx(
        conn: &mut PgConnection,
        user_id: DbId,
        level_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM completed_levels WHERE user_id = $1 AND level_id = $2)",
        )
        .bind(user_id)
        .bind(level_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row.0)
    }

    /// Record a level completion. Idempotent.
    pub async fn record_completed_level(
        conn: &mut PgConnection,
        user_id: DbId,
        level_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO completed_levels (user_id, level_id) VALUES ($1, $2)
             ON CONFLICT (user_id, level_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(level_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Module IDs the user has completed.
    pub async fn list_completed_modules(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT module_id FROM completed_modules WHERE user_id = $1 ORDER BY module_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Record a module completion. Idempotent: a duplicate is skipped.
    pub async fn record_completed_module(
        conn: &mut PgConnection,
        user_id: DbId,
        module_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO completed_modules (user_id, module_id) VALUES ($1, $2)
             ON CONFLICT (user_id, module_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(module_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Adiamantadas
    // -----------------------------------------------------------------------

    /// All perfection-flag keys the user holds.
    pub async fn list_adiamantada_keys(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT entity_key FROM adiamantadas WHERE user_id = $1 ORDER BY entity_key",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(key,)| key).collect())
    }

    /// Transactional variant of [`ProgressRepo::list_adiamantada_keys`].
    pub async fn list_adiamantada_keys_tx(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT entity_key FROM adiamantadas WHERE user_id = $1 ORDER BY entity_key",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows.into_iter().map(|(key,)| key).collect())
    }

    /// Insert newly granted perfection flags. Idempotent per key.
    pub async fn insert_adiamantadas(
        conn: &mut PgConnection,
        user_id: DbId,
        keys: &[String],
    ) -> Result<(), sqlx::Error> {
        for key in keys {
            sqlx::query(
                "INSERT INTO adiamantadas (user_id, entity_key) VALUES ($1, $2)
                 ON CONFLICT (user_id, entity_key) DO NOTHING",
            )
            .bind(user_id)
            .bind(key)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
