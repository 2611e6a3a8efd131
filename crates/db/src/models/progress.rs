//! Progress satellite models: ledgers, completion sets, perfection flags.

use fixgo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `lesson_progress` table.
///
/// `attempts`/`last_score`/`had_errors` form the persistent ledger,
/// describing the last completed pass. `correctly_answered` and
/// `pass_had_errors` are the transient state of the pass in flight,
/// reset at completion.
#[derive(Debug, Clone, FromRow)]
pub struct LessonProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub level_id: DbId,
    pub lesson_id: DbId,
    pub attempts: i32,
    pub last_score: i32,
    pub had_errors: bool,
    pub correctly_answered: Json<Vec<String>>,
    pub pass_had_errors: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `completed_levels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompletedLevel {
    pub user_id: DbId,
    pub level_id: DbId,
    pub completed_at: Timestamp,
}

/// A row from the `completed_modules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompletedModule {
    pub user_id: DbId,
    pub module_id: DbId,
    pub completed_at: Timestamp,
}
