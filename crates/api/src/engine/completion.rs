//! End-of-lesson reconciliation.
//!
//! Runs the whole read-compute-write sequence inside one transaction with
//! the user row locked, so concurrent completions from other sessions
//! serialize instead of overwriting each other, and a failure in any step
//! rolls everything back: no partial credit.
//!
//! The only permitted partial application is the module-perfection stage:
//! when the level's parent module cannot be resolved, that stage is skipped
//! with a warning and the lesson/level results still commit.

use fixgo_core::completion::{self, CompletionInput, ModuleScope};
use fixgo_core::error::CoreError;
use fixgo_core::progress::AdiamantadaSet;
use fixgo_core::types::DbId;
use fixgo_core::walker::ContentWalker;
use fixgo_db::repositories::{LessonRepo, LevelRepo, ProgressRepo, UserRepo};
use fixgo_db::DbPool;
use serde::Serialize;

use crate::error::AppResult;

/// Result of completing one lesson pass.
#[derive(Debug, Serialize)]
pub struct CompletionSummary {
    pub all_correct: bool,
    pub first_completion: bool,
    pub xp_awarded: i32,
    pub tuerquitas_awarded: i32,
    pub lesson_perfected: bool,
    pub level_perfected: bool,
    pub module_perfected: bool,
    /// User totals after the awards.
    pub xp: i32,
    pub tuerquitas: i32,
    /// How long the client should show the completion screen before
    /// navigating back, in milliseconds.
    pub redirect_delay_ms: u64,
}

/// Reconcile rewards and flags for a finished lesson pass.
///
/// `cursor` is the client's walker position; completion requires the
/// cursor to have moved past the last content item.
pub async fn complete_lesson(
    pool: &DbPool,
    user_id: DbId,
    lesson_id: DbId,
    cursor: usize,
) -> AppResult<CompletionSummary> {
    let mut tx = pool.begin().await?;

    // Lock the user row for the whole sequence.
    let user = UserRepo::find_for_update(&mut *tx, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", user_id))?;

    let lesson = LessonRepo::find_by_id_tx(&mut *tx, lesson_id)
        .await?
        .ok_or_else(|| CoreError::not_found("lesson", lesson_id))?;

    let walker = ContentWalker::with_cursor(lesson.content.0.clone(), cursor);
    if !walker.has_reached_end() {
        return Err(CoreError::Validation(format!(
            "Lesson not finished: at item {} of {}",
            walker.display_position(),
            walker.total(),
        ))
        .into());
    }
    let total_questions = walker.questions().len();

    // Accumulated correctness for this pass.
    let progress = ProgressRepo::get_for_lesson_tx(&mut *tx, user_id, lesson_id).await?;
    let correct_answers = progress
        .as_ref()
        .map(|p| p.correctly_answered.0.len())
        .unwrap_or_default();
    let pass_had_errors = progress.as_ref().is_some_and(|p| p.pass_had_errors);

    let level_already_completed =
        ProgressRepo::level_is_completed_tx(&mut *tx, user_id, lesson.level_id).await?;
    let lesson_ids_in_level = LessonRepo::list_ids_for_level(&mut *tx, lesson.level_id).await?;
    let adiamantadas =
        AdiamantadaSet::from_keys(ProgressRepo::list_adiamantada_keys_tx(&mut *tx, user_id).await?);

    // Integrity boundary: a missing level document aborts only the
    // module-perfection stage, not the rest of the completion.
    let module_scope = match LevelRepo::find_by_id_tx(&mut *tx, lesson.level_id).await? {
        Some(level) => {
            let level_ids = LevelRepo::list_ids_for_module(&mut *tx, level.module_id).await?;
            Some((level.module_id, level_ids))
        }
        None => {
            tracing::warn!(
                level_id = lesson.level_id,
                "Level document missing; skipping module-perfection check",
            );
            None
        }
    };

    let outcome = completion::evaluate_completion(&CompletionInput {
        lesson_id,
        level_id: lesson.level_id,
        total_questions,
        correct_answers,
        pass_had_errors,
        level_already_completed,
        adiamantadas: &adiamantadas,
        lesson_ids_in_level: &lesson_ids_in_level,
        module: module_scope
            .as_ref()
            .map(|(module_id, level_ids)| ModuleScope {
                module_id: *module_id,
                level_ids,
            }),
    });

    // All writes happen against the same transaction.
    ProgressRepo::record_completed_level(&mut *tx, user_id, lesson.level_id).await?;
    ProgressRepo::finish_lesson(
        &mut *tx,
        user_id,
        lesson.level_id,
        lesson_id,
        correct_answers as i32,
        !outcome.all_correct,
    )
    .await?;
    ProgressRepo::insert_adiamantadas(&mut *tx, user_id, &outcome.new_flags).await?;
    UserRepo::apply_rewards(&mut *tx, user_id, outcome.xp_award, outcome.tuerquita_award).await?;
    if let Some(module_id) = outcome.completed_module_id {
        ProgressRepo::record_completed_module(&mut *tx, user_id, module_id).await?;
    }

    tx.commit().await?;

    tracing::info!(
        user_id,
        lesson_id,
        level_id = lesson.level_id,
        all_correct = outcome.all_correct,
        xp_award = outcome.xp_award,
        tuerquita_award = outcome.tuerquita_award,
        "Lesson completed",
    );

    Ok(CompletionSummary {
        all_correct: outcome.all_correct,
        first_completion: !level_already_completed,
        xp_awarded: outcome.xp_award,
        tuerquitas_awarded: outcome.tuerquita_award,
        lesson_perfected: outcome.lesson_perfected,
        level_perfected: outcome.level_perfected,
        module_perfected: outcome.module_perfected,
        xp: user.xp + outcome.xp_award,
        tuerquitas: user.tuerquitas + outcome.tuerquita_award,
        redirect_delay_ms: completion::REDIRECT_DELAY_MS,
    })
}
