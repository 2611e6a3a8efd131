//! Answer submission: judge one answer and apply its consequences.
//!
//! On a correct answer the question joins the pass's correctness
//! accumulator (`hadErrors` preserved from earlier misses); on an incorrect
//! one `hadErrors` is set and a life is lost. The verdict's feedback delay
//! is returned to the client as a pacing hint.

use fixgo_core::answer::{self, Verdict};
use fixgo_core::error::CoreError;
use fixgo_core::types::{DbId, Timestamp};
use fixgo_core::walker::ContentWalker;
use fixgo_db::models::user::User;
use fixgo_db::repositories::{LessonRepo, ProgressRepo};
use fixgo_db::DbPool;
use serde::Serialize;

use crate::engine::lives;
use crate::error::AppResult;

/// Feedback title for a correct answer.
const FEEDBACK_CORRECT: &str = "¡Correcto!";

/// Feedback title for an incorrect answer.
const FEEDBACK_INCORRECT: &str = "¡Incorrecto!";

/// Result of one answer submission.
#[derive(Debug, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Feedback headline shown with the toast.
    pub feedback: &'static str,
    /// The question's explanation, revealed after any submission.
    pub explanation: Option<String>,
    /// Distinct questions answered correctly so far in this pass.
    pub correct_count: usize,
    pub lives: i32,
    pub next_life_recovery_at: Option<Timestamp>,
    /// How long the client should wait before advancing, in milliseconds.
    pub advance_delay_ms: u64,
}

/// Judge a submission for one question of a lesson and persist its effects.
pub async fn submit_answer(
    pool: &DbPool,
    user: &User,
    lesson_id: DbId,
    question_id: &str,
    submitted: &str,
) -> AppResult<AnswerOutcome> {
    let lesson = LessonRepo::find_by_id(pool, lesson_id)
        .await?
        .ok_or_else(|| CoreError::not_found("lesson", lesson_id))?;

    let walker = ContentWalker::new(lesson.content.0.clone());
    let question = walker
        .find_question(question_id)
        .ok_or_else(|| CoreError::not_found("question", question_id))?;

    let verdict = answer::evaluate(question, submitted);

    match verdict {
        Verdict::Correct => {
            let progress = ProgressRepo::record_correct_answer(
                pool,
                user.id,
                lesson.level_id,
                lesson.id,
                question_id,
            )
            .await?;

            Ok(AnswerOutcome {
                correct: true,
                feedback: FEEDBACK_CORRECT,
                explanation: question.explanation.clone(),
                correct_count: progress.correctly_answered.0.len(),
                lives: user.lives,
                next_life_recovery_at: user.next_life_recovery_at,
                advance_delay_ms: verdict.advance_delay_ms(),
            })
        }
        Verdict::Incorrect => {
            ProgressRepo::record_incorrect_answer(pool, user.id, lesson.level_id, lesson.id)
                .await?;

            let life_state = lives::lose_life(pool, user).await?;

            let progress = ProgressRepo::get_for_lesson(pool, user.id, lesson.id).await?;
            let correct_count = progress
                .map(|p| p.correctly_answered.0.len())
                .unwrap_or_default();

            Ok(AnswerOutcome {
                correct: false,
                feedback: FEEDBACK_INCORRECT,
                explanation: question.explanation.clone(),
                correct_count,
                lives: life_state.lives,
                next_life_recovery_at: life_state.next_recovery_at,
                advance_delay_ms: verdict.advance_delay_ms(),
            })
        }
    }
}
