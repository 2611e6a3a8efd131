//! End-of-lesson reward computation.
//!
//! This is the pure half of the Completion Engine: given a snapshot of the
//! user's progress and the surrounding catalog, compute every award and
//! flag change in one pass. The API layer applies the outcome inside a
//! single database transaction, so either everything lands or nothing does.
//!
//! Award rules:
//! - XP: +20 the first time a level is completed, +10 on repeats.
//! - Tuerquitas, additive and independently guarded:
//!   +10 when the lesson was perfect and not already flagged,
//!   +20 when that makes every lesson of the level perfect (level not
//!       already flagged),
//!   +50 when that makes every level of the module perfect (module not
//!       already flagged); this also records a module completion.
//!
//! The level and module checks run on every completion, each guarded by
//! "all perfect" plus "not already flagged". Re-running completion is
//! therefore an idempotent repair pass: a flag lost to an earlier partial
//! failure is granted exactly once, never twice.

use crate::progress::{lesson_key, level_key, module_key, AdiamantadaSet};
use crate::types::DbId;

/// XP for completing a level for the first time.
pub const XP_FIRST_COMPLETION: i32 = 20;

/// XP for completing an already-completed level again.
pub const XP_REPEAT_COMPLETION: i32 = 10;

/// Tuerquitas for a perfect lesson.
pub const LESSON_PERFECT_BONUS: i32 = 10;

/// Tuerquitas when every lesson of the level is perfect.
pub const LEVEL_PERFECT_BONUS: i32 = 20;

/// Tuerquitas when every level of the module is perfect.
pub const MODULE_PERFECT_BONUS: i32 = 50;

/// Delay before the client navigates back to the dashboard, so the
/// completion screen can render. A pacing hint, not a server-side timer.
pub const REDIRECT_DELAY_MS: u64 = 1500;

/// Snapshot consumed by [`evaluate_completion`].
#[derive(Debug)]
pub struct CompletionInput<'a> {
    pub lesson_id: DbId,
    pub level_id: DbId,
    /// Questions in the lesson.
    pub total_questions: usize,
    /// Distinct questions answered correctly in this pass.
    pub correct_answers: usize,
    /// Whether any incorrect attempt was recorded during this pass. A
    /// retried miss still answers every question correctly, but the pass is
    /// no longer perfect.
    pub pass_had_errors: bool,
    /// Whether the level is already in `completedLevels`.
    pub level_already_completed: bool,
    /// Current perfection flags.
    pub adiamantadas: &'a AdiamantadaSet,
    /// Every lesson belonging to the level.
    pub lesson_ids_in_level: &'a [DbId],
    /// The parent module and its levels, or `None` when the level-to-module
    /// lookup failed; the module stage is then skipped.
    pub module: Option<ModuleScope<'a>>,
}

/// The parent-module context for the module-perfection stage.
#[derive(Debug)]
pub struct ModuleScope<'a> {
    pub module_id: DbId,
    pub level_ids: &'a [DbId],
}

/// Everything the Completion Engine must persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Every question answered correctly this pass.
    pub all_correct: bool,
    pub xp_award: i32,
    pub tuerquita_award: i32,
    /// The lesson was newly flagged perfect.
    pub lesson_perfected: bool,
    /// The level was newly flagged perfect.
    pub level_perfected: bool,
    /// The module was newly flagged perfect (also records completion).
    pub module_perfected: bool,
    /// Module whose completion record must be written, when any.
    pub completed_module_id: Option<DbId>,
    /// Adiamantada keys to insert, in grant order.
    pub new_flags: Vec<String>,
}

/// Compute the full reward outcome for one finished lesson pass.
pub fn evaluate_completion(input: &CompletionInput<'_>) -> CompletionOutcome {
    let all_correct =
        input.correct_answers == input.total_questions && !input.pass_had_errors;

    let xp_award = if input.level_already_completed {
        XP_REPEAT_COMPLETION
    } else {
        XP_FIRST_COMPLETION
    };

    let mut flags = input.adiamantadas.clone();
    let mut new_flags = Vec::new();
    let mut tuerquita_award = 0;

    // Lesson stage.
    let mut lesson_perfected = false;
    if all_correct && flags.mark(lesson_key(input.lesson_id)) {
        new_flags.push(lesson_key(input.lesson_id));
        tuerquita_award += LESSON_PERFECT_BONUS;
        lesson_perfected = true;
    }

    // Level stage: every lesson of the level perfect, level not yet flagged.
    let mut level_perfected = false;
    let all_lessons_perfect = !input.lesson_ids_in_level.is_empty()
        && input
            .lesson_ids_in_level
            .iter()
            .all(|id| flags.lesson_is_perfect(*id));
    if all_lessons_perfect && flags.mark(level_key(input.level_id)) {
        new_flags.push(level_key(input.level_id));
        tuerquita_award += LEVEL_PERFECT_BONUS;
        level_perfected = true;
    }

    // Module stage: skipped entirely when the module lookup failed.
    let mut module_perfected = false;
    let mut completed_module_id = None;
    if let Some(module) = &input.module {
        let all_levels_perfect = !module.level_ids.is_empty()
            && module.level_ids.iter().all(|id| flags.level_is_perfect(*id));
        if all_levels_perfect && flags.mark(module_key(module.module_id)) {
            new_flags.push(module_key(module.module_id));
            tuerquita_award += MODULE_PERFECT_BONUS;
            module_perfected = true;
            completed_module_id = Some(module.module_id);
        }
    }

    CompletionOutcome {
        all_correct,
        xp_award,
        tuerquita_award,
        lesson_perfected,
        level_perfected,
        module_perfected,
        completed_module_id,
        new_flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::AdiamantadaSet;

    fn flags(keys: &[String]) -> AdiamantadaSet {
        AdiamantadaSet::from_keys(keys.iter().cloned())
    }

    fn base_input<'a>(
        adiamantadas: &'a AdiamantadaSet,
        lessons: &'a [DbId],
        module: Option<ModuleScope<'a>>,
    ) -> CompletionInput<'a> {
        CompletionInput {
            lesson_id: 11,
            level_id: 1,
            total_questions: 3,
            correct_answers: 3,
            pass_had_errors: false,
            level_already_completed: false,
            adiamantadas,
            lesson_ids_in_level: lessons,
            module,
        }
    }

    // -----------------------------------------------------------------------
    // XP
    // -----------------------------------------------------------------------

    #[test]
    fn first_completion_awards_20_xp() {
        let empty = flags(&[]);
        let outcome = evaluate_completion(&base_input(&empty, &[11, 12], None));
        assert_eq!(outcome.xp_award, XP_FIRST_COMPLETION);
    }

    #[test]
    fn repeat_completion_awards_10_xp() {
        let empty = flags(&[]);
        let mut input = base_input(&empty, &[11, 12], None);
        input.level_already_completed = true;
        assert_eq!(evaluate_completion(&input).xp_award, XP_REPEAT_COMPLETION);
    }

    // -----------------------------------------------------------------------
    // Lesson perfection
    // -----------------------------------------------------------------------

    #[test]
    fn perfect_lesson_grants_single_10_bonus() {
        let empty = flags(&[]);
        let outcome = evaluate_completion(&base_input(&empty, &[11, 12], None));
        assert!(outcome.all_correct);
        assert!(outcome.lesson_perfected);
        assert_eq!(outcome.tuerquita_award, LESSON_PERFECT_BONUS);
        assert_eq!(outcome.new_flags, vec![lesson_key(11)]);
    }

    #[test]
    fn imperfect_pass_grants_no_bonus() {
        let empty = flags(&[]);
        let mut input = base_input(&empty, &[11, 12], None);
        input.correct_answers = 2;
        let outcome = evaluate_completion(&input);
        assert!(!outcome.all_correct);
        assert!(!outcome.lesson_perfected);
        assert_eq!(outcome.tuerquita_award, 0);
        assert!(outcome.new_flags.is_empty());
    }

    #[test]
    fn retried_miss_blocks_perfection() {
        // Every question ends up answered correctly, but one of them was
        // missed first: the pass is not perfect.
        let empty = flags(&[]);
        let mut input = base_input(&empty, &[11, 12], None);
        input.pass_had_errors = true;
        let outcome = evaluate_completion(&input);
        assert!(!outcome.all_correct);
        assert!(!outcome.lesson_perfected);
        assert_eq!(outcome.tuerquita_award, 0);
        // XP is still awarded for the completion itself.
        assert_eq!(outcome.xp_award, XP_FIRST_COMPLETION);
    }

    #[test]
    fn already_perfect_lesson_grants_no_repeat_bonus() {
        let existing = flags(&[lesson_key(11)]);
        let outcome = evaluate_completion(&base_input(&existing, &[11, 12], None));
        assert!(outcome.all_correct);
        assert!(!outcome.lesson_perfected);
        assert_eq!(outcome.tuerquita_award, 0);
    }

    // -----------------------------------------------------------------------
    // Level perfection
    // -----------------------------------------------------------------------

    #[test]
    fn last_perfect_lesson_cascades_to_the_level() {
        let existing = flags(&[lesson_key(12)]);
        let outcome = evaluate_completion(&base_input(&existing, &[11, 12], None));
        assert!(outcome.lesson_perfected);
        assert!(outcome.level_perfected);
        assert_eq!(
            outcome.tuerquita_award,
            LESSON_PERFECT_BONUS + LEVEL_PERFECT_BONUS
        );
        assert_eq!(outcome.new_flags, vec![lesson_key(11), level_key(1)]);
    }

    #[test]
    fn level_bonus_is_not_granted_twice() {
        let existing = flags(&[lesson_key(11), lesson_key(12), level_key(1)]);
        let outcome = evaluate_completion(&base_input(&existing, &[11, 12], None));
        assert!(!outcome.level_perfected);
        assert_eq!(outcome.tuerquita_award, 0);
    }

    #[test]
    fn missing_level_flag_is_repaired_on_a_later_pass() {
        // Every lesson is already perfect but the level flag was lost to a
        // partial failure; a repeat pass grants it exactly once.
        let existing = flags(&[lesson_key(11), lesson_key(12)]);
        let outcome = evaluate_completion(&base_input(&existing, &[11, 12], None));
        assert!(!outcome.lesson_perfected);
        assert!(outcome.level_perfected);
        assert_eq!(outcome.tuerquita_award, LEVEL_PERFECT_BONUS);
    }

    // -----------------------------------------------------------------------
    // Module perfection
    // -----------------------------------------------------------------------

    #[test]
    fn module_cascade_grants_all_three_bonuses() {
        let existing = flags(&[lesson_key(12), level_key(2)]);
        let module = ModuleScope {
            module_id: 100,
            level_ids: &[1, 2],
        };
        let outcome = evaluate_completion(&base_input(&existing, &[11, 12], Some(module)));
        assert!(outcome.lesson_perfected);
        assert!(outcome.level_perfected);
        assert!(outcome.module_perfected);
        assert_eq!(outcome.completed_module_id, Some(100));
        assert_eq!(
            outcome.tuerquita_award,
            LESSON_PERFECT_BONUS + LEVEL_PERFECT_BONUS + MODULE_PERFECT_BONUS
        );
    }

    #[test]
    fn module_bonus_is_idempotent() {
        let existing = flags(&[
            lesson_key(11),
            lesson_key(12),
            level_key(1),
            level_key(2),
            module_key(100),
        ]);
        let module = ModuleScope {
            module_id: 100,
            level_ids: &[1, 2],
        };
        let outcome = evaluate_completion(&base_input(&existing, &[11, 12], Some(module)));
        assert!(!outcome.module_perfected);
        assert_eq!(outcome.completed_module_id, None);
        assert_eq!(outcome.tuerquita_award, 0);
    }

    #[test]
    fn missing_module_scope_skips_the_module_stage() {
        let existing = flags(&[lesson_key(12)]);
        let outcome = evaluate_completion(&base_input(&existing, &[11, 12], None));
        // Lesson and level stages still apply.
        assert!(outcome.lesson_perfected);
        assert!(outcome.level_perfected);
        assert!(!outcome.module_perfected);
    }

    // -----------------------------------------------------------------------
    // Edge cases
    // -----------------------------------------------------------------------

    #[test]
    fn zero_question_lesson_counts_as_all_correct() {
        let empty = flags(&[]);
        let mut input = base_input(&empty, &[11], None);
        input.total_questions = 0;
        input.correct_answers = 0;
        let outcome = evaluate_completion(&input);
        assert!(outcome.all_correct);
        assert!(outcome.lesson_perfected);
    }

    #[test]
    fn empty_level_is_never_perfect() {
        let empty = flags(&[]);
        let input = base_input(&empty, &[], None);
        let outcome = evaluate_completion(&input);
        assert!(!outcome.level_perfected);
    }
}
