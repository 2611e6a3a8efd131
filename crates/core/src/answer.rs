//! Answer judgment.
//!
//! A submission is judged against the question's single canonical answer:
//! both sides are whitespace-trimmed and compared case-insensitively. The
//! options list plays no part in matching.

use crate::content::QuestionItem;

/// Delay before advancing after a correct answer, so the feedback can be
/// read. Returned to clients as a pacing hint.
pub const CORRECT_ADVANCE_DELAY_MS: u64 = 1200;

/// Delay after an incorrect answer (slightly longer).
pub const INCORRECT_ADVANCE_DELAY_MS: u64 = 1500;

/// Outcome of judging one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }

    /// The feedback-pacing delay associated with this verdict.
    pub fn advance_delay_ms(self) -> u64 {
        match self {
            Verdict::Correct => CORRECT_ADVANCE_DELAY_MS,
            Verdict::Incorrect => INCORRECT_ADVANCE_DELAY_MS,
        }
    }
}

/// Normalize a free-text answer for comparison.
pub fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Judge a submission against the question's canonical answer.
pub fn evaluate(question: &QuestionItem, submitted: &str) -> Verdict {
    if normalize(submitted) == normalize(&question.answer) {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: &str, options: &[&str]) -> QuestionItem {
        QuestionItem {
            id: "q1".to_string(),
            value: "¿?".to_string(),
            answer: answer.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            explanation: None,
            points: None,
        }
    }

    #[test]
    fn exact_match_is_correct() {
        let q = question("tuerca", &[]);
        assert_eq!(evaluate(&q, "tuerca"), Verdict::Correct);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let q = question("Ciudad de México", &[]);
        assert_eq!(evaluate(&q, "ciudad de méxico"), Verdict::Correct);
        assert_eq!(evaluate(&q, "CIUDAD DE MÉXICO"), Verdict::Correct);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let q = question("llave inglesa", &[]);
        assert_eq!(evaluate(&q, "  llave inglesa \n"), Verdict::Correct);
    }

    #[test]
    fn interior_whitespace_is_significant() {
        let q = question("llave inglesa", &[]);
        assert_eq!(evaluate(&q, "llaveinglesa"), Verdict::Incorrect);
    }

    #[test]
    fn options_are_not_matched() {
        // The canonical string is the only accepted answer, even when the
        // submission matches one of the displayed options.
        let q = question("martillo", &["destornillador", "martillo", "llave"]);
        assert_eq!(evaluate(&q, "destornillador"), Verdict::Incorrect);
    }

    #[test]
    fn wrong_answer_is_incorrect() {
        let q = question("4", &[]);
        assert_eq!(evaluate(&q, "5"), Verdict::Incorrect);
    }

    #[test]
    fn verdict_delays_match_feedback_pacing() {
        assert_eq!(Verdict::Correct.advance_delay_ms(), 1200);
        assert_eq!(Verdict::Incorrect.advance_delay_ms(), 1500);
    }
}
