//! Canonical progress-record shapes and adiamantada keys.
//!
//! The per-user progress record is the wire contract other collaborators
//! (the payment webhook among them) must honor, so the serialized field
//! names follow the stored document: camelCase scalars, `levelProgress`
//! nested under `lessons`, and an `adiamantadas` map keyed by lesson id,
//! `nivel-<levelId>` or `modulo-<moduleId>`.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Per-lesson ledger kept under `levelProgress.<level>.lessons.<lesson>`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonLedger {
    /// Completed passes through the lesson.
    pub attempts: i32,
    /// Correct answers in the most recent pass.
    pub last_score: i32,
    /// True when the most recent pass had at least one incorrect answer.
    pub had_errors: bool,
}

/// One level's slot in `levelProgress`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelProgress {
    pub lessons: BTreeMap<String, LessonLedger>,
}

/// Full progress record as served by `GET /user/progress`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub lives: i32,
    pub next_life_recovery_time: Option<Timestamp>,
    pub tuerquitas: i32,
    pub xp: i32,
    pub completed_levels: Vec<DbId>,
    pub level_progress: BTreeMap<String, LevelProgress>,
    /// Keys present in the map are flagged perfect (always `true`).
    pub adiamantadas: BTreeMap<String, bool>,
    pub completed_modules: Vec<DbId>,
}

/// Adiamantada key for a lesson: the lesson id itself.
pub fn lesson_key(lesson_id: DbId) -> String {
    lesson_id.to_string()
}

/// Adiamantada key for a level.
pub fn level_key(level_id: DbId) -> String {
    format!("nivel-{level_id}")
}

/// Adiamantada key for a module.
pub fn module_key(module_id: DbId) -> String {
    format!("modulo-{module_id}")
}

/// The set of adiamantada flags a user holds.
///
/// A thin wrapper over the key set so callers cannot mix raw strings with
/// the `nivel-`/`modulo-` key scheme.
#[derive(Debug, Clone, Default)]
pub struct AdiamantadaSet {
    keys: HashSet<String>,
}

impl AdiamantadaSet {
    pub fn from_keys(keys: impl IntoIterator<Item = String>) -> Self {
        AdiamantadaSet {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Insert a key, returning `true` when it was newly added.
    pub fn mark(&mut self, key: String) -> bool {
        self.keys.insert(key)
    }

    pub fn lesson_is_perfect(&self, lesson_id: DbId) -> bool {
        self.contains(&lesson_key(lesson_id))
    }

    pub fn level_is_perfect(&self, level_id: DbId) -> bool {
        self.contains(&level_key(level_id))
    }

    pub fn module_is_perfect(&self, module_id: DbId) -> bool {
        self.contains(&module_key(module_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_the_nivel_and_modulo_prefixes() {
        assert_eq!(lesson_key(7), "7");
        assert_eq!(level_key(7), "nivel-7");
        assert_eq!(module_key(7), "modulo-7");
    }

    #[test]
    fn mark_reports_newly_added_only_once() {
        let mut set = AdiamantadaSet::default();
        assert!(set.mark(level_key(3)));
        assert!(!set.mark(level_key(3)));
        assert!(set.level_is_perfect(3));
        assert!(!set.module_is_perfect(3));
    }

    #[test]
    fn ledger_serializes_camel_case() {
        let ledger = LessonLedger {
            attempts: 2,
            last_score: 3,
            had_errors: true,
        };
        let json = serde_json::to_value(ledger).unwrap();
        assert_eq!(json["attempts"], 2);
        assert_eq!(json["lastScore"], 3);
        assert_eq!(json["hadErrors"], true);
    }
}
