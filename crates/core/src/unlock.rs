//! Sequential unlock gating for modules and levels.
//!
//! An entry is unlocked iff it is the first of its list (lowest sort order)
//! or its immediate predecessor has been completed. The same rule applies
//! to modules (against completed modules) and to levels within a module
//! (against completed levels).

use std::collections::HashSet;

use crate::types::DbId;

/// Compute the unlock status for each entry of `ids_in_order`.
///
/// `ids_in_order` must already be sorted by display order; `completed` is
/// the set of completed entry ids.
pub fn unlock_statuses(ids_in_order: &[DbId], completed: &HashSet<DbId>) -> Vec<bool> {
    ids_in_order
        .iter()
        .enumerate()
        .map(|(index, _)| index == 0 || completed.contains(&ids_in_order[index - 1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entry_is_always_unlocked() {
        let statuses = unlock_statuses(&[1, 2, 3], &HashSet::new());
        assert_eq!(statuses, vec![true, false, false]);
    }

    #[test]
    fn completing_the_predecessor_unlocks_the_next() {
        let completed: HashSet<DbId> = [1].into_iter().collect();
        let statuses = unlock_statuses(&[1, 2, 3], &completed);
        assert_eq!(statuses, vec![true, true, false]);
    }

    #[test]
    fn gaps_do_not_skip_ahead() {
        // Completing 2 without 1 unlocks 3 but leaves the order otherwise
        // intact: 2 itself stays locked until 1 is completed.
        let completed: HashSet<DbId> = [2].into_iter().collect();
        let statuses = unlock_statuses(&[1, 2, 3], &completed);
        assert_eq!(statuses, vec![true, false, true]);
    }

    #[test]
    fn empty_list_yields_no_statuses() {
        assert!(unlock_statuses(&[], &HashSet::new()).is_empty());
    }
}
