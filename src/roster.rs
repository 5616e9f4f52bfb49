// 🛡️ Roster Manager - Encounter team under an XP budget
//
// Entries carry a UUID so the UI can key them, but removal matches by
// creature name and takes the first match in insertion order. Two entries
// for the same creature are therefore indistinguishable to `remove`.

use tracing::debug;

use crate::catalog::Creature;
use crate::xp::{can_afford, creature_xp_cost, MAX_XP};

// ============================================================================
// ROSTER ENTRY
// ============================================================================

/// A creature on the team plus its roster-scoped identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Generated on insertion, never reused within a roster
    pub id: String,

    pub creature: Creature,
}

impl RosterEntry {
    fn new(creature: Creature) -> Self {
        RosterEntry {
            id: uuid::Uuid::new_v4().to_string(),
            creature,
        }
    }

    pub fn name(&self) -> &str {
        &self.creature.name
    }

    pub fn xp_cost(&self) -> i32 {
        creature_xp_cost(self.creature.level)
    }
}

// ============================================================================
// ROSTER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Roster { entries: Vec::new() }
    }

    /// Append `creature` if it fits the budget.
    ///
    /// Over-budget adds leave the roster untouched. Returns whether the
    /// creature was appended.
    pub fn add(&mut self, creature: &Creature) -> bool {
        let current = self.total_cost();
        let cost = creature_xp_cost(creature.level);

        if !can_afford(current, cost) {
            debug!(name = %creature.name, cost, current, "add rejected: over budget");
            return false;
        }

        let entry = RosterEntry::new(creature.clone());
        debug!(name = %creature.name, id = %entry.id, cost, total = current + cost, "creature added");
        self.entries.push(entry);
        true
    }

    /// Remove the first entry whose name equals `creature.name`.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, creature: &Creature) -> bool {
        self.remove_by_name(&creature.name)
    }

    pub fn remove_by_name(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.creature.name == name) {
            Some(index) => {
                let removed = self.entries.remove(index);
                debug!(name = %name, id = %removed.id, index, "creature removed");
                true
            }
            None => {
                debug!(name = %name, "remove ignored: not on roster");
                false
            }
        }
    }

    /// Sum of entry costs, recomputed on every call
    pub fn total_cost(&self) -> i32 {
        self.entries.iter().map(RosterEntry::xp_cost).sum()
    }

    /// Budget left, as shown by the "XP Available" counter
    pub fn remaining_xp(&self) -> i32 {
        MAX_XP - self.total_cost()
    }

    /// Whether `creature` would currently be accepted by `add`
    pub fn can_add(&self, creature: &Creature) -> bool {
        can_afford(self.total_cost(), creature.xp_cost())
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Party level 1: level 0 costs 30, level 1 costs 40, level 3 costs 80
    fn creature(name: &str, level: i32) -> Creature {
        Creature::new(name, level)
    }

    fn names(roster: &Roster) -> Vec<&str> {
        roster.entries().iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::new();
        assert!(roster.is_empty());
        assert_eq!(roster.total_cost(), 0);
        assert_eq!(roster.remaining_xp(), MAX_XP);
    }

    #[test]
    fn test_add_appends_in_order_with_unique_ids() {
        let mut roster = Roster::new();
        assert!(roster.add(&creature("Goblin Warrior", -1)));
        assert!(roster.add(&creature("Wolf", 1)));
        assert!(roster.add(&creature("Goblin Warrior", -1)));

        assert_eq!(names(&roster), vec!["Goblin Warrior", "Wolf", "Goblin Warrior"]);
        assert_eq!(roster.total_cost(), 20 + 40 + 20);
        assert_ne!(roster.entries()[0].id, roster.entries()[2].id);
    }

    #[test]
    fn test_add_to_exact_budget() {
        let mut roster = Roster::new();
        assert!(roster.add(&creature("A", 1)));
        assert!(roster.add(&creature("B", 3)));
        assert_eq!(roster.total_cost(), MAX_XP);
        assert_eq!(roster.remaining_xp(), 0);
    }

    #[test]
    fn test_rejected_add_is_noop() {
        let mut roster = Roster::new();
        roster.add(&creature("A", 3));
        roster.add(&creature("B", 0));
        let before = roster.entries().to_vec();

        for _ in 0..3 {
            assert!(!roster.add(&creature("C", 0)));
        }

        assert_eq!(roster.entries(), before.as_slice());
        assert_eq!(roster.total_cost(), 110);
    }

    #[test]
    fn test_full_budget_then_remove_frees_space() {
        let mut roster = Roster::new();
        let a = creature("A", 1);
        let b = creature("B", 3);
        roster.add(&a);
        roster.add(&b);

        assert!(!roster.can_add(&creature("Tiny", -3)));
        assert!(!roster.add(&creature("Tiny", -3)));

        assert!(roster.remove(&a));
        assert_eq!(roster.total_cost(), 80);

        assert!(roster.can_add(&creature("C", 1)));
        assert!(!roster.can_add(&creature("D", 2)));
        assert!(roster.add(&creature("C", 1)));
        assert_eq!(roster.total_cost(), MAX_XP);
    }

    #[test]
    fn test_free_creatures_always_fit() {
        let mut roster = Roster::new();
        roster.add(&creature("A", 4));
        assert_eq!(roster.total_cost(), MAX_XP);

        // Delta 5 has no table entry and costs nothing
        assert!(roster.add(&creature("Far Out", 6)));
        assert_eq!(roster.total_cost(), MAX_XP);
    }

    #[test]
    fn test_remove_unknown_name_is_noop() {
        let mut roster = Roster::new();
        roster.add(&creature("A", 1));

        assert!(!roster.remove(&creature("Nobody", 1)));
        assert_eq!(names(&roster), vec!["A"]);
        assert_eq!(roster.total_cost(), 40);
    }

    #[test]
    fn test_remove_matches_by_name_not_level() {
        let mut roster = Roster::new();
        roster.add(&creature("A", 1));

        // Same name, different level still matches
        assert!(roster.remove(&creature("A", -1)));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_duplicate_names_remove_first_only() {
        let mut roster = Roster::new();
        roster.add(&creature("Goblin", -1));
        roster.add(&creature("Wolf", 1));
        roster.add(&creature("Goblin", -1));
        let second_goblin_id = roster.entries()[2].id.clone();

        assert!(roster.remove(&creature("Goblin", -1)));

        assert_eq!(names(&roster), vec!["Wolf", "Goblin"]);
        assert_eq!(roster.entries()[1].id, second_goblin_id);
    }

    #[test]
    fn test_order_preserved_across_interleaved_removals() {
        let mut roster = Roster::new();
        roster.add(&creature("A", -2));
        roster.add(&creature("B", -2));
        roster.remove(&creature("A", -2));
        roster.add(&creature("C", -2));
        roster.add(&creature("D", -2));
        roster.remove(&creature("C", -2));
        roster.add(&creature("E", -2));

        assert_eq!(names(&roster), vec!["B", "D", "E"]);
        assert_eq!(roster.total_cost(), 3 * 15);
    }
}
