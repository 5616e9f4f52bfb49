// ⚔️ XP Engine - Encounter cost accounting
// Maps a creature's level (relative to the party) to an XP cost

// ============================================================================
// CONSTANTS
// ============================================================================

/// Maximum total XP the encounter roster may reach
pub const MAX_XP: i32 = 120;

/// Reference party level. Fixed for now, but the cost function stays
/// parametric on it.
pub const PARTY_LEVEL: i32 = 1;

/// Smallest level delta with a defined cost
const MIN_DELTA: i32 = -4;

/// XP cost indexed by `delta - MIN_DELTA`, for deltas -4..=4
const XP_BY_LEVEL_DELTA: [i32; 9] = [10, 15, 20, 30, 40, 60, 80, 120, 160];

// ============================================================================
// COST LOOKUP
// ============================================================================

/// XP cost of a creature of `creature_level` against a party of `party_level`.
///
/// Deltas outside -4..=4 cost 0. That mirrors the published table, which
/// simply has no entry for them; the curve is not extrapolated.
pub fn xp_cost(creature_level: i32, party_level: i32) -> i32 {
    let Some(delta) = creature_level.checked_sub(party_level) else {
        return 0;
    };

    delta
        .checked_sub(MIN_DELTA)
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| XP_BY_LEVEL_DELTA.get(index))
        .copied()
        .unwrap_or(0)
}

/// XP cost against the fixed party level
pub fn creature_xp_cost(creature_level: i32) -> i32 {
    xp_cost(creature_level, PARTY_LEVEL)
}

/// Whether a creature costing `cost` fits on top of `current_total`.
/// Reaching the budget exactly is allowed.
pub fn can_afford(current_total: i32, cost: i32) -> bool {
    current_total.saturating_add(cost) <= MAX_XP
}

// ============================================================================
// TESTS
// ============================================================================
