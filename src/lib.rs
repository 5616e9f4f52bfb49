// Encounter Builder - Core Library
// XP accounting, roster and catalog, shared by the CLI, the TUI and tests

pub mod xp;
pub mod catalog;
pub mod roster;
pub mod traits;

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use xp::{can_afford, creature_xp_cost, xp_cost, MAX_XP, PARTY_LEVEL};
pub use catalog::{Catalog, Creature, CreatureRecord, SortKey};
pub use roster::{Roster, RosterEntry};
pub use traits::{classify_trait, TraitKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
