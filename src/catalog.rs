// 📖 Creature Catalog - Read-only bestiary view
// Loads the bundled dataset once and keeps only low-level core-bestiary creatures

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::xp::creature_xp_cost;

/// Creatures at or above this level never reach the catalog
pub const MAX_CATALOG_LEVEL_EXCLUSIVE: i32 = 3;

/// Substring a record's `source` must contain to be kept
pub const BESTIARY_SOURCE_MARKER: &str = "Bestiary pg.";

// ============================================================================
// RECORDS
// ============================================================================

/// Raw record as it appears in the dataset.
///
/// Fields beyond these are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatureRecord {
    pub name: String,
    pub level: i32,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub traits: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<String>,
}

impl CreatureRecord {
    /// Catalog-preparation filter
    pub fn is_catalog_eligible(&self) -> bool {
        self.level < MAX_CATALOG_LEVEL_EXCLUSIVE
            && self
                .source
                .as_deref()
                .is_some_and(|source| source.contains(BESTIARY_SOURCE_MARKER))
    }
}

/// Top-level dataset document: `{ "monsters": [...] }`
#[derive(Debug, Deserialize)]
struct Dataset {
    monsters: Vec<CreatureRecord>,
}

/// Catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creature {
    pub name: String,
    pub level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<String>>,
}

impl Creature {
    pub fn new(name: impl Into<String>, level: i32) -> Self {
        Creature {
            name: name.into(),
            level,
            link: None,
            traits: None,
        }
    }

    /// XP cost against the fixed party level
    pub fn xp_cost(&self) -> i32 {
        creature_xp_cost(self.level)
    }

    /// Traits, or an empty slice when the record had none
    pub fn trait_list(&self) -> &[String] {
        self.traits.as_deref().unwrap_or(&[])
    }
}

impl From<CreatureRecord> for Creature {
    fn from(record: CreatureRecord) -> Self {
        Creature {
            name: record.name,
            level: record.level,
            link: record.link,
            traits: record.traits,
        }
    }
}

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Level,
    Xp,
}

impl SortKey {
    /// Cycle order used by the UI: file order, then each column in turn
    pub fn cycle(current: Option<SortKey>) -> Option<SortKey> {
        match current {
            None => Some(SortKey::Name),
            Some(SortKey::Name) => Some(SortKey::Level),
            Some(SortKey::Level) => Some(SortKey::Xp),
            Some(SortKey::Xp) => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Level => "Level",
            SortKey::Xp => "XP Cost",
        }
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    creatures: Vec<Creature>,
}

impl Catalog {
    /// Load and filter the dataset at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read creature dataset: {:?}", path))?;

        let catalog = Self::from_json_str(&content)
            .with_context(|| format!("Invalid creature dataset: {:?}", path))?;

        info!(path = %path.display(), creatures = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Parse a dataset document and apply the catalog filter
    pub fn from_json_str(json: &str) -> Result<Self> {
        let dataset: Dataset =
            serde_json::from_str(json).context("Failed to parse creature dataset JSON")?;

        Ok(Self::from_records(dataset.monsters))
    }

    /// Build from raw records, keeping file order
    pub fn from_records(records: Vec<CreatureRecord>) -> Self {
        let total = records.len();
        let creatures: Vec<Creature> = records
            .into_iter()
            .filter(CreatureRecord::is_catalog_eligible)
            .map(Creature::from)
            .collect();

        debug!(total, kept = creatures.len(), "applied catalog filter");
        Catalog { creatures }
    }

    /// Creatures in dataset order
    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Stable sort; ties keep dataset order. `None` is dataset order and
    /// ignores `descending`.
    ///
    /// The XP column orders by level, like the level column. Costs rise
    /// with level except for out-of-table levels, which cost 0 but still
    /// sort by their level.
    pub fn sorted(&self, key: Option<SortKey>, descending: bool) -> Vec<&Creature> {
        let mut view: Vec<&Creature> = self.creatures.iter().collect();
        let Some(key) = key else {
            return view;
        };

        view.sort_by(|a, b| {
            let ordering = match key {
                SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortKey::Level | SortKey::Xp => a.level.cmp(&b.level),
            };
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        view
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"{
        "monsters": [
            { "name": "Goblin Warrior", "level": -1, "source": "Bestiary pg. 180",
              "traits": ["CE", "Small", "Goblin", "Humanoid"], "link": "https://example.org/goblin" },
            { "name": "Ogre Warrior", "level": 3, "source": "Bestiary pg. 254" },
            { "name": "Pugwampi", "level": 0, "source": "Bestiary 2 pg. 143" },
            { "name": "Wolf", "level": 1, "source": "Bestiary pg. 335", "hp": 24 },
            { "name": "Rat Swarm", "level": 1 },
            { "name": "Kobold Scout", "level": 1, "source": "Bestiary pg. 212" }
        ]
    }"#;

    #[test]
    fn test_filter_keeps_low_level_bestiary_creatures() {
        let catalog = Catalog::from_json_str(DATASET).unwrap();
        let names: Vec<&str> = catalog.creatures().iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Goblin Warrior", "Wolf", "Kobold Scout"]);
    }

    #[test]
    fn test_level_boundary() {
        let record = |level| CreatureRecord {
            name: "Test".to_string(),
            level,
            link: None,
            traits: None,
            source: Some("Bestiary pg. 1".to_string()),
        };

        assert!(record(2).is_catalog_eligible());
        assert!(record(-5).is_catalog_eligible());
        assert!(!record(3).is_catalog_eligible());
    }

    #[test]
    fn test_optional_fields_survive() {
        let catalog = Catalog::from_json_str(DATASET).unwrap();
        let goblin = catalog.find_by_name("Goblin Warrior").unwrap();

        assert_eq!(goblin.link.as_deref(), Some("https://example.org/goblin"));
        assert_eq!(goblin.trait_list().len(), 4);
        assert_eq!(goblin.xp_cost(), 20);

        let wolf = catalog.find_by_name("Wolf").unwrap();
        assert!(wolf.link.is_none());
        assert!(wolf.trait_list().is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Catalog::from_json_str("{ \"monsters\": [ { \"name\": 3 } ] }").is_err());
        assert!(Catalog::from_json_str("[]").is_err());
    }

    #[test]
    fn test_sorted_views() {
        let catalog = Catalog::from_json_str(DATASET).unwrap();

        let by_name: Vec<&str> = catalog
            .sorted(Some(SortKey::Name), false)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(by_name, vec!["Goblin Warrior", "Kobold Scout", "Wolf"]);

        // Wolf and Kobold Scout tie on level; dataset order is kept
        let by_level: Vec<&str> = catalog
            .sorted(Some(SortKey::Level), false)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(by_level, vec!["Goblin Warrior", "Wolf", "Kobold Scout"]);

        let by_xp_desc = catalog.sorted(Some(SortKey::Xp), true);
        assert_eq!(by_xp_desc.last().unwrap().name, "Goblin Warrior");

        // Unsorted is dataset order, whatever the direction
        let unsorted: Vec<&str> = catalog
            .sorted(None, true)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(unsorted, vec!["Goblin Warrior", "Wolf", "Kobold Scout"]);
    }

    #[test]
    fn test_xp_column_orders_by_level() {
        let catalog = Catalog::from_records(
            [("Grub", -4), ("Imp", 1), ("Far Below", -5), ("Rat", -3)]
                .into_iter()
                .map(|(name, level)| CreatureRecord {
                    name: name.to_string(),
                    level,
                    link: None,
                    traits: None,
                    source: Some("Bestiary pg. 9".to_string()),
                })
                .collect(),
        );

        // Grub (-4) and Far Below (-5) both cost 0; level decides, not file order
        let by_xp: Vec<&str> = catalog
            .sorted(Some(SortKey::Xp), false)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(by_xp, vec!["Far Below", "Grub", "Rat", "Imp"]);
        assert_eq!(catalog.find_by_name("Far Below").unwrap().xp_cost(), 0);
        assert_eq!(catalog.find_by_name("Grub").unwrap().xp_cost(), 0);
    }

    #[test]
    fn test_sort_key_cycle_includes_unsorted() {
        assert_eq!(SortKey::cycle(None), Some(SortKey::Name));
        assert_eq!(SortKey::cycle(Some(SortKey::Name)), Some(SortKey::Level));
        assert_eq!(SortKey::cycle(Some(SortKey::Level)), Some(SortKey::Xp));
        assert_eq!(SortKey::cycle(Some(SortKey::Xp)), None);
    }
}
