// 🏷️ Trait classification
// Display-only grouping of creature traits. Carries no XP or eligibility meaning.

pub const ALIGNMENTS: [&str; 9] = ["lg", "ng", "cg", "ln", "n", "cn", "le", "ne", "ce"];
pub const SIZES: [&str; 6] = ["tiny", "small", "medium", "large", "huge", "gargantuan"];
pub const RARITIES: [&str; 4] = ["common", "uncommon", "rare", "unique"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitKind {
    Alignment,
    Size,
    Rarity,
    Other,
}

/// Classify a trait name, case-insensitively.
///
/// Rarity is checked first, then alignment, then size.
pub fn classify_trait(name: &str) -> TraitKind {
    let lower = name.to_lowercase();
    let lower = lower.as_str();

    if RARITIES.contains(&lower) {
        TraitKind::Rarity
    } else if ALIGNMENTS.contains(&lower) {
        TraitKind::Alignment
    } else if SIZES.contains(&lower) {
        TraitKind::Size
    } else {
        TraitKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_categories() {
        assert_eq!(classify_trait("CE"), TraitKind::Alignment);
        assert_eq!(classify_trait("n"), TraitKind::Alignment);
        assert_eq!(classify_trait("Small"), TraitKind::Size);
        assert_eq!(classify_trait("GARGANTUAN"), TraitKind::Size);
        assert_eq!(classify_trait("Uncommon"), TraitKind::Rarity);
        assert_eq!(classify_trait("Unique"), TraitKind::Rarity);
    }

    #[test]
    fn test_unknown_traits_are_other() {
        assert_eq!(classify_trait("Goblin"), TraitKind::Other);
        assert_eq!(classify_trait("Humanoid"), TraitKind::Other);
        assert_eq!(classify_trait(""), TraitKind::Other);
    }
}
