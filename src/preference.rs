// Printing Preference Engine - Pick the canonical printing of a card
// Pure function of (kind, base, candidates, policy); deterministic.

use std::cmp::Ordering;

use crate::catalog::{CardKind, Printing};
use crate::rarity::RarityConfig;

/// Compare two printings by release recency: parsed release dates when both
/// sides have one, otherwise lexical order of the raw date column. Later
/// sorts greater.
pub fn recency_cmp(a: &Printing, b: &Printing) -> Ordering {
    match (a.release_date(), b.release_date()) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a
            .date
            .as_deref()
            .unwrap_or("")
            .cmp(b.date.as_deref().unwrap_or("")),
    }
}

/// Select the preferred printing for a card.
///
/// - Energy (basic and special) is returned as-is; printing choice carries
///   no weight there.
/// - Utility trainers (items, stadiums, tools) take the most recent printing
///   among common/uncommon rarities, falling back to the most recent overall.
///   Rarity rank is deliberately ignored: these cards should use their most
///   available printing.
/// - Pokemon and supporters drop candidates whose rarity label carries an
///   exclusion marker, then take the highest rarity rank, tie-broken by
///   recency. If filtering removes every candidate, the base printing is
///   returned unchanged.
///
/// Remaining ties break by candidate input order (last wins). That order
/// follows the catalog accessor's recency sort and is stable for identical
/// inputs, but is not guaranteed stable across catalog re-ingestion.
pub fn select_preferred(
    kind: CardKind,
    base: &Printing,
    candidates: &[Printing],
    config: &RarityConfig,
) -> Printing {
    match kind {
        CardKind::Energy | CardKind::SpecialEnergy => base.clone(),

        CardKind::Item | CardKind::Stadium | CardKind::Tool => {
            let safe: Vec<&Printing> = candidates
                .iter()
                .filter(|p| config.is_safe_utility(p.rarity.as_deref()))
                .collect();

            let pool = if safe.is_empty() {
                candidates.iter().collect::<Vec<_>>()
            } else {
                safe
            };

            pool.into_iter()
                .max_by(|a, b| recency_cmp(a, b))
                .cloned()
                .unwrap_or_else(|| base.clone())
        }

        CardKind::Pokemon | CardKind::Supporter => {
            let filtered: Vec<&Printing> = candidates
                .iter()
                .filter(|p| !config.is_excluded(kind, p.rarity.as_deref()))
                .collect();

            if filtered.is_empty() {
                return base.clone();
            }

            filtered
                .into_iter()
                .max_by(|a, b| {
                    config
                        .rank(a.rarity.as_deref())
                        .cmp(&config.rank(b.rarity.as_deref()))
                        .then_with(|| recency_cmp(a, b))
                })
                .cloned()
                .unwrap_or_else(|| base.clone())
        }

        // Unrecognized card types get no preference logic.
        CardKind::Other => base.clone(),
    }
}

/// Index of the engine's choice within `candidates`, for presenting a
/// default to an interactive picker. Falls back to the base printing's
/// position, then 0.
pub fn default_choice_index(
    kind: CardKind,
    base: &Printing,
    candidates: &[Printing],
    config: &RarityConfig,
) -> usize {
    let chosen = select_preferred(kind, base, candidates, config);

    candidates
        .iter()
        .position(|p| p.same_printing(&chosen) && p.name == chosen.name)
        .or_else(|| candidates.iter().position(|p| p.same_printing(base)))
        .unwrap_or(0)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{pokemon, trainer};

    #[test]
    fn test_pokemon_prefers_highest_allowed_rarity() {
        let config = RarityConfig::default();
        let base = pokemon("Iron Crown ex", "TEF", "81", "Double Rare", "2024-01-26");
        let candidates = vec![
            base.clone(),
            pokemon("Iron Crown ex", "PAF", "206", "Special Illustration Rare", "2024-01-26"),
        ];

        let chosen = select_preferred(CardKind::Pokemon, &base, &candidates, &config);
        assert_eq!(chosen.set_code, "PAF");
    }

    #[test]
    fn test_pokemon_excludes_ultra_rare_reprint() {
        // "3 Iron Crown ex TEF 81" must stay in TEF when the only other
        // printing is an excluded Ultra Rare.
        let config = RarityConfig::default();
        let base = pokemon("Iron Crown ex", "TEF", "81", "Double Rare", "2024-01-26");
        let candidates = vec![
            base.clone(),
            pokemon("Iron Crown ex", "SSP", "156", "Ultra Rare", "2024-11-08"),
        ];

        let chosen = select_preferred(CardKind::Pokemon, &base, &candidates, &config);
        assert!(chosen.same_printing(&base));
    }

    #[test]
    fn test_fallback_when_all_candidates_excluded() {
        let config = RarityConfig::default();
        let base = pokemon("Pikachu", "SSP", "57", "Hyper Rare", "2024-11-08");
        let candidates = vec![
            pokemon("Pikachu", "SSP", "57", "Hyper Rare", "2024-11-08"),
            pokemon("Pikachu", "SVP", "85", "Shiny Rare", "2023-09-22"),
        ];

        let chosen = select_preferred(CardKind::Pokemon, &base, &candidates, &config);
        assert!(chosen.same_printing(&base));
    }

    #[test]
    fn test_empty_candidates_returns_base() {
        let config = RarityConfig::default();
        let base = pokemon("Pikachu", "SSP", "57", "Common", "2024-11-08");

        let chosen = select_preferred(CardKind::Pokemon, &base, &[], &config);
        assert!(chosen.same_printing(&base));
    }

    #[test]
    fn test_rarity_tie_breaks_by_recency() {
        let config = RarityConfig::default();
        let base = pokemon("Miraidon", "TEF", "121", "Rare", "2024-01-26");
        let candidates = vec![
            base.clone(),
            pokemon("Miraidon", "JTG", "66", "Rare", "2025-03-28"),
        ];

        let chosen = select_preferred(CardKind::Pokemon, &base, &candidates, &config);
        assert_eq!(chosen.set_code, "JTG");
    }

    #[test]
    fn test_utility_trainer_prefers_recent_cheap_printing() {
        // Common 2021, Uncommon 2023, Rare Holo 2022: the 2023 Uncommon
        // wins despite Rare Holo's higher rank.
        let config = RarityConfig::default();
        let base = trainer("Super Rod", "Item", "AAA", "1", "Common", "2021-01-01");
        let candidates = vec![
            base.clone(),
            trainer("Super Rod", "Item", "CCC", "3", "Rare Holo", "2022-01-01"),
            trainer("Super Rod", "Item", "BBB", "2", "Uncommon", "2023-05-01"),
        ];

        let chosen = select_preferred(CardKind::Item, &base, &candidates, &config);
        assert_eq!(chosen.set_code, "BBB");
    }

    #[test]
    fn test_utility_trainer_falls_back_to_most_recent() {
        let config = RarityConfig::default();
        let base = trainer("Prime Catcher", "Item", "TEF", "157", "ACE SPEC Rare", "2024-01-26");
        let candidates = vec![
            base.clone(),
            trainer("Prime Catcher", "Item", "PRE", "160", "ACE SPEC Rare", "2025-01-17"),
        ];

        let chosen = select_preferred(CardKind::Item, &base, &candidates, &config);
        assert_eq!(chosen.set_code, "PRE");
    }

    #[test]
    fn test_supporter_excludes_gallery_reprints() {
        let config = RarityConfig::default();
        let base = trainer("Iono", "Supporter", "PAL", "185", "Uncommon", "2023-03-31");
        let candidates = vec![
            base.clone(),
            trainer("Iono", "Supporter", "PAF", "237", "Trainer Gallery Holo Rare", "2024-01-26"),
        ];

        let chosen = select_preferred(CardKind::Supporter, &base, &candidates, &config);
        assert!(chosen.same_printing(&base));
    }

    #[test]
    fn test_supporter_may_take_ultra_rare() {
        // "ultra" is only excluded for Pokemon.
        let config = RarityConfig::default();
        let base = trainer("Professor's Research", "Supporter", "SVI", "189", "Rare", "2023-03-31");
        let candidates = vec![
            base.clone(),
            trainer("Professor's Research", "Supporter", "PAF", "240", "Ultra Rare", "2024-01-26"),
        ];

        let chosen = select_preferred(CardKind::Supporter, &base, &candidates, &config);
        assert_eq!(chosen.set_code, "PAF");
    }

    #[test]
    fn test_special_energy_is_left_alone() {
        let config = RarityConfig::default();
        let base = trainer("Double Turbo Energy", "Special Energy", "BRS", "151", "Uncommon", "2022-02-25");
        let candidates = vec![
            base.clone(),
            trainer("Double Turbo Energy", "Special Energy", "CRZ", "120", "Rare Holo", "2022-11-04"),
        ];

        let chosen = select_preferred(CardKind::SpecialEnergy, &base, &candidates, &config);
        assert!(chosen.same_printing(&base));
    }

    #[test]
    fn test_unknown_rarity_still_selectable() {
        let config = RarityConfig::default();
        let base = pokemon("Miraidon", "TEF", "121", "Neo Rare", "2024-01-26");
        let candidates = vec![base.clone()];

        let chosen = select_preferred(CardKind::Pokemon, &base, &candidates, &config);
        assert!(chosen.same_printing(&base));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let config = RarityConfig::default();
        let base = pokemon("Miraidon", "TEF", "121", "Rare", "2024-01-26");
        let candidates = vec![
            base.clone(),
            pokemon("Miraidon", "JTG", "66", "Rare", "2024-01-26"),
            pokemon("Miraidon", "SVP", "12", "Promo", "2024-01-26"),
        ];

        let first = select_preferred(CardKind::Pokemon, &base, &candidates, &config);
        let second = select_preferred(CardKind::Pokemon, &base, &candidates, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rarity_monotonicity() {
        // Two candidates differing only in rarity: the higher configured
        // rank must win.
        let config = RarityConfig::default();
        let base = pokemon("Miraidon", "TEF", "121", "Rare", "2024-01-26");
        let candidates = vec![
            pokemon("Miraidon", "TEF", "121", "Rare", "2024-01-26"),
            pokemon("Miraidon", "TEF", "222", "Double Rare", "2024-01-26"),
        ];

        let chosen = select_preferred(CardKind::Pokemon, &base, &candidates, &config);
        assert_eq!(chosen.number, "222");
    }

    #[test]
    fn test_default_choice_index() {
        let config = RarityConfig::default();
        let base = pokemon("Iron Crown ex", "TEF", "81", "Double Rare", "2024-01-26");
        let candidates = vec![
            pokemon("Iron Crown ex", "SSP", "156", "Ultra Rare", "2024-11-08"),
            base.clone(),
        ];

        let idx = default_choice_index(CardKind::Pokemon, &base, &candidates, &config);
        assert_eq!(idx, 1);
    }
}
