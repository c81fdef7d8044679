// Rarity Tiers - Ordering and exclusion markers as configuration data
// Several historical orderings exist upstream; this is the canonical one.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::CardKind;

/// The canonical rarity vocabulary, least to most preferred. Rank is the
/// index in this list; labels not in the list rank below everything.
const DEFAULT_ORDER: [&str; 37] = [
    "common",
    "uncommon",
    "rare",
    "rare holo",
    "promo",
    "ultra rare",
    "no rarity",
    "rainbow rare",
    "rare holo ex",
    "rare secret",
    "shiny rare",
    "holo rare v",
    "illustration rare",
    "double rare",
    "rare holo gx",
    "special illustration rare",
    "holo rare vmax",
    "trainer gallery holo rare",
    "hyper rare",
    "rare holo lv.x",
    "trainer gallery holo rare v",
    "ace spec rare",
    "rare shiny gx",
    "holo rare vstar",
    "trainer gallery ultra rare",
    "rare break",
    "rare prism star",
    "rare prime",
    "rare holo star",
    "legend",
    "rare shining",
    "shiny rare v or vmax",
    "radiant rare",
    "shiny ultra rare",
    "trainer gallery secret rare",
    "trainer gallery holo rare v or vmax",
    "amazing rare",
];

/// Markers that disqualify a showcase printing from auto-selection.
/// Pokemon additionally exclude "ultra"; trainers additionally exclude the
/// gallery and secret reprints that exist purely as alternate art.
const DEFAULT_EXCLUSION: [&str; 3] = ["shiny", "rainbow", "hyper"];
const DEFAULT_POKEMON_EXTRA: [&str; 1] = ["ultra"];
const DEFAULT_TRAINER_EXTRA: [&str; 2] = ["gallery", "secret"];

/// Rarities considered "cheap enough" for utility trainers (items, stadiums,
/// tools), which should use their most available printing.
const DEFAULT_SAFE_UTILITY: [&str; 2] = ["common", "uncommon"];

// ============================================================================
// CONFIG
// ============================================================================

/// Rarity policy: tier ordering, per-kind exclusion markers, and the safe
/// list for utility trainers. Loadable from JSON so the policy can be tuned
/// without a rebuild; `Default` carries the documented canonical values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityConfig {
    /// Total order over rarity labels, least preferred first.
    pub order: Vec<String>,

    /// Substring markers excluding a printing for Pokemon.
    pub pokemon_exclusions: Vec<String>,

    /// Substring markers excluding a printing for trainers.
    pub trainer_exclusions: Vec<String>,

    /// Exact rarity labels acceptable for utility trainers.
    pub safe_utility: Vec<String>,
}

impl Default for RarityConfig {
    fn default() -> Self {
        let mut pokemon_exclusions: Vec<String> =
            DEFAULT_EXCLUSION.iter().map(|s| s.to_string()).collect();
        pokemon_exclusions.extend(DEFAULT_POKEMON_EXTRA.iter().map(|s| s.to_string()));

        let mut trainer_exclusions: Vec<String> =
            DEFAULT_EXCLUSION.iter().map(|s| s.to_string()).collect();
        trainer_exclusions.extend(DEFAULT_TRAINER_EXTRA.iter().map(|s| s.to_string()));

        RarityConfig {
            order: DEFAULT_ORDER.iter().map(|s| s.to_string()).collect(),
            pokemon_exclusions,
            trainer_exclusions,
            safe_utility: DEFAULT_SAFE_UTILITY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RarityConfig {
    /// Load a policy from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rarity config: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse rarity config JSON")
    }

    /// Rank of a rarity label in the configured order. Unknown labels and
    /// absent rarities rank -1, below every known tier.
    pub fn rank(&self, rarity: Option<&str>) -> i32 {
        let rarity = match rarity {
            Some(r) => r.trim().to_lowercase(),
            None => return -1,
        };

        self.order
            .iter()
            .position(|r| *r == rarity)
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    /// Whether a rarity label carries an exclusion marker for the given card
    /// kind (case-insensitive substring test). Energy kinds are never
    /// filtered; absent rarities are never excluded.
    pub fn is_excluded(&self, kind: CardKind, rarity: Option<&str>) -> bool {
        let rarity = match rarity {
            Some(r) => r.to_lowercase(),
            None => return false,
        };

        let markers = match kind {
            CardKind::Pokemon => &self.pokemon_exclusions,
            CardKind::Energy | CardKind::SpecialEnergy => return false,
            _ => &self.trainer_exclusions,
        };

        markers.iter().any(|m| rarity.contains(&m.to_lowercase()))
    }

    /// Whether a rarity label is on the safe list for utility trainers.
    pub fn is_safe_utility(&self, rarity: Option<&str>) -> bool {
        let rarity = match rarity {
            Some(r) => r.trim().to_lowercase(),
            None => return false,
        };

        self.safe_utility.iter().any(|r| *r == rarity)
    }
}

// ============================================================================
// TESTS
// ============================================================================
