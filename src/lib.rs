// deckfix - Deck-list normalization against a local card catalog
// Exposes all modules for use in the CLI and tests.

pub mod catalog;
pub mod compiler;
pub mod decklist;
pub mod export;
pub mod identity;
pub mod preference;
pub mod rarity;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use catalog::{catalog_schema, CardCatalog, CardKind, Printing, Section, SqliteCatalog};
pub use compiler::{compile_deck, ResolvedCard};
pub use decklist::{parse_decklist, DeckEntry, DeckLine};
pub use export::export_catalog;
pub use identity::{attack_signature, strip_variant_suffix, Fingerprint};
pub use preference::{default_choice_index, select_preferred};
pub use rarity::RarityConfig;
pub use resolver::{resolve_deck, PrintingPicker, ResolutionReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
