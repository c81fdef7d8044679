// Deck Resolver - Orchestrates parse → lookup → expand → prefer → compile
// Lookups that fail are warnings, never lost lines; only a dead catalog aborts.

use anyhow::Result;

use crate::catalog::{CardCatalog, Printing, Section};
use crate::compiler::{compile_deck, ResolvedCard};
use crate::decklist::{parse_decklist, DeckEntry, DeckLine};
use crate::identity::strip_variant_suffix;
use crate::preference::{default_choice_index, select_preferred};
use crate::rarity::RarityConfig;

/// Outcome of a resolution pass: the compiled deck text plus non-fatal
/// warnings (printings the catalog could not find). Every input quantity
/// appears in the output exactly once, resolved or passed through.
#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Override hook for manual disambiguation. The engine computes its default
/// and hands the full candidate list to the picker; a CLI or UI collaborator
/// supplies the human answer. The core itself never prompts.
pub trait PrintingPicker {
    /// Return the index into `options` to use. Out-of-range answers fall
    /// back to `default_index`.
    fn pick(&self, entry: &DeckEntry, options: &[Printing], default_index: usize) -> usize;
}

/// Resolve a raw deck list against the catalog and re-emit it compiled.
pub fn resolve_deck(
    text: &str,
    catalog: &dyn CardCatalog,
    config: &RarityConfig,
    picker: Option<&dyn PrintingPicker>,
) -> Result<ResolutionReport> {
    let mut cards: Vec<ResolvedCard> = Vec::new();
    let mut extras: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut current: Option<Section> = None;

    for line in parse_decklist(text) {
        match line {
            DeckLine::Header { section, .. } => current = Some(section),

            DeckLine::BasicEnergy { quantity, name, .. } => {
                cards.push(ResolvedCard::energy(quantity, name));
            }

            DeckLine::Raw(raw) => handle_raw(raw, current, &mut cards, &mut extras),

            DeckLine::Card { entry, raw } => {
                match catalog.find_printing(&entry.set_code, &entry.number)? {
                    None => {
                        warnings.push(format!(
                            "printing not found for {} {} {}",
                            entry.name, entry.set_code, entry.number
                        ));
                        match current {
                            Some(section) => cards.push(ResolvedCard {
                                quantity: entry.quantity,
                                name: entry.name,
                                set_code: Some(entry.set_code),
                                number: Some(entry.number),
                                section,
                            }),
                            None => extras.push(raw),
                        }
                    }
                    Some(base) => cards.push(resolve_entry(&entry, base, catalog, config, picker)?),
                }
            }
        }
    }

    Ok(ResolutionReport {
        text: compile_deck(&cards, &extras),
        warnings,
    })
}

fn resolve_entry(
    entry: &DeckEntry,
    base: Printing,
    catalog: &dyn CardCatalog,
    config: &RarityConfig,
    picker: Option<&dyn PrintingPicker>,
) -> Result<ResolvedCard> {
    let kind = base.kind();

    // Energy printings carry no preference weight and render without a
    // set suffix; basic and special energy collapse to the card name.
    if kind.is_energy() {
        return Ok(ResolvedCard::energy(
            entry.quantity,
            strip_variant_suffix(&base.name),
        ));
    }

    let options = catalog.related_printings(&base)?;
    let mut chosen = select_preferred(kind, &base, &options, config);

    if let Some(picker) = picker {
        if options.len() > 1 {
            let default_index = default_choice_index(kind, &base, &options, config);
            let picked = picker.pick(entry, &options, default_index);
            chosen = options
                .get(picked)
                .or_else(|| options.get(default_index))
                .cloned()
                .unwrap_or(chosen);
        }
    }

    let section = kind.section();
    let name = match section {
        // Alternate-art name suffixes are dropped from trainers; the
        // canonical printing already identifies the card.
        Section::Trainer => strip_variant_suffix(&chosen.name),
        _ => chosen.name.clone(),
    };

    Ok(ResolvedCard {
        quantity: entry.quantity,
        name,
        set_code: Some(chosen.set_code),
        number: Some(chosen.number),
        section,
    })
}

fn handle_raw(
    raw: String,
    current: Option<Section>,
    cards: &mut Vec<ResolvedCard>,
    extras: &mut Vec<String>,
) {
    if raw.is_empty() {
        return;
    }

    // A digit-led line that failed card parsing still carries a quantity;
    // keep it countable inside its section so nothing is silently dropped.
    if let Some(section) = current {
        let mut parts = raw.splitn(2, char::is_whitespace);
        if let (Some(first), Some(rest)) = (parts.next(), parts.next()) {
            if let Ok(quantity) = first.parse::<u32>() {
                if quantity > 0 {
                    cards.push(ResolvedCard {
                        quantity,
                        name: rest.trim().to_string(),
                        set_code: None,
                        number: None,
                        section,
                    });
                    return;
                }
            }
        }
    }

    extras.push(raw);
}

// ============================================================================
// TESTS
// ============================================================================
