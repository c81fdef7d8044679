// Deck Compiler - Aggregate resolved cards into a sorted, annotated list
// Output is stable: compiling the compiler's own output reproduces it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Section;

/// The final card emitted for one deck-entry group after resolution.
/// Set and number are absent for basic energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCard {
    pub quantity: u32,
    pub name: String,
    pub set_code: Option<String>,
    pub number: Option<String>,
    pub section: Section,
}

impl ResolvedCard {
    pub fn energy(quantity: u32, name: String) -> ResolvedCard {
        ResolvedCard {
            quantity,
            name,
            set_code: None,
            number: None,
            section: Section::Energy,
        }
    }

    /// The rendered line body after the quantity: "<name> <SET> <number>",
    /// or just the name when no printing is attached. Set codes render
    /// upper-case.
    pub fn body(&self) -> String {
        match (&self.set_code, &self.number) {
            (Some(set), Some(number)) => {
                format!("{} {} {}", self.name, set.to_uppercase(), number.to_uppercase())
            }
            _ => self.name.clone(),
        }
    }
}

/// Render resolved cards as deck-list text.
///
/// Sections appear in fixed order (Pokemon, Trainer, Energy), each headed by
/// "<Section> - <total>"; empty sections are omitted. Within a section,
/// entries with the same rendered body merge additively and sort
/// alphabetically by that body, so regenerated decks diff cleanly.
///
/// `extras` are lines that carried no section context (stray passthrough
/// text); they are re-emitted verbatim ahead of all sections.
pub fn compile_deck(cards: &[ResolvedCard], extras: &[String]) -> String {
    let mut output: Vec<String> = extras.to_vec();

    for section in Section::ORDER {
        // BTreeMap keys are the line bodies, giving both aggregation and
        // alphabetical order.
        let mut grouped: BTreeMap<String, u32> = BTreeMap::new();
        for card in cards.iter().filter(|c| c.section == section) {
            *grouped.entry(card.body()).or_insert(0) += card.quantity;
        }

        if grouped.is_empty() {
            continue;
        }

        let total: u32 = grouped.values().sum();
        output.push(format!("{} - {}", section.label(), total));
        for (body, quantity) in grouped {
            output.push(format!("{} {}", quantity, body));
        }
    }

    output.join("\n")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn card(quantity: u32, name: &str, set: &str, number: &str, section: Section) -> ResolvedCard {
        ResolvedCard {
            quantity,
            name: name.to_string(),
            set_code: Some(set.to_string()),
            number: Some(number.to_string()),
            section,
        }
    }

    #[test]
    fn test_sections_in_fixed_order_with_totals() {
        let cards = vec![
            ResolvedCard::energy(8, "Lightning Energy".to_string()),
            card(2, "Iono", "PAL", "185", Section::Trainer),
            card(3, "Iron Crown ex", "TEF", "81", Section::Pokemon),
        ];

        let text = compile_deck(&cards, &[]);
        assert_eq!(
            text,
            "Pokemon - 3\n3 Iron Crown ex TEF 81\nTrainer - 2\n2 Iono PAL 185\nEnergy - 8\n8 Lightning Energy"
        );
    }

    #[test]
    fn test_duplicate_entries_aggregate() {
        let cards = vec![
            card(2, "Iono", "PAL", "185", Section::Trainer),
            card(1, "Iono", "PAL", "185", Section::Trainer),
        ];

        let text = compile_deck(&cards, &[]);
        assert_eq!(text, "Trainer - 3\n3 Iono PAL 185");
    }

    #[test]
    fn test_entries_sort_by_rendered_body() {
        let cards = vec![
            card(1, "Switch", "SVI", "194", Section::Trainer),
            card(4, "Earthen Vessel", "PRE", "106", Section::Trainer),
            card(2, "Nest Ball", "PAF", "84", Section::Trainer),
        ];

        let text = compile_deck(&cards, &[]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Trainer - 7");
        assert_eq!(lines[1], "4 Earthen Vessel PRE 106");
        assert_eq!(lines[2], "2 Nest Ball PAF 84");
        assert_eq!(lines[3], "1 Switch SVI 194");
    }

    #[test]
    fn test_set_code_renders_uppercase() {
        let cards = vec![card(1, "Iono", "pal", "185", Section::Trainer)];
        assert_eq!(compile_deck(&cards, &[]), "Trainer - 1\n1 Iono PAL 185");
    }

    #[test]
    fn test_empty_sections_omitted() {
        let cards = vec![ResolvedCard::energy(8, "Lightning Energy".to_string())];
        assert_eq!(compile_deck(&cards, &[]), "Energy - 8\n8 Lightning Energy");
    }

    #[test]
    fn test_extras_precede_sections() {
        let cards = vec![card(1, "Iono", "PAL", "185", Section::Trainer)];
        let extras = vec!["unparsed note".to_string()];

        let text = compile_deck(&cards, &extras);
        assert_eq!(text, "unparsed note\nTrainer - 1\n1 Iono PAL 185");
    }

    #[test]
    fn test_compile_is_idempotent_over_own_output() {
        use crate::decklist::{parse_decklist, DeckLine};

        let cards = vec![
            card(3, "Iron Crown ex", "TEF", "81", Section::Pokemon),
            card(2, "Iono", "PAL", "185", Section::Trainer),
            ResolvedCard::energy(8, "Lightning Energy".to_string()),
        ];
        let first = compile_deck(&cards, &[]);

        // Re-parse the output into resolved cards without touching a catalog.
        let mut reparsed = Vec::new();
        let mut section = None;
        for line in parse_decklist(&first) {
            match line {
                DeckLine::Header { section: s, .. } => section = Some(s),
                DeckLine::Card { entry, .. } => reparsed.push(ResolvedCard {
                    quantity: entry.quantity,
                    name: entry.name,
                    set_code: Some(entry.set_code),
                    number: Some(entry.number),
                    section: section.unwrap(),
                }),
                DeckLine::BasicEnergy { quantity, name, .. } => {
                    reparsed.push(ResolvedCard::energy(quantity, name))
                }
                DeckLine::Raw(raw) => panic!("unexpected raw line: {:?}", raw),
            }
        }

        assert_eq!(compile_deck(&reparsed, &[]), first);
    }
}
