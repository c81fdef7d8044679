// Deck-List Parser - Raw deck text into structured lines
// Malformed lines are never dropped; they pass through as Raw.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::Section;

// A card line: quantity, non-greedy multi-word name, then the last two
// tokens as set code and card number.
static CARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s+(.*?)\s+([A-Z0-9-]+)\s+([A-Za-z0-9]+)\s*$").expect("card line pattern")
});

// Section headers like "Pokemon - 15" delimit categories and pass through.
static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(Pokemon|Pokémon|Trainer|Energy)\s*-\s*\d+\s*$").expect("header pattern")
});

// Basic energy with the literal word "Basic", optionally followed by a
// trailing count that must not be mistaken for a card number.
static BASIC_ENERGY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s+Basic\s+(.+?\s+Energy)(?:\s+\d+)?\s*$")
        .expect("basic energy pattern")
});

/// One parsed card line: quantity plus the card's claimed identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub quantity: u32,
    pub name: String,
    pub set_code: String,
    pub number: String,
}

/// One classified line of deck text.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckLine {
    /// Section header; sets the category for subsequent lines.
    Header { section: Section, raw: String },

    /// A card line to resolve against the catalog.
    Card { entry: DeckEntry, raw: String },

    /// A basic-energy line. Bypasses printing resolution entirely;
    /// the word "Basic" and any trailing count are already stripped.
    BasicEnergy { quantity: u32, name: String, raw: String },

    /// Anything else, passed through unchanged.
    Raw(String),
}

/// Parse raw deck text into an ordered sequence of classified lines.
pub fn parse_decklist(text: &str) -> Vec<DeckLine> {
    text.lines().map(|raw| classify_line(raw.trim())).collect()
}

fn classify_line(line: &str) -> DeckLine {
    if let Some(captures) = HEADER_RE.captures(line) {
        if let Some(section) = Section::parse(&captures[1]) {
            return DeckLine::Header {
                section,
                raw: line.to_string(),
            };
        }
    }

    if !line.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        return DeckLine::Raw(line.to_string());
    }

    if let Some(captures) = BASIC_ENERGY_RE.captures(line) {
        let quantity: u32 = captures[1].parse().unwrap_or(0);
        return DeckLine::BasicEnergy {
            quantity,
            name: captures[2].trim().to_string(),
            raw: line.to_string(),
        };
    }

    // "8 Lightning Energy 12" and "2 Water Energy": an energy-type line
    // without a set-code suffix is basic energy even without the word
    // "Basic". The trailing number there is a count, not a card number.
    if let Some(energy) = parse_bare_energy(line) {
        return energy;
    }

    if let Some(captures) = CARD_RE.captures(line) {
        let quantity: u32 = captures[1].parse().unwrap_or(0);
        let name = captures[2].trim();
        if quantity > 0 && !name.is_empty() {
            return DeckLine::Card {
                entry: DeckEntry {
                    quantity,
                    name: name.to_string(),
                    set_code: captures[3].to_string(),
                    number: captures[4].to_string(),
                },
                raw: line.to_string(),
            };
        }
    }

    DeckLine::Raw(line.to_string())
}

fn parse_bare_energy(line: &str) -> Option<DeckLine> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    let quantity: u32 = tokens[0].parse().ok()?;
    if quantity == 0 {
        return None;
    }

    let (name_tokens, last) = (&tokens[1..tokens.len() - 1], tokens[tokens.len() - 1]);

    // "2 Lightning Energy": the line simply ends in "Energy".
    if last.eq_ignore_ascii_case("energy") {
        let mut name = name_tokens.to_vec();
        name.push(last);
        return Some(DeckLine::BasicEnergy {
            quantity,
            name: name.join(" "),
            raw: line.to_string(),
        });
    }

    // "8 Lightning Energy 12": "Energy" followed by a bare count.
    if name_tokens
        .last()
        .map(|t| t.eq_ignore_ascii_case("energy"))
        .unwrap_or(false)
        && last.chars().all(|c| c.is_ascii_digit())
        && name_tokens.len() >= 2
    {
        return Some(DeckLine::BasicEnergy {
            quantity,
            name: name_tokens.join(" "),
            raw: line.to_string(),
        });
    }

    None
}

// ============================================================================
// TESTS
// ============================================================================
