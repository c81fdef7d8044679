// Identity Fingerprints - Decide which printings are the same playable card
// Structured-field equality, never substring matching against serialized text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::catalog::{CardKind, Printing};

// ============================================================================
// STRUCTURED GAMEPLAY FIELDS
// ============================================================================

/// One attack as stored in the catalog's serialized attacks column.
#[derive(Debug, Clone, Deserialize)]
pub struct Attack {
    pub name: String,

    #[serde(default)]
    pub cost: Vec<String>,

    #[serde(default)]
    pub effect: Option<String>,

    /// Damage is stored inconsistently upstream: sometimes a number,
    /// sometimes a string like "120+", sometimes null.
    #[serde(default)]
    pub damage: Option<serde_json::Value>,
}

impl Attack {
    pub fn damage_text(&self) -> Option<String> {
        match self.damage.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// One ability as stored in the catalog's serialized abilities column.
#[derive(Debug, Clone, Deserialize)]
pub struct Ability {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub effect: Option<String>,
}

/// Parse a serialized attacks column into structured attacks.
/// Returns None when the column is absent, empty, or a literal "None".
pub fn parse_attacks(raw: Option<&str>) -> Option<Vec<Attack>> {
    let raw = non_null(raw)?;
    serde_json::from_str(raw).ok()
}

/// Parse a serialized abilities column into structured abilities.
pub fn parse_abilities(raw: Option<&str>) -> Option<Vec<Ability>> {
    let raw = non_null(raw)?;
    serde_json::from_str(raw).ok()
}

/// The attack-name signature used for Pokemon identity: the names of all
/// attacks, in printed order. Falls back to the raw column text when the
/// serialized form does not parse, so comparison stays exact either way.
pub fn attack_signature(printing: &Printing) -> Option<String> {
    let raw = non_null(printing.attacks.as_deref())?;

    match serde_json::from_str::<Vec<Attack>>(raw) {
        Ok(attacks) if !attacks.is_empty() => Some(
            attacks
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join("/"),
        ),
        Ok(_) => None,
        Err(_) => Some(raw.trim().to_string()),
    }
}

/// Treat empty strings and the literal "None"/"none" (an artifact of the
/// upstream ingestion) as absent values.
pub fn non_null(raw: Option<&str>) -> Option<&str> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(raw)
    }
}

static VARIANT_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("variant suffix pattern"));

/// Strip a trailing parenthesized alternate-art marker from a card name,
/// e.g. "Boss's Orders (Ghetsis)" → "Boss's Orders".
pub fn strip_variant_suffix(name: &str) -> String {
    VARIANT_SUFFIX_RE.replace(name.trim(), "").to_string()
}

// ============================================================================
// FINGERPRINT
// ============================================================================

/// The key deciding that two printings represent the same playable card.
///
/// - Pokemon: name + attack-name signature. Reprints with altered attack
///   text are different identities. Attackless printings of a name form one
///   identity group.
/// - Trainers with rules text: name + exact rules text. Without rules text:
///   name alone, after stripping a parenthesized alternate-art suffix.
/// - Energy: name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    Pokemon {
        name: String,
        attack_signature: Option<String>,
    },
    Trainer {
        name: String,
        rules: Option<String>,
    },
    Energy {
        name: String,
    },
}

impl Fingerprint {
    pub fn of(printing: &Printing) -> Fingerprint {
        match printing.kind() {
            CardKind::Pokemon => Fingerprint::Pokemon {
                name: printing.name.clone(),
                attack_signature: attack_signature(printing),
            },
            CardKind::Energy | CardKind::SpecialEnergy => Fingerprint::Energy {
                name: strip_variant_suffix(&printing.name),
            },
            _ => {
                let rules = non_null(printing.rules.as_deref());
                match rules {
                    Some(rules) => Fingerprint::Trainer {
                        name: printing.name.clone(),
                        rules: Some(rules.to_string()),
                    },
                    None => Fingerprint::Trainer {
                        name: strip_variant_suffix(&printing.name),
                        rules: None,
                    },
                }
            }
        }
    }

    /// Name to search the catalog with, and whether the search should be a
    /// prefix match (suffix-stripped identities) or exact.
    pub fn search_name(&self) -> (&str, bool) {
        match self {
            Fingerprint::Pokemon { name, .. } => (name, false),
            Fingerprint::Trainer { name, rules: Some(_) } => (name, false),
            Fingerprint::Trainer { name, rules: None } => (name, true),
            Fingerprint::Energy { name } => (name, true),
        }
    }

    /// Whether `other` carries this fingerprint.
    pub fn matches(&self, other: &Printing) -> bool {
        match self {
            Fingerprint::Pokemon { name, attack_signature: sig } => {
                other.kind() == CardKind::Pokemon
                    && other.name == *name
                    && attack_signature(other) == *sig
            }
            Fingerprint::Trainer { name, rules: Some(rules) } => {
                is_trainer(other.kind())
                    && other.name == *name
                    && non_null(other.rules.as_deref()) == Some(rules.as_str())
            }
            Fingerprint::Trainer { name, rules: None } => {
                is_trainer(other.kind()) && strip_variant_suffix(&other.name) == *name
            }
            Fingerprint::Energy { name } => {
                other.kind().is_energy() && strip_variant_suffix(&other.name) == *name
            }
        }
    }
}

fn is_trainer(kind: CardKind) -> bool {
    matches!(
        kind,
        CardKind::Supporter | CardKind::Item | CardKind::Stadium | CardKind::Tool | CardKind::Other
    )
}

// ============================================================================
// TESTS
// ============================================================================
