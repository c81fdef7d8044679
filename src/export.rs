// Catalog Export - Compact text rendering of the card pool
// One block per functionally-distinct card, cheapest printing chosen.

use std::collections::HashMap;

use crate::catalog::Printing;
use crate::identity::{non_null, parse_abilities, parse_attacks};
use crate::rarity::RarityConfig;

/// Render the card pool as a compact text catalog for downstream tools.
///
/// Rows are grouped by functional identity (name plus every gameplay field);
/// within a group, the printing with the lowest rarity tier wins, so the
/// export always lists the most available version. Unknown rarities are
/// treated as worst and kept only when nothing better exists. Output is
/// sorted by set code then numeric card number.
pub fn export_catalog(printings: &[Printing], config: &RarityConfig) -> String {
    let mut best: HashMap<GroupKey, (usize, i64)> = HashMap::new();

    for (index, printing) in printings.iter().enumerate() {
        let rank = export_rank(config, printing.rarity.as_deref());
        let key = GroupKey::of(printing);

        match best.get(&key) {
            Some((_, existing)) if *existing <= rank => {}
            _ => {
                best.insert(key, (index, rank));
            }
        }
    }

    let mut selected: Vec<&Printing> = best.values().map(|(i, _)| &printings[*i]).collect();
    selected.sort_by(|a, b| {
        (a.set_code.as_str(), numeric_number(a)).cmp(&(b.set_code.as_str(), numeric_number(b)))
    });

    let mut output = String::new();
    for printing in selected {
        render_card(&mut output, printing);
    }
    output
}

// Lowest rank wins in the export, so unknowns must sort above every known
// tier (the opposite of the preference engine's -1 convention).
fn export_rank(config: &RarityConfig, rarity: Option<&str>) -> i64 {
    match config.rank(rarity) {
        -1 => i64::MAX,
        rank => rank as i64,
    }
}

fn numeric_number(printing: &Printing) -> u32 {
    printing.number.parse().unwrap_or(u32::MAX)
}

#[derive(Hash, PartialEq, Eq)]
struct GroupKey {
    name: String,
    hp: Option<String>,
    types: Option<String>,
    abilities: Option<String>,
    attacks: Option<String>,
    retreat: Option<String>,
    evolve_from: Option<String>,
}

impl GroupKey {
    fn of(p: &Printing) -> GroupKey {
        GroupKey {
            name: p.name.clone(),
            hp: p.hp.clone(),
            types: p.types.clone(),
            abilities: p.abilities.clone(),
            attacks: p.attacks.clone(),
            retreat: p.retreat.clone(),
            evolve_from: p.evolve_from.clone(),
        }
    }
}

fn render_card(out: &mut String, printing: &Printing) {
    out.push_str(&format!(
        "{} {} {}\n",
        printing.name,
        printing.set_code.to_uppercase(),
        printing.number
    ));

    if let Some(hp) = non_null(printing.hp.as_deref()) {
        out.push_str(&format!("HP:{}\n", hp));
    }

    if let Some(types) = render_types(printing.types.as_deref()) {
        out.push_str(&format!("T:{}\n", types));
    }

    if let Some(rules) = non_null(printing.rules.as_deref()) {
        out.push_str(&format!("E:{}\n", rules));
    }

    if let Some(abilities) = parse_abilities(printing.abilities.as_deref()) {
        for effect in abilities.iter().filter_map(|a| a.effect.as_deref()) {
            out.push_str(&format!("AB:{}\n", effect));
        }
    }

    if let Some(attacks) = render_attacks(printing.attacks.as_deref()) {
        out.push_str(&format!("A:{}\n", attacks));
    }

    if let Some(retreat) = non_null(printing.retreat.as_deref()) {
        out.push_str(&format!("R:{}\n", retreat));
    }

    if let Some(evolve_from) = non_null(printing.evolve_from.as_deref()) {
        out.push_str(&format!("EF:{}\n", evolve_from));
    }
}

fn render_types(raw: Option<&str>) -> Option<String> {
    let raw = non_null(raw)?;
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(types) if !types.is_empty() => Some(types.join(",")),
        _ => Some(raw.to_string()),
    }
}

/// Attacks as `C:<cost>,N:<name>[,E:<effect>][,D:<damage>]`, pipe-joined.
/// Cost letters run together ("LLC"-style strings stay readable).
fn render_attacks(raw: Option<&str>) -> Option<String> {
    let attacks = parse_attacks(raw)?;
    if attacks.is_empty() {
        return None;
    }

    let rendered: Vec<String> = attacks
        .iter()
        .map(|attack| {
            let mut parts = vec![
                format!("C:{}", attack.cost.join("")),
                format!("N:{}", attack.name),
            ];
            if let Some(effect) = attack.effect.as_deref().filter(|e| !e.is_empty()) {
                parts.push(format!("E:{}", effect));
            }
            if let Some(damage) = attack.damage_text() {
                parts.push(format!("D:{}", damage));
            }
            parts.join(",")
        })
        .collect();

    Some(rendered.join("|"))
}

// ============================================================================
// TESTS
// ============================================================================
