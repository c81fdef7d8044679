// Shared test fixtures: printing builders and a seeded in-memory catalog.

use rusqlite::{params, Connection};

use crate::catalog::{catalog_schema, Printing, SqliteCatalog};

/// A Pokemon printing with one attack and sensible defaults.
pub fn pokemon(name: &str, set: &str, number: &str, rarity: &str, date: &str) -> Printing {
    Printing {
        name: name.to_string(),
        set_code: set.to_string(),
        set_name: set.to_string(),
        number: number.to_string(),
        card_type: "Pokemon".to_string(),
        hp: Some("120".to_string()),
        types: Some(r#"["Lightning"]"#.to_string()),
        attacks: Some(r#"[{"cost": ["Lightning"], "name": "Peak Acceleration"}]"#.to_string()),
        rarity: Some(rarity.to_string()),
        regulation: Some("h".to_string()),
        date: Some(date.to_string()),
        ..Printing::default()
    }
}

/// A trainer-side printing (supporter, item, stadium, tool, energy) with
/// generic rules text.
pub fn trainer(
    name: &str,
    card_type: &str,
    set: &str,
    number: &str,
    rarity: &str,
    date: &str,
) -> Printing {
    Printing {
        name: name.to_string(),
        set_code: set.to_string(),
        set_name: set.to_string(),
        number: number.to_string(),
        card_type: card_type.to_string(),
        rules: Some(format!("Effect text of {}.", name)),
        rarity: Some(rarity.to_string()),
        regulation: Some("h".to_string()),
        date: Some(date.to_string()),
        ..Printing::default()
    }
}

pub fn insert_printing(conn: &Connection, p: &Printing) {
    conn.execute(
        "INSERT INTO cards (
            name, set_code, set_name, number, card_type, hp, types, attacks,
            abilities, rules, retreat, evolve_from, rarity, regulation, date, img
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            p.name,
            p.set_code,
            p.set_name,
            p.number,
            p.card_type,
            p.hp,
            p.types,
            p.attacks,
            p.abilities,
            p.rules,
            p.retreat,
            p.evolve_from,
            p.rarity,
            p.regulation,
            p.date,
            p.img,
        ],
    )
    .expect("insert test printing");
}

/// In-memory catalog seeded with the given printings.
pub fn test_catalog(printings: &[Printing]) -> SqliteCatalog {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    catalog_schema(&conn).expect("create cards table");

    for printing in printings {
        insert_printing(&conn, printing);
    }

    SqliteCatalog::from_connection(conn).expect("wrap test catalog")
}
