// Card Catalog - Read-only access to the local printing database
// The catalog is external data; this module never mutates it.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::identity::Fingerprint;

// ============================================================================
// PRINTING
// ============================================================================

/// One published printing of a card: a specific set + number + rarity + art.
///
/// Printings are immutable facts sourced from the catalog database. All
/// gameplay text fields are kept as stored; the attacks and abilities columns
/// hold serialized JSON arrays (see `identity::attack_signature`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Printing {
    pub name: String,
    pub set_code: String,
    pub set_name: String,
    pub number: String,
    pub card_type: String,
    pub hp: Option<String>,
    pub types: Option<String>,
    pub attacks: Option<String>,
    pub abilities: Option<String>,
    pub rules: Option<String>,
    pub retreat: Option<String>,
    pub evolve_from: Option<String>,
    pub rarity: Option<String>,
    pub regulation: Option<String>,
    pub date: Option<String>,
    pub img: Option<String>,
}

impl Printing {
    /// Classify this printing's card type.
    pub fn kind(&self) -> CardKind {
        CardKind::from_card_type(&self.card_type)
    }

    /// Release date parsed from the catalog's date column.
    /// Returns None when the column is absent or not a recognized format.
    pub fn release_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y/%m/%d") {
            return Some(date);
        }

        None
    }

    /// Whether this is the same catalog row as `other` (same set + number).
    pub fn same_printing(&self, other: &Printing) -> bool {
        self.set_code.eq_ignore_ascii_case(&other.set_code)
            && self.number.eq_ignore_ascii_case(&other.number)
    }
}

// ============================================================================
// CARD KIND & DECK SECTION
// ============================================================================

/// Card classification derived from the catalog's free-text card_type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Pokemon,
    Supporter,
    Item,
    Stadium,
    Tool,
    SpecialEnergy,
    Energy,
    Other,
}

impl CardKind {
    pub fn from_card_type(card_type: &str) -> CardKind {
        match card_type.trim().to_lowercase().as_str() {
            "pokemon" | "pokémon" => CardKind::Pokemon,
            "supporter" => CardKind::Supporter,
            "item" => CardKind::Item,
            "stadium" => CardKind::Stadium,
            "pokemon tool" | "pokémon tool" => CardKind::Tool,
            "special energy" => CardKind::SpecialEnergy,
            "energy" => CardKind::Energy,
            _ => CardKind::Other,
        }
    }

    /// Which deck-list section this kind belongs to.
    pub fn section(&self) -> Section {
        match self {
            CardKind::Pokemon => Section::Pokemon,
            CardKind::Energy | CardKind::SpecialEnergy => Section::Energy,
            _ => Section::Trainer,
        }
    }

    pub fn is_energy(&self) -> bool {
        matches!(self, CardKind::Energy | CardKind::SpecialEnergy)
    }
}

/// Deck-list section. The output order is fixed: Pokemon, Trainer, Energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    Pokemon,
    Trainer,
    Energy,
}

impl Section {
    pub const ORDER: [Section; 3] = [Section::Pokemon, Section::Trainer, Section::Energy];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Pokemon => "Pokemon",
            Section::Trainer => "Trainer",
            Section::Energy => "Energy",
        }
    }

    pub fn parse(text: &str) -> Option<Section> {
        match text.trim().to_lowercase().as_str() {
            "pokemon" | "pokémon" => Some(Section::Pokemon),
            "trainer" => Some(Section::Trainer),
            "energy" => Some(Section::Energy),
            _ => None,
        }
    }
}

// ============================================================================
// CATALOG TRAIT
// ============================================================================

/// Read-only repository of printings.
///
/// The resolution engine depends on these queries only; the storage engine
/// behind them is a collaborator. Handles are passed explicitly, never held
/// in process-wide state.
pub trait CardCatalog {
    /// Exact lookup by (set code or set display name) and card number,
    /// case-insensitive. At most one row; duplicate (set, number) pairs in
    /// the catalog are an upstream data-quality issue and which row wins is
    /// implementation-defined.
    fn find_printing(&self, set: &str, number: &str) -> Result<Option<Printing>>;

    /// All printings sharing `base`'s identity fingerprint, ordered by
    /// release recency ascending. Always contains at least `base` itself.
    fn related_printings(&self, base: &Printing) -> Result<Vec<Printing>>;

    /// Every printing in the given regulation marks, ordered by set then
    /// numeric card number. Used by the catalog export.
    fn all_printings(&self, regulations: &[&str]) -> Result<Vec<Printing>>;
}

// ============================================================================
// SQLITE CATALOG
// ============================================================================

const PRINTING_COLUMNS: &str = "name, set_code, set_name, number, card_type, hp, types, \
     attacks, abilities, rules, retreat, evolve_from, rarity, regulation, date, img";

/// Catalog backed by a local SQLite database with a `cards` table.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open the catalog database. Fails fast when the file cannot be opened
    /// or the cards table is missing; no partial resolution is attempted.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open card catalog: {:?}", path.as_ref()))?;

        let catalog = SqliteCatalog { conn };
        catalog.verify()?;
        Ok(catalog)
    }

    /// Wrap an existing connection (in-memory databases in tests).
    pub fn from_connection(conn: Connection) -> Result<Self> {
        let catalog = SqliteCatalog { conn };
        catalog.verify()?;
        Ok(catalog)
    }

    fn verify(&self) -> Result<()> {
        self.conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get::<_, i64>(0))
            .context("Card catalog is unavailable: no readable cards table")?;
        Ok(())
    }

    fn row_to_printing(row: &rusqlite::Row) -> rusqlite::Result<Printing> {
        Ok(Printing {
            name: row.get(0)?,
            set_code: row.get(1)?,
            set_name: row.get(2)?,
            number: row.get(3)?,
            card_type: row.get(4)?,
            hp: row.get(5)?,
            types: row.get(6)?,
            attacks: row.get(7)?,
            abilities: row.get(8)?,
            rules: row.get(9)?,
            retreat: row.get(10)?,
            evolve_from: row.get(11)?,
            rarity: row.get(12)?,
            regulation: row.get(13)?,
            date: row.get(14)?,
            img: row.get(15)?,
        })
    }

    fn printings_by_name(&self, name: &str, prefix: bool) -> Result<Vec<Printing>> {
        let sql = if prefix {
            format!(
                "SELECT {} FROM cards WHERE lower(name) LIKE lower(?1) || '%'",
                PRINTING_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM cards WHERE lower(name) = lower(?1)",
                PRINTING_COLUMNS
            )
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![name], Self::row_to_printing)
            .context("Failed to query related printings")?;

        let mut printings = Vec::new();
        for row in rows {
            printings.push(row?);
        }
        Ok(printings)
    }
}

impl CardCatalog for SqliteCatalog {
    fn find_printing(&self, set: &str, number: &str) -> Result<Option<Printing>> {
        let sql = format!(
            "SELECT {} FROM cards
             WHERE (lower(set_code) = lower(?1) OR lower(set_name) = lower(?1))
               AND lower(number) = lower(?2)
             LIMIT 1",
            PRINTING_COLUMNS
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt
            .query_map(params![set, number], Self::row_to_printing)
            .context("Failed to query printing by set and number")?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn related_printings(&self, base: &Printing) -> Result<Vec<Printing>> {
        let fingerprint = Fingerprint::of(base);
        let (search_name, prefix) = fingerprint.search_name();

        let mut printings = self.printings_by_name(search_name, prefix)?;
        printings.retain(|p| fingerprint.matches(p));

        // The base row always belongs to its own candidate set, even when
        // its fields are too sparse to match the fingerprint query.
        if !printings.iter().any(|p| p.same_printing(base)) {
            printings.push(base.clone());
        }

        printings.sort_by(crate::preference::recency_cmp);
        Ok(printings)
    }

    fn all_printings(&self, regulations: &[&str]) -> Result<Vec<Printing>> {
        let placeholders = regulations
            .iter()
            .enumerate()
            .map(|(i, _)| format!("?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "SELECT {} FROM cards
             WHERE lower(regulation) IN ({})
             ORDER BY set_code, CAST(number AS INTEGER)",
            PRINTING_COLUMNS, placeholders
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let lowered: Vec<String> = regulations.iter().map(|r| r.to_lowercase()).collect();
        let rows = stmt
            .query_map(rusqlite::params_from_iter(lowered.iter()), Self::row_to_printing)
            .context("Failed to query printings by regulation")?;

        let mut printings = Vec::new();
        for row in rows {
            printings.push(row?);
        }
        Ok(printings)
    }
}

/// Create the cards table used by the catalog. The real database is built by
/// an external ingestion step; this schema exists for tests and tooling.
pub fn catalog_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            card_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            set_code TEXT NOT NULL,
            set_name TEXT NOT NULL,
            number TEXT NOT NULL,
            card_type TEXT NOT NULL,
            hp TEXT,
            types TEXT,
            attacks TEXT,
            abilities TEXT,
            rules TEXT,
            retreat TEXT,
            evolve_from TEXT,
            rarity TEXT,
            regulation TEXT,
            date TEXT,
            img TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_cards_set ON cards(set_code, number)",
        [],
    )?;

    conn.execute("CREATE INDEX IF NOT EXISTS idx_cards_name ON cards(name)", [])?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
