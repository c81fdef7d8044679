use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Read;
use std::path::Path;

use deckfix::{export_catalog, resolve_deck, CardCatalog, RarityConfig, SqliteCatalog};

const DEFAULT_DB: &str = "pokemon_cards.db";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("export") => run_export(args.get(2).map(String::as_str)),
        Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        deck_file => run_resolve(deck_file),
    }
}

fn print_usage() {
    println!("Usage: deckfix [DECK_FILE]        resolve a deck list (stdin when omitted)");
    println!("       deckfix export [OUT_FILE]  export the card pool as compact text");
    println!();
    println!("Environment:");
    println!("  DECKFIX_DB      catalog database path (default: {})", DEFAULT_DB);
    println!("  DECKFIX_RARITY  JSON rarity policy file (default: built-in)");
}

fn open_catalog() -> Result<SqliteCatalog> {
    let db_path = env::var("DECKFIX_DB").unwrap_or_else(|_| DEFAULT_DB.to_string());
    SqliteCatalog::open(Path::new(&db_path))
}

fn load_config() -> Result<RarityConfig> {
    match env::var("DECKFIX_RARITY") {
        Ok(path) => RarityConfig::from_file(&path),
        Err(_) => Ok(RarityConfig::default()),
    }
}

fn run_resolve(deck_file: Option<&str>) -> Result<()> {
    let text = match deck_file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read deck list: {}", path))?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read deck list from stdin")?;
            buffer
        }
    };

    let catalog = open_catalog()?;
    let config = load_config()?;

    let report = resolve_deck(&text, &catalog, &config, None)?;

    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }

    println!("{}", report.text);
    Ok(())
}

fn run_export(out_file: Option<&str>) -> Result<()> {
    let catalog = open_catalog()?;
    let config = load_config()?;

    // Current regulation marks; older cards are not deck-legal.
    let printings = catalog.all_printings(&["g", "h", "i"])?;
    let text = export_catalog(&printings, &config);

    let out_path = out_file.unwrap_or("cards.txt");
    fs::write(out_path, &text).with_context(|| format!("Failed to write {}", out_path))?;

    println!("✓ Exported card pool to {} ({} lines)", out_path, text.lines().count());
    Ok(())
}
