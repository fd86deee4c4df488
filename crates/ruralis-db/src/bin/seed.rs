//! # Seed Data Generator
//!
//! Populates the database with a starter agrochemical inventory for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p ruralis-db --bin seed
//!
//! # Specify database path
//! cargo run -p ruralis-db --bin seed -- --db ./data/ruralis.db
//! ```
//!
//! Products already present (matched by name) are left untouched, so the
//! seed can be re-run safely.

use anyhow::Context;
use ruralis_core::validation::validate_new_agrochemical;
use ruralis_core::{Currency, NewAgrochemical};
use ruralis_db::{Database, DbConfig};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (name, quantity, unit, unit_price, currency)
const INVENTORY: &[(&str, f64, &str, f64, Currency)] = &[
    ("Glifosato", 100.0, "L", 50.0, Currency::Ars),
    ("Atrazina", 60.0, "kg", 4.2, Currency::Usd),
    ("2,4-D", 40.0, "L", 38.5, Currency::Ars),
    ("Cipermetrina", 25.0, "L", 9.8, Currency::Usd),
    ("Clorpirifos", 30.0, "L", 72.0, Currency::Ars),
    ("Urea", 500.0, "kg", 0.6, Currency::Usd),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./ruralis_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Ruralis Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ruralis_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(database = %db_path, "Seeding Ruralis inventory");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening database at {db_path}"))?;

    let mut inserted = 0;
    let mut skipped = 0;

    for (name, quantity, unit, unit_price, currency) in INVENTORY {
        if db.agrochemicals().find_by_name(name).await?.is_some() {
            skipped += 1;
            continue;
        }

        let agro = NewAgrochemical {
            name: name.to_string(),
            quantity: *quantity,
            unit: unit.to_string(),
            unit_price: *unit_price,
            currency: *currency,
        };
        validate_new_agrochemical(&agro).with_context(|| format!("seed entry {name}"))?;

        let stored = db.agrochemicals().insert(&agro).await?;
        info!(id = %stored.id, name = %stored.name, "Inserted agrochemical");
        inserted += 1;
    }

    let total = db.agrochemicals().count().await?;
    info!(inserted, skipped, total, "Seed complete");

    db.close().await;
    Ok(())
}
