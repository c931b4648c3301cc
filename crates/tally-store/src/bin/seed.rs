//! # Seed Data Writer
//!
//! Writes the default catalog (with Latte addons), staff roster and settings
//! into a database, for development and demos.
//!
//! ## Usage
//! ```bash
//! # Seed ./tally.db
//! cargo run -p tally-store --bin seed
//!
//! # Specify database path and wipe existing data first
//! cargo run -p tally-store --bin seed -- --db ./data/tally.db --reset
//! ```

use std::env;
use std::process::ExitCode;

use tally_store::{seed, Store, StoreConfig};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tally.db");
    let mut reset = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--reset" => reset = true,
            "--help" | "-h" => {
                println!("Usage: seed [--db <path>] [--reset]");
                println!();
                println!("Options:");
                println!("  --db     Database path (default: ./tally.db)");
                println!("  --reset  Clear every record before seeding");
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    println!("🌱 Tally POS Seed Data Writer");
    println!("   Database: {}", db_path);

    let store = match Store::new(StoreConfig::new(&db_path)).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Failed to open database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if reset && !store.clear_all_data().await.is_persisted() {
        eprintln!("❌ Failed to clear existing data");
        return ExitCode::FAILURE;
    }

    if !seed::write_defaults(&store).await.is_persisted() {
        eprintln!("❌ Some documents were not written (see log)");
        return ExitCode::FAILURE;
    }

    println!(
        "✅ Wrote {} products, {} staff and default settings",
        seed::products().len(),
        seed::staff().len()
    );

    store.close().await;
    ExitCode::SUCCESS
}
