//! # Seed Data Generator
//!
//! Populates the database with development stock and a starting rate sheet.
//!
//! ## Usage
//! ```bash
//! # Generate 300 pieces (default)
//! cargo run -p karat-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p karat-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p karat-db --bin seed -- --db ./data/karat.db
//! ```
//!
//! ## Generated Data
//! - Unique jewelry pieces across rings, chains, bracelets, earrings, coins
//! - Barcode per piece: `KP-{INDEX:06}`
//! - Weight, making charge and indicative price derived deterministically
//!   from the index, so reruns against a fresh file are reproducible
//! - A buy/sell rate row for every karat

use chrono::Utc;
use std::env;
use uuid::Uuid;

use karat_core::{
    GoldRate, JewelryType, Karat, Money, Product, ProductStatus, Weight,
};
use karat_db::{Database, DbConfig};

/// Model names per jewelry type for realistic test data
const MODELS: &[(JewelryType, &[&str])] = &[
    (
        JewelryType::Ring,
        &["Twist Ring", "Solitaire Band", "Rope Ring", "Signet Ring", "Halo Ring"],
    ),
    (
        JewelryType::Chain,
        &["Figaro Chain", "Cuban Link", "Box Chain", "Rope Chain", "Snake Chain"],
    ),
    (
        JewelryType::Bracelet,
        &["Bangle Classic", "Charm Bracelet", "Tennis Bracelet", "Cuff Bangle"],
    ),
    (
        JewelryType::Earring,
        &["Hoop Earrings", "Stud Earrings", "Drop Earrings", "Huggie Earrings"],
    ),
    (
        JewelryType::Coin,
        &["Pound Coin", "Half Pound Coin", "Quarter Pound Coin", "Ounce Bar"],
    ),
];

/// Starting rate sheet in minor units per gram: (karat, buy, sell)
const RATES: &[(Karat, i64, i64)] = &[
    (Karat::K18, 257_000, 264_000),
    (Karat::K21, 300_000, 308_000),
    (Karat::K24, 343_000, 352_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 300;
    let mut db_path = String::from("./karat_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(300);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Karat POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of pieces to generate (default: 300)");
                println!("  -d, --db <PATH>    Database file path (default: ./karat_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Karat POS Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Pieces:   {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Rates are upserted unconditionally; the morning sheet replaces itself.
    for (karat, buy, sell) in RATES {
        db.rates()
            .upsert(&GoldRate {
                karat: *karat,
                buy_rate: Money::from_minor(*buy),
                sell_rate: Money::from_minor(*sell),
                updated_at: Utc::now(),
            })
            .await?;
    }
    println!("✓ Rate sheet published for {} karats", RATES.len());

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicate barcodes.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating pieces...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: loop {
        for (jewelry_type, names) in MODELS {
            for name in *names {
                if generated >= count {
                    break 'outer;
                }

                let product = generate_product(*jewelry_type, name, generated);
                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.barcode, e);
                    continue;
                }

                generated += 1;
                if generated % 100 == 0 {
                    println!("  Generated {} pieces...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} pieces in {:?}", generated, elapsed);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single piece with deterministic pseudo-random attributes.
fn generate_product(jewelry_type: JewelryType, name: &str, seed: usize) -> Product {
    let now = Utc::now();

    let karat = Karat::ALL[seed % Karat::ALL.len()];

    // 2g to 25g in uneven steps
    let gross_weight = Weight::from_milligrams(2_000 + ((seed * 733) % 23_000) as i64);

    // Making charge scales loosely with weight
    let making_charge = Money::from_minor(20_000 + ((seed * 97) % 60_000) as i64);

    // Indicative price from the seed sell rate plus the making charge
    let sell_rate = RATES
        .iter()
        .find(|(k, _, _)| *k == karat)
        .map(|(_, _, sell)| Money::from_minor(*sell))
        .unwrap_or_else(Money::zero);
    let estimated_price = gross_weight.value_at(sell_rate) + making_charge;

    // Cost around 90% of the indicative price
    let cost_price = Money::from_minor(estimated_price.minor() * 9 / 10);

    Product {
        id: Uuid::new_v4().to_string(),
        barcode: format!("KP-{:06}", seed),
        model_name: name.to_string(),
        karat,
        jewelry_type,
        gross_weight,
        making_charge,
        estimated_price,
        cost_price,
        status: ProductStatus::Available,
        description: None,
        created_at: now,
        updated_at: now,
    }
}
