//! # Seed Data Generator
//!
//! Populates a database with a demo catalog and sale history for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./flash_dev.db with the demo catalog and 40 sales
//! cargo run -p flash-db --bin seed
//!
//! # Custom database and sale count
//! cargo run -p flash-db --bin seed -- --db ./data/flash.db --sales 200
//! ```
//!
//! ## Generated Data
//! - One product per catalog entry below, SKU `{CATEGORY}-{NNN}`
//! - A few products start below their minimum level so the low-stock view
//!   has something to show
//! - Sales spread over the last 14 days, applied through the same atomic
//!   transaction the API uses (so stock ends up consistent)

use chrono::{Duration, Utc};
use std::env;
use uuid::Uuid;

use flash_core::{Money, NewProduct, Product, Sale};
use flash_db::{Database, DbConfig, LedgerStore, SaleOutcome};

/// (category code, category name, [(product name, price in cents)])
const CATALOG: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "ELE",
        "Electronics",
        &[
            ("USB-C Cable 1m", 899),
            ("USB-C Cable 2m", 1199),
            ("Wireless Mouse", 2499),
            ("Mechanical Keyboard", 7999),
            ("HDMI Adapter", 1599),
            ("Power Bank 10000mAh", 2999),
        ],
    ),
    (
        "OFF",
        "Office",
        &[
            ("A4 Paper Ream", 649),
            ("Ballpoint Pens (10)", 399),
            ("Sticky Notes", 299),
            ("Stapler", 1249),
            ("Desk Organizer", 1899),
        ],
    ),
    (
        "KIT",
        "Kitchen",
        &[
            ("Coffee Mug", 999),
            ("French Press", 2799),
            ("Chef Knife", 4599),
            ("Cutting Board", 1499),
        ],
    ),
    (
        "GEN",
        "General",
        &[
            ("Widget", 999),
            ("Gadget", 1999),
            ("Gizmo", 499),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut sales: usize = 40;
    let mut db_path = String::from("./flash_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(40);
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
                println!("Flash Inventory Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Number of sales to record (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./flash_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Flash Inventory Seed Data Generator");
    println!("======================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut products = Vec::new();
    for (code, category, items) in CATALOG {
        for (name, price_cents) in items.iter() {
            let product = demo_product(code, category, name, *price_cents, products.len());
            if let Err(e) = db.insert_product(&product).await {
                eprintln!("Failed to insert {}: {}", product.sku, e);
                continue;
            }
            products.push(product);
        }
    }
    println!("✓ Generated {} products", products.len());

    println!();
    println!("Recording sales...");

    let now = Utc::now();
    let mut applied = 0;
    let mut rejected = 0;
    for n in 0..sales {
        let Some(product) = products.get((n * 7) % products.len().max(1)) else {
            break;
        };
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            quantity_sold: 1 + (n % 3) as i64,
            sale_price_cents: product.price_cents,
            sale_date: now - Duration::hours((n as i64 * 37) % (14 * 24)),
        };

        match db.apply_sale(&sale).await? {
            SaleOutcome::Applied(_) => applied += 1,
            SaleOutcome::InsufficientStock { .. } | SaleOutcome::ProductMissing => rejected += 1,
        }
    }
    println!("✓ Recorded {} sales ({} rejected for stock)", applied, rejected);

    let low = db.low_stock_products().await?;
    println!("  Low stock products: {}", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one catalog product. Every fifth product starts below its minimum.
fn demo_product(code: &str, category: &str, name: &str, price_cents: i64, seed: usize) -> Product {
    let stock = if seed % 5 == 0 { 3 } else { 20 + (seed * 13 % 60) as i64 };

    Product::new(
        NewProduct::new(
            name,
            format!("{}-{:03}", code, seed + 1),
            Money::from_cents(price_cents),
            stock,
        )
        .category(category),
        Utc::now(),
    )
}
