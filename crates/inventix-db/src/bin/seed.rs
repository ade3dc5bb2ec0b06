//! # Seed Data Generator
//!
//! Populates the database with demo clients and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p inventix-db --bin seed
//!
//! # Generate a bigger catalog
//! cargo run -p inventix-db --bin seed -- --products 200
//!
//! # Specify database path
//! cargo run -p inventix-db --bin seed -- --db ./data/inventix.db
//! ```
//!
//! ## Generated Data
//! - Clients with unique 10-digit identifications
//! - Products across a few hardware-store families, each in several
//!   presentations, with deterministic prices and stock

use std::env;

use inventix_core::{Money, NewClient, NewProduct};
use inventix_db::{Database, DbConfig};

const FIRST_NAMES: &[&str] = &[
    "Ana", "Luis", "María", "Carlos", "Sofía", "Jorge", "Valeria", "Diego", "Lucía", "Andrés",
];

const LAST_NAMES: &[&str] = &[
    "Pérez", "Gómez", "Rodríguez", "Torres", "Vera", "Castillo", "Morales", "Ortiz",
];

/// Product families: (supplier, base price in cents, names)
const FAMILIES: &[(&str, i64, &[&str])] = &[
    (
        "Ferretería Central",
        150,
        &["Tornillo", "Clavo", "Tuerca", "Arandela", "Taco Fisher"],
    ),
    (
        "Pinturas del Sur",
        850,
        &["Pintura Látex", "Esmalte", "Thinner", "Brocha", "Rodillo"],
    ),
    (
        "Eléctricos Norte",
        420,
        &["Cable #12", "Interruptor", "Tomacorriente", "Foco LED", "Cinta Aislante"],
    ),
];

/// Presentations: (label, price multiplier)
const PRESENTATIONS: &[(&str, i64)] = &[("Unidad", 1), ("Caja x10", 9), ("Caja x50", 40)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut clients: usize = 10;
    let mut products: usize = 45;
    let mut db_path = String::from("./inventix_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--clients" => {
                if i + 1 < args.len() {
                    clients = args[i + 1].parse().unwrap_or(clients);
                    i += 1;
                }
            }
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    products = args[i + 1].parse().unwrap_or(products);
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
                println!("Inventix Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("      --clients <N>   Number of clients to create (default: 10)");
                println!("  -p, --products <N>  Number of products to create (default: 45)");
                println!("  -d, --db <PATH>     Database file path (default: ./inventix_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Inventix Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Clients:  {}", clients);
    println!("Products: {}", products);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.clients().count().await? + db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} clients/products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    let mut created_clients = 0;
    for seed in 0..clients {
        let client = generate_client(seed);
        match db.clients().insert(&client).await {
            Ok(_) => created_clients += 1,
            Err(e) => eprintln!("Failed to insert client {}: {}", client.identification, e),
        }
    }

    let mut created_products = 0;
    'families: for (family_idx, (supplier, base_price, names)) in FAMILIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (presentation, multiplier) in PRESENTATIONS {
                if created_products >= products {
                    break 'families;
                }

                let seed = family_idx * 100 + name_idx * 10 + created_products;
                let product = generate_product(name, presentation, supplier, *base_price, *multiplier, seed);

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }
                created_products += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Created {} clients and {} products in {:?}",
        created_clients, created_products, elapsed
    );

    let stats = db.dashboard().stats().await?;
    println!(
        "  Dashboard: {} clients, {} products, {} sales",
        stats.total_clients, stats.total_products, stats.total_sales
    );

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn generate_client(seed: usize) -> NewClient {
    let first = FIRST_NAMES[seed % FIRST_NAMES.len()];
    let last = LAST_NAMES[(seed / FIRST_NAMES.len() + seed) % LAST_NAMES.len()];

    NewClient {
        name: format!("{} {}", first, last),
        identification: format!("{:010}", 1_700_000_000 + seed * 7919),
        phone: format!("09{:08}", (seed * 104_729) % 100_000_000),
        email: format!("cliente{}@example.com", seed + 1),
        address: format!("Calle {} #{}", last, seed + 1),
    }
}

fn generate_product(
    name: &str,
    presentation: &str,
    supplier: &str,
    base_price: i64,
    multiplier: i64,
    seed: usize,
) -> NewProduct {
    // Base price plus up to $0.99 of deterministic jitter
    let unit_cents = base_price + ((seed * 37) % 100) as i64;

    NewProduct {
        name: format!("{} ({})", name, presentation),
        description: Some(format!("{} presentación {}", name, presentation.to_lowercase())),
        price: Money::from_cents(unit_cents * multiplier),
        stock: (seed % 120) as i64,
        supplier: Some(supplier.to_string()),
    }
}
