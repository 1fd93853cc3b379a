//! # Seed Data Generator
//!
//! Populates the database with catalog data for development.
//!
//! ## Usage
//! ```bash
//! # Seed the full catalog
//! cargo run -p boutique-store --bin seed
//!
//! # Specify database path
//! cargo run -p boutique-store --bin seed -- --db ./data/boutique.db
//!
//! # Cap the number of products
//! cargo run -p boutique-store --bin seed -- --count 20
//! ```
//!
//! ## Generated Catalog
//! Creates a realistic boutique catalog across categories:
//! - Robes (dresses)
//! - Chemises (shirts)
//! - Pantalons (trousers)
//! - Chaussures (shoes)
//! - Accessoires (bags, jewelry)
//!
//! Each product has:
//! - Deterministic slug: `robe-pagne-1`
//! - FCFA price in whole francs
//! - Size run S-XL and two or three colorways
//! - Stock between 3 and 30

use boutique_core::{Category, Money, Product};
use boutique_store::{Database, DbConfig};
use chrono::Utc;
use std::env;
use uuid::Uuid;

/// Category catalog with (name, slug) and their product lines as
/// (name, price in francs, colors).
const CATALOG: &[(&str, &str, &[(&str, i64, &[&str])])] = &[
    (
        "Robes",
        "robes",
        &[
            ("Robe Pagne", 25_000, &["Jaune", "Rouge"]),
            ("Robe Wax Longue", 35_000, &["Bleu", "Vert"]),
            ("Robe de Soirée", 55_000, &["Noir", "Bordeaux"]),
            ("Robe Bazin", 45_000, &["Blanc", "Bleu"]),
            ("Robe Courte Imprimée", 18_000, &["Rouge", "Orange"]),
        ],
    ),
    (
        "Chemises",
        "chemises",
        &[
            ("Chemise Wax", 15_000, &["Noir", "Blanc"]),
            ("Chemise Lin", 20_000, &["Blanc", "Beige"]),
            ("Chemise Brodée", 28_000, &["Blanc", "Bleu Ciel"]),
            ("Polo Coton", 12_000, &["Noir", "Gris", "Marine"]),
            ("Chemise Manches Courtes", 14_000, &["Kaki", "Blanc"]),
        ],
    ),
    (
        "Pantalons",
        "pantalons",
        &[
            ("Pantalon Chino", 22_000, &["Beige", "Marine"]),
            ("Jean Slim", 30_000, &["Bleu", "Noir"]),
            ("Pantalon Bazin", 26_000, &["Blanc", "Bleu"]),
            ("Pantalon Cargo", 24_000, &["Kaki", "Noir"]),
        ],
    ),
    (
        "Chaussures",
        "chaussures",
        &[
            ("Sandales Cuir", 18_000, &["Marron", "Noir"]),
            ("Baskets Ville", 40_000, &["Blanc", "Noir"]),
            ("Mocassins", 35_000, &["Marron", "Bordeaux"]),
            ("Escarpins", 32_000, &["Noir", "Rouge"]),
        ],
    ),
    (
        "Accessoires",
        "accessoires",
        &[
            ("Sac Cuir", 30_000, &["Marron", "Noir"]),
            ("Foulard Soie", 8_000, &["Jaune", "Vert", "Rouge"]),
            ("Ceinture Cuir", 10_000, &["Marron", "Noir"]),
            ("Collier Perles", 12_000, &["Doré", "Argenté"]),
        ],
    ),
];

/// Standard size run for clothing; shoes and accessories reuse it to keep
/// the cart line key uniform.
const SIZES: &[&str] = &["S", "M", "L", "XL"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug surfaces the store's query logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = usize::MAX;
    let mut db_path = String::from("./boutique_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(usize::MAX);
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
                println!("Boutique Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Maximum number of products (default: all)");
                println!("  -d, --db <PATH>    Database file path (default: ./boutique_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Boutique Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.catalog().count_products().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating catalog...");

    let mut generated = 0usize;
    let start = std::time::Instant::now();

    'outer: for (category_name, category_slug, lines) in CATALOG {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: category_name.to_string(),
            slug: category_slug.to_string(),
            description: None,
            image_url: Some(format!("/images/categories/{category_slug}.jpg")),
            created_at: Utc::now(),
        };
        db.catalog().insert_category(&category).await?;

        for (idx, (name, price, colors)) in lines.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let product = generate_product(&category.id, category_slug, name, *price, colors, idx);
            if let Err(e) = db.catalog().insert_product(&product).await {
                eprintln!("Failed to insert {}: {}", product.slug, e);
                continue;
            }

            generated += 1;
        }

        println!("  {} seeded", category_name);
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Verify reads
    let categories = db.catalog().list_categories().await?;
    let products = db.catalog().list_products(None).await?;
    println!("  Categories: {}", categories.len());
    println!("  Products: {}", products.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a single catalog product.
fn generate_product(
    category_id: &str,
    category_slug: &str,
    name: &str,
    price: i64,
    colors: &[&str],
    idx: usize,
) -> Product {
    let slug = format!("{}-{}", name.to_lowercase().replace(' ', "-"), idx + 1);
    // Deterministic stock spread so refreshes stay stable across reseeds.
    let stock = 3 + ((idx * 7) % 28) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        slug: slug.clone(),
        description: Some(format!("{name} de la collection {category_slug}.")),
        price: Money::from_francs(price),
        category_id: Some(category_id.to_string()),
        image_url: Some(format!("/images/products/{slug}.jpg")),
        gallery: vec![
            format!("/images/products/{slug}-1.jpg"),
            format!("/images/products/{slug}-2.jpg"),
        ],
        sizes: SIZES.iter().map(|s| s.to_string()).collect(),
        colors: colors.iter().map(|c| c.to_string()).collect(),
        stock,
        featured: idx == 0,
        created_at: Utc::now(),
    }
}
