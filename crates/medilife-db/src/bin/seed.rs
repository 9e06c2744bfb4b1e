//! # Seed Data Generator
//!
//! Populates the database with sample quotes for development.
//!
//! ## Usage
//! ```bash
//! # 20 quotes (default) into ./medilife_dev.db
//! cargo run -p medilife-db --bin seed
//!
//! # Custom amount, issuer and database
//! cargo run -p medilife-db --bin seed -- --count 200 --issuer emp-2 --db ./data/quotes.db
//!
//! # Print the last quote as printable JSON
//! cargo run -p medilife-db --bin seed -- --json
//! ```
//!
//! ## Generated Quotes
//! Each quote gets 1-6 rows drawn from an orthopedic supplies catalog, a
//! rotating patient and physician, and the configured payment note.

use clap::Parser;
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use medilife_core::{Counterparties, LineItemDraft, QuoteDraft};
use medilife_db::{AppConfig, Database};

/// Sample catalog: (detail, unit price in centavos)
const CATALOG: &[(&str, i64)] = &[
    ("Placa de bloqueo para radio distal", 185_000_00),
    ("Tornillo cortical 3,5 mm", 12_500_00),
    ("Tornillo esponjoso 4,0 mm", 13_200_00),
    ("Clavo endomedular de fémur", 420_000_00),
    ("Prótesis total de cadera no cementada", 2_350_000_00),
    ("Prótesis total de rodilla", 2_100_000_00),
    ("Arandela de titanio", 2_800_00),
    ("Sustituto óseo sintético 5 cc", 96_000_00),
    ("Ancla de sutura 5,0 mm", 78_500_00),
    ("Tutor externo tubular", 310_000_00),
];

const PATIENTS: &[&str] = &["pac-001", "pac-002", "pac-003", "pac-004"];
const PHYSICIANS: &[&str] = &["med-010", "med-011", "med-012"];

/// Medilife quote seeder
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(version, about, long_about = None)]
struct Args {
    /// Database file path
    #[arg(short, long, env = "MEDILIFE_DB_PATH", default_value = "./medilife_dev.db")]
    db: String,

    /// Number of quotes to generate
    #[arg(short, long, default_value_t = 20)]
    count: usize,

    /// Issuing party for every generated quote
    #[arg(short, long, default_value = "emp-1")]
    issuer: String,

    /// Print the last generated quote as printable JSON
    #[arg(long)]
    json: bool,
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,medilife=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn sample_draft(issuer: &str, index: usize) -> QuoteDraft {
    let rows = 1 + index % 6;
    let items = (0..rows)
        .map(|row| {
            let (detail, cents) = CATALOG[(index * 7 + row * 3) % CATALOG.len()];
            LineItemDraft {
                detail: Some(detail.to_string()),
                quantity: 1 + ((index + row) % 4) as i64,
                unit_price: Decimal::new(cents, 2),
                ..LineItemDraft::default()
            }
        })
        .collect();

    QuoteDraft {
        issuer_id: Some(issuer.to_string()),
        counterparties: Counterparties {
            patient_id: Some(PATIENTS[index % PATIENTS.len()].to_string()),
            physician_id: Some(PHYSICIANS[index % PHYSICIANS.len()].to_string()),
            ..Counterparties::default()
        },
        items,
        ..QuoteDraft::default()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();
    let mut config = AppConfig::from_env()?;
    config.database_path = args.db.clone().into();

    println!("Medilife Quote Seeder");
    println!("=====================");
    println!("Database: {}", args.db);
    println!("Quotes:   {}", args.count);
    println!();

    let db = Database::new(config.db_config()).await?;
    let quotes = db.quote_service(config.user.clone(), config.quotes.clone());

    let existing = db.quotes().count().await?;
    if existing > 0 {
        info!(existing, "Database already has quotes, numbering continues");
    }

    let start = std::time::Instant::now();
    let mut last_id = None;
    let mut generated = 0;

    for index in 0..args.count {
        match quotes.create(sample_draft(&args.issuer, index)).await {
            Ok(quote) => {
                generated += 1;
                last_id = Some(quote.id);
            }
            Err(e) => warn!(index, error = %e, "Failed to create sample quote"),
        }
    }

    println!("✓ Generated {} quotes in {:?}", generated, start.elapsed());

    for summary in quotes.list().await?.iter().take(5) {
        println!(
            "  N° {:>5}  {}  {:>3} items  {}",
            summary.number, summary.date, summary.item_count, summary.total
        );
    }

    if let Some(id) = last_id {
        let printable = quotes.render_for_print(&id).await?;
        if args.json {
            println!("{}", printable.to_json()?);
        } else {
            println!();
            println!("SON PESOS: {}", printable.total_words);
        }
    }

    db.close().await;
    Ok(())
}
