//! IzeShop CLI - catalog database management.
//!
//! # Usage
//!
//! ```bash
//! # Create the catalog schema
//! izeshop-cli migrate
//!
//! # Insert the default catalog (skip if products exist)
//! izeshop-cli seed --if-empty
//!
//! # List the catalog, optionally filtered
//! izeshop-cli products --query laptop
//! ```
//!
//! The database is selected with the same variables as the server
//! (`DATABASE_URL`, `STOREFRONT_SQLITE_PATH`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "izeshop-cli")]
#[command(author, version, about = "IzeShop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog schema
    Migrate,
    /// Insert the default catalog
    Seed {
        /// Only seed when the catalog has no products
        #[arg(long)]
        if_empty: bool,
    },
    /// List catalog products, newest first
    Products {
        /// Case-insensitive filter on name or category
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db = commands::connect().await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&db).await?,
        Commands::Seed { if_empty } => commands::seed::run(&db, if_empty).await?,
        Commands::Products { query } => commands::products::list(&db, query.as_deref()).await?,
    }
    Ok(())
}
