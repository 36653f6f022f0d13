//! Stocklink CLI - Manual sync runs and catalog inspection.
//!
//! # Usage
//!
//! ```bash
//! # Summarize the Lightspeed catalog
//! stocklink catalog
//!
//! # Reconcile all active items
//! stocklink sync
//!
//! # Reconcile a specific SKU list
//! stocklink sync --skus "A-1,B-2,C-3"
//! ```
//!
//! # Commands
//!
//! - `catalog` - Fetch and summarize the source catalog
//! - `sync` - Run a bulk or targeted reconciliation

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stocklink")]
#[command(author, version, about = "Stocklink CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and summarize the Lightspeed catalog
    Catalog,
    /// Run a reconciliation (bulk by default, targeted with --skus)
    Sync {
        /// Comma-separated SKU list; syncs everything when omitted
        #[arg(short, long)]
        skus: Option<String>,
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
    match cli.command {
        Commands::Catalog => commands::catalog::summarize().await?,
        Commands::Sync { skus } => match skus {
            Some(skus) => commands::sync::targeted(&skus).await?,
            None => commands::sync::bulk().await?,
        },
    }
    Ok(())
}
