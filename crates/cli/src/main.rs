//! Storemind CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run agent database migrations
//! sm-cli migrate
//!
//! # Run one audit retention pass with the configured window
//! sm-cli cleanup
//!
//! # Run one audit retention pass with an explicit window
//! sm-cli cleanup --days 30
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `cleanup` - Delete audit records older than the retention window

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sm-cli")]
#[command(author, version, about = "Storemind CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Delete audit records older than the retention window
    Cleanup {
        /// Retention window in days (defaults to STOREMIND_AUDIT_RETENTION_DAYS)
        #[arg(short, long)]
        days: Option<u32>,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Cleanup { days } => commands::cleanup::run(days).await?,
    }
    Ok(())
}
