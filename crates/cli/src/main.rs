//! Storehouse CLI - Database migrations and seed data.
//!
//! # Usage
//!
//! ```bash
//! # Apply the catalog schema
//! storehouse-cli migrate
//!
//! # Insert the sample catalog
//! storehouse-cli seed
//!
//! # Empty every catalog table first, then seed
//! storehouse-cli seed --reset
//! ```
//!
//! Both commands read `STOREHOUSE_DATABASE_URL` (or `DATABASE_URL`), from a
//! `.env` file if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "storehouse-cli")]
#[command(author, version, about = "Storehouse CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with a sample catalog
    Seed {
        /// Delete all catalog rows and restart id sequences before seeding
        #[arg(long)]
        reset: bool,
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
        Commands::Seed { reset } => commands::seed::run(reset).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_reset_flag() {
        let cli = Cli::try_parse_from(["storehouse-cli", "seed", "--reset"]).unwrap();
        assert!(matches!(cli.command, Commands::Seed { reset: true }));

        let cli = Cli::try_parse_from(["storehouse-cli", "seed"]).unwrap();
        assert!(matches!(cli.command, Commands::Seed { reset: false }));
    }
}
