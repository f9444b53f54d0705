//! Yadukul CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! yd-cli migrate
//!
//! # Load products, gallery images and inventory from YAML
//! yd-cli seed catalog crates/cli/seed/catalog.yaml
//!
//! # Replace the existing catalog instead of adding to it
//! yd-cli seed catalog crates/cli/seed/catalog.yaml --clear
//!
//! # Create an admin, or promote an existing user
//! yd-cli admin create --phone 9876543210 --name "Dairy Owner"
//! ```
//!
//! All commands read `YADUKUL_DATABASE_URL` (or `DATABASE_URL`), loading a
//! `.env` file when present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "yd-cli")]
#[command(author, version, about = "Yadukul Dairy CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database from YAML files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load products, gallery images and inventory items
    Catalog {
        /// Path to the catalog YAML file
        file: String,

        /// Delete the existing products, gallery and inventory first
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create an admin user, promoting the phone's existing account if any
    Create {
        /// Admin phone number
        #[arg(short, long)]
        phone: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file, clear } => {
                commands::seed::catalog(&file, clear).await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Create { phone, name } => {
                commands::admin::create(&phone, &name).await?;
            }
        },
    }
    Ok(())
}
