//! `yd-cli` subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

use yadukul_storefront::config::{ConfigError, database_url_from_env};
use yadukul_storefront::db::{self, RepositoryError};

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A repository write failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Seed file could not be read.
    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Seed file is not valid YAML for the expected shape.
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Input failed validation.
    #[error("{0}")]
    Invalid(String),
}

/// Connect to the database named by the environment.
async fn connect() -> Result<PgPool, CommandError> {
    let database_url = database_url_from_env()?;
    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
