//! Database migration command.
//!
//! Applies the migrations in `crates/storefront/migrations/`, which are
//! embedded in the storefront crate. The server never migrates on startup.

use yadukul_storefront::db;

use super::CommandError;

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
