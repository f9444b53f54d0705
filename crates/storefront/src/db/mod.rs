//! Database operations for the dairy `PostgreSQL` database.
//!
//! # Schema: `dairy`
//!
//! ## Tables
//!
//! - `user` - Admins, staff and customers, keyed by phone
//! - `product` - Catalog
//! - `gallery_image` - Homepage gallery
//! - `site_setting` - Logo and hero image URLs
//! - `delivery` - Delivery assignments and proof of delivery
//! - `inventory_item` - Raw material and finished product stock
//! - `milk_intake_log`, `conversion_log` - Dairy floor logs
//! - `subscription` - Recurring customer deliveries
//! - `order` - Customer orders and payment state
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p yadukul-cli -- migrate
//! ```

pub mod conversion;
pub mod dashboard;
pub mod deliveries;
pub mod gallery;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod settings;
pub mod subscriptions;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use conversion::ConversionRepository;
pub use dashboard::DashboardRepository;
pub use deliveries::DeliveryRepository;
pub use gallery::GalleryRepository;
pub use inventory::InventoryRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use settings::SettingsRepository;
pub use subscriptions::{NewSubscription, SubscriptionRepository};
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique phone).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique violation to `Conflict`, anything else to `Database`.
    pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history diverges
/// from the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
