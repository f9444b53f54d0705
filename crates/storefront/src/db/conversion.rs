//! Milk intake and conversion log storage.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use yadukul_core::{ConversionLogId, MilkIntakeLogId, MilkType, OutputUnit};

use super::RepositoryError;
use crate::models::conversion::{
    ConversionInput, ConversionLog, MilkIntakeInput, MilkIntakeLog, MilkUsed,
};

#[derive(Debug, sqlx::FromRow)]
struct MilkIntakeRow {
    id: MilkIntakeLogId,
    milk_type: MilkType,
    quantity_liters: f64,
    logged_at: DateTime<Utc>,
}

impl From<MilkIntakeRow> for MilkIntakeLog {
    fn from(row: MilkIntakeRow) -> Self {
        Self {
            id: row.id,
            milk_type: row.milk_type,
            quantity_liters: row.quantity_liters,
            date: row.logged_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ConversionRow {
    id: ConversionLogId,
    product_name: String,
    quantity_produced: f64,
    unit: OutputUnit,
    cow_liters: Option<f64>,
    buffalo_liters: Option<f64>,
    logged_at: DateTime<Utc>,
}

impl From<ConversionRow> for ConversionLog {
    fn from(row: ConversionRow) -> Self {
        Self {
            id: row.id,
            product_name: row.product_name,
            quantity_produced: row.quantity_produced,
            unit: row.unit,
            milk_used: MilkUsed {
                cow_liters: row.cow_liters,
                buffalo_liters: row.buffalo_liters,
            },
            date: row.logged_at,
        }
    }
}

/// Repository for the dairy floor logs.
pub struct ConversionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ConversionRepository<'a> {
    /// Create a new conversion repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List milk intake logs, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_intake(&self) -> Result<Vec<MilkIntakeLog>, RepositoryError> {
        let rows = sqlx::query_as::<_, MilkIntakeRow>(
            "SELECT id, milk_type, quantity_liters, logged_at \
             FROM dairy.milk_intake_log ORDER BY logged_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Record a milk intake.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_intake(
        &self,
        intake: MilkIntakeInput,
    ) -> Result<MilkIntakeLog, RepositoryError> {
        let row = sqlx::query_as::<_, MilkIntakeRow>(
            "INSERT INTO dairy.milk_intake_log (milk_type, quantity_liters) VALUES ($1, $2) \
             RETURNING id, milk_type, quantity_liters, logged_at",
        )
        .bind(intake.milk_type)
        .bind(intake.quantity_liters)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List conversion logs, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_conversions(&self) -> Result<Vec<ConversionLog>, RepositoryError> {
        let rows = sqlx::query_as::<_, ConversionRow>(
            "SELECT id, product_name, quantity_produced, unit, cow_liters, buffalo_liters, \
                    logged_at \
             FROM dairy.conversion_log ORDER BY logged_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Record a conversion batch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_conversion(
        &self,
        batch: &ConversionInput,
    ) -> Result<ConversionLog, RepositoryError> {
        let row = sqlx::query_as::<_, ConversionRow>(
            "INSERT INTO dairy.conversion_log \
                 (product_name, quantity_produced, unit, cow_liters, buffalo_liters) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, product_name, quantity_produced, unit, cow_liters, buffalo_liters, \
                       logged_at",
        )
        .bind(&batch.product_name)
        .bind(batch.quantity_produced)
        .bind(batch.unit)
        .bind(batch.milk_used.cow_liters)
        .bind(batch.milk_used.buffalo_liters)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
