//! Inventory repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use yadukul_core::{InventoryItemId, InventoryKind, InventoryUnit};

use super::RepositoryError;
use crate::models::inventory::{InventoryItem, InventoryItemInput};

const INVENTORY_COLUMNS: &str = "id, name, kind, quantity, unit, last_updated, created_at";

#[derive(Debug, sqlx::FromRow)]
struct InventoryItemRow {
    id: InventoryItemId,
    name: String,
    kind: InventoryKind,
    quantity: f64,
    unit: InventoryUnit,
    last_updated: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<InventoryItemRow> for InventoryItem {
    fn from(row: InventoryItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            kind: row.kind,
            quantity: row.quantity,
            unit: row.unit,
            last_updated: row.last_updated,
            created_at: row.created_at,
        }
    }
}

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all stock lines, raw materials first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM dairy.inventory_item ORDER BY kind, name, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a stock line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, item: &InventoryItemInput) -> Result<InventoryItem, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "INSERT INTO dairy.inventory_item (name, kind, quantity, unit) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {INVENTORY_COLUMNS}"
        ))
        .bind(&item.name)
        .bind(item.kind)
        .bind(item.quantity)
        .bind(item.unit)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Set the quantity on hand and refresh `last_updated`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        id: InventoryItemId,
        quantity: f64,
    ) -> Result<InventoryItem, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "UPDATE dairy.inventory_item SET quantity = $2, last_updated = NOW() \
             WHERE id = $1 \
             RETURNING {INVENTORY_COLUMNS}"
        ))
        .bind(id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a stock line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: InventoryItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM dairy.inventory_item WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete every stock line. Used by `seed catalog --clear`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM dairy.inventory_item")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
