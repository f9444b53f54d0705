//! Delivery repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use yadukul_core::{DeliveryId, DeliveryStatus, UserId};

use super::RepositoryError;
use crate::models::delivery::{Delivery, DeliveryScope};

const DELIVERY_COLUMNS: &str = "id, customer_id, staff_id, customer_name, address, status, \
                                proof_image_url, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct DeliveryRow {
    id: DeliveryId,
    customer_id: UserId,
    staff_id: UserId,
    customer_name: String,
    address: String,
    status: DeliveryStatus,
    proof_image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DeliveryRow> for Delivery {
    fn from(row: DeliveryRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            staff_id: row.staff_id,
            customer_name: row.customer_name,
            address: row.address,
            status: row.status,
            proof_image_url: row.proof_image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for delivery database operations.
pub struct DeliveryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DeliveryRepository<'a> {
    /// Create a new delivery repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the deliveries visible in `scope`, newest first.
    ///
    /// With `active_only`, finished deliveries (`Delivered`, `Returned`) are
    /// left out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        scope: DeliveryScope,
        active_only: bool,
    ) -> Result<Vec<Delivery>, RepositoryError> {
        let (staff_id, customer_id) = match scope {
            DeliveryScope::All => (None, None),
            DeliveryScope::AssignedTo(id) => (Some(id), None),
            DeliveryScope::OrderedBy(id) => (None, Some(id)),
        };

        let rows = sqlx::query_as::<_, DeliveryRow>(&format!(
            "SELECT {DELIVERY_COLUMNS} FROM dairy.delivery \
             WHERE ($1::INTEGER IS NULL OR staff_id = $1) \
               AND ($2::INTEGER IS NULL OR customer_id = $2) \
               AND (NOT $3 OR status IN ('pending', 'out_for_delivery')) \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(staff_id)
        .bind(customer_id)
        .bind(active_only)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a delivery by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: DeliveryId) -> Result<Option<Delivery>, RepositoryError> {
        let row = sqlx::query_as::<_, DeliveryRow>(&format!(
            "SELECT {DELIVERY_COLUMNS} FROM dairy.delivery WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Assign a new delivery. It starts as `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        customer_id: UserId,
        staff_id: UserId,
        customer_name: &str,
        address: &str,
    ) -> Result<Delivery, RepositoryError> {
        let row = sqlx::query_as::<_, DeliveryRow>(&format!(
            "INSERT INTO dairy.delivery (customer_id, staff_id, customer_name, address) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {DELIVERY_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(staff_id)
        .bind(customer_name)
        .bind(address)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Move a delivery to `next` if it is still in `current`.
    ///
    /// The status guard in the `WHERE` clause keeps two concurrent updates
    /// from both applying.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the status changed underneath.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: DeliveryId,
        current: DeliveryStatus,
        next: DeliveryStatus,
    ) -> Result<Delivery, RepositoryError> {
        let row = sqlx::query_as::<_, DeliveryRow>(&format!(
            "UPDATE dairy.delivery SET status = $3 \
             WHERE id = $1 AND status = $2 \
             RETURNING {DELIVERY_COLUMNS}"
        ))
        .bind(id)
        .bind(current)
        .bind(next)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| RepositoryError::Conflict("delivery status changed".to_owned()))?;

        Ok(row.into())
    }

    /// Attach a proof-of-delivery image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the delivery does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_proof(
        &self,
        id: DeliveryId,
        proof_image_url: &str,
    ) -> Result<Delivery, RepositoryError> {
        let row = sqlx::query_as::<_, DeliveryRow>(&format!(
            "UPDATE dairy.delivery SET proof_image_url = $2 WHERE id = $1 \
             RETURNING {DELIVERY_COLUMNS}"
        ))
        .bind(id)
        .bind(proof_image_url)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a delivery.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the delivery does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: DeliveryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM dairy.delivery WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
