//! Subscription repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use yadukul_core::{
    ProductId, SubscriptionFrequency, SubscriptionId, SubscriptionStatus, UserId,
};

use super::RepositoryError;
use crate::models::subscription::Subscription;

const SUBSCRIPTION_COLUMNS: &str = "id, customer_id, product_id, product_name, quantity, \
                                    frequency, next_delivery, status, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: SubscriptionId,
    customer_id: UserId,
    product_id: ProductId,
    product_name: String,
    quantity: String,
    frequency: SubscriptionFrequency,
    next_delivery: NaiveDate,
    status: SubscriptionStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            frequency: row.frequency,
            next_delivery: row.next_delivery,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fields of a new subscription.
#[derive(Debug, Clone)]
pub struct NewSubscription<'s> {
    pub customer_id: UserId,
    pub product_id: ProductId,
    pub product_name: &'s str,
    pub quantity: &'s str,
    pub frequency: SubscriptionFrequency,
    pub next_delivery: NaiveDate,
}

/// Repository for subscription database operations.
pub struct SubscriptionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriptionRepository<'a> {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List subscriptions, oldest first. `None` lists every customer's.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        customer_id: Option<UserId>,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM dairy.subscription \
             WHERE ($1::INTEGER IS NULL OR customer_id = $1) \
             ORDER BY created_at, id"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a subscription by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM dairy.subscription WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Start a subscription. It begins `Active`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        new: &NewSubscription<'_>,
    ) -> Result<Subscription, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            "INSERT INTO dairy.subscription \
                 (customer_id, product_id, product_name, quantity, frequency, next_delivery) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(new.customer_id)
        .bind(new.product_id)
        .bind(new.product_name)
        .bind(new.quantity)
        .bind(new.frequency)
        .bind(new.next_delivery)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Set the status of a subscription.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the subscription does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: SubscriptionId,
        status: SubscriptionStatus,
    ) -> Result<Subscription, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            "UPDATE dairy.subscription SET status = $2 WHERE id = $1 \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a subscription.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the subscription does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: SubscriptionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM dairy.subscription WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
