//! Order repository for database operations.
//!
//! Order lines are stored as a JSONB array priced at order time, so later
//! catalog price changes do not alter past orders.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use yadukul_core::{OrderId, OrderStatus, Price, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, customer_id, items, total_amount, status, paid_at, created_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: UserId,
    items: Json<Vec<OrderItem>>,
    total_amount: Price,
    status: OrderStatus,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            items: row.items.0,
            total_amount: row.total_amount,
            status: row.status,
            date: row.created_at,
            paid_at: row.paid_at,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first. `None` lists every customer's.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, customer_id: Option<UserId>) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM dairy.order \
             WHERE ($1::INTEGER IS NULL OR customer_id = $1) \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM dairy.order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Place a `Pending` order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        customer_id: UserId,
        items: &[OrderItem],
        total: Price,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO dairy.order (customer_id, items, total_amount) VALUES ($1, $2, $3) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(Json(items))
        .bind(total)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Sum of the customer's unpaid order totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn outstanding_balance(&self, customer_id: UserId) -> Result<Price, RepositoryError> {
        let total: Price = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM dairy.order \
             WHERE customer_id = $1 AND status = 'pending'",
        )
        .bind(customer_id)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }

    /// Mark a pending order paid and credit the customer's loyalty points.
    ///
    /// Both writes happen in one statement; the status guard makes a second
    /// payment of the same order a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order is not pending.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_paid(
        &self,
        id: OrderId,
        loyalty_points: i32,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "WITH paid AS ( \
                 UPDATE dairy.order SET status = 'paid', paid_at = NOW() \
                 WHERE id = $1 AND status = 'pending' \
                 RETURNING {ORDER_COLUMNS} \
             ), credited AS ( \
                 UPDATE dairy.user SET loyalty_points = loyalty_points + $2 \
                 WHERE id = (SELECT customer_id FROM paid) \
             ) \
             SELECT {ORDER_COLUMNS} FROM paid"
        ))
        .bind(id)
        .bind(loyalty_points)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| RepositoryError::Conflict("order already paid".to_owned()))?;

        Ok(row.into())
    }
}
