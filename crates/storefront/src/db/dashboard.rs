//! Aggregate queries behind the admin overview.

use sqlx::PgPool;

use yadukul_core::Price;

use super::RepositoryError;
use crate::models::dashboard::{DashboardStats, MonthlyRevenue};

/// Months shown in the revenue chart, including the current one.
const REVENUE_MONTHS: i32 = 6;

#[derive(Debug, sqlx::FromRow)]
struct CountsRow {
    total_revenue: Price,
    total_products: i64,
    active_subscriptions: i64,
    deliveries_total: i64,
    deliveries_completed: i64,
}

/// Read-only repository for dashboard figures.
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    /// Create a new dashboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Collect the overview figures.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let counts = sqlx::query_as::<_, CountsRow>(
            r"
            SELECT
                (SELECT COALESCE(SUM(total_amount), 0) FROM dairy.order WHERE status = 'paid')
                    AS total_revenue,
                (SELECT COUNT(*) FROM dairy.product) AS total_products,
                (SELECT COUNT(*) FROM dairy.subscription WHERE status = 'active')
                    AS active_subscriptions,
                (SELECT COUNT(*) FROM dairy.delivery) AS deliveries_total,
                (SELECT COUNT(*) FROM dairy.delivery WHERE status = 'delivered')
                    AS deliveries_completed
            ",
        )
        .fetch_one(self.pool)
        .await?;

        let monthly: Vec<(String, Price)> = sqlx::query_as(
            r"
            SELECT to_char(m.month_start, 'YYYY-MM') AS month,
                   COALESCE(SUM(o.total_amount), 0) AS revenue
            FROM generate_series(
                     date_trunc('month', NOW()) - make_interval(months => $1 - 1),
                     date_trunc('month', NOW()),
                     INTERVAL '1 month'
                 ) AS m(month_start)
            LEFT JOIN dairy.order o
                   ON o.status = 'paid' AND date_trunc('month', o.paid_at) = m.month_start
            GROUP BY m.month_start
            ORDER BY m.month_start
            ",
        )
        .bind(REVENUE_MONTHS)
        .fetch_all(self.pool)
        .await?;

        Ok(DashboardStats {
            total_revenue: counts.total_revenue,
            total_products: counts.total_products,
            active_subscriptions: counts.active_subscriptions,
            deliveries_total: counts.deliveries_total,
            deliveries_completed: counts.deliveries_completed,
            monthly_revenue: monthly
                .into_iter()
                .map(|(month, revenue)| MonthlyRevenue { month, revenue })
                .collect(),
        })
    }
}
