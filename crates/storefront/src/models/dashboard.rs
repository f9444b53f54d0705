//! Admin overview figures.

use serde::Serialize;

use yadukul_core::Price;

/// Revenue from paid orders in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`.
    pub month: String,
    pub revenue: Price,
}

/// Body of `GET /api/dashboard`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Price,
    pub total_products: i64,
    pub active_subscriptions: i64,
    pub deliveries_total: i64,
    pub deliveries_completed: i64,
    /// Oldest month first, current month last.
    pub monthly_revenue: Vec<MonthlyRevenue>,
}
