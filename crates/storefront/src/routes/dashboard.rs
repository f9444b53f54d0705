//! Admin dashboard handler.

use axum::{Json, Router, extract::State, routing::get};

use crate::db::DashboardRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::dashboard::DashboardStats;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(stats))
}

/// Revenue, catalog and delivery totals plus six months of paid revenue.
pub async fn stats(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>> {
    let stats = DashboardRepository::new(state.pool()).stats().await?;
    Ok(Json(stats))
}
