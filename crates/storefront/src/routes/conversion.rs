//! Milk intake and conversion logs. Admin only.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tracing::{info, instrument};

use crate::db::ConversionRepository;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAdmin;
use crate::models::conversion::{ConversionInput, ConversionLog, MilkIntakeInput, MilkIntakeLog};
use crate::state::AppState;

/// Build the conversion router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/intake", get(list_intake).post(log_intake))
        .route("/logs", get(list_conversions).post(log_conversion))
}

/// Milk intake, newest first.
pub async fn list_intake(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<MilkIntakeLog>>> {
    let logs = ConversionRepository::new(state.pool()).list_intake().await?;
    Ok(Json(logs))
}

/// Record milk received from the herd.
#[instrument(skip_all)]
pub async fn log_intake(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<MilkIntakeInput>,
) -> Result<(StatusCode, Json<MilkIntakeLog>)> {
    let input = input.validate()?;
    let log = ConversionRepository::new(state.pool())
        .create_intake(input)
        .await?;

    info!(milk_type = ?log.milk_type, liters = log.quantity_liters, "Milk intake logged");
    Ok((StatusCode::CREATED, Json(log)))
}

/// Conversions, newest first.
pub async fn list_conversions(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ConversionLog>>> {
    let logs = ConversionRepository::new(state.pool())
        .list_conversions()
        .await?;
    Ok(Json(logs))
}

/// Record milk turned into a product.
#[instrument(skip_all)]
pub async fn log_conversion(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ConversionInput>,
) -> Result<(StatusCode, Json<ConversionLog>)> {
    let input = input.validate()?;
    let log = ConversionRepository::new(state.pool())
        .create_conversion(&input)
        .await?;

    info!(
        product = %log.product_name,
        produced = log.quantity_produced,
        milk_liters = log.milk_used.total(),
        "Conversion logged"
    );
    Ok((StatusCode::CREATED, Json(log)))
}
