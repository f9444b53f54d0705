//! Dairy-floor inventory handlers. Admin only.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{get, put},
};
use tracing::{info, instrument};

use yadukul_core::InventoryItemId;

use super::Message;
use crate::db::InventoryRepository;
use crate::error::{OrNotFound, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdmin;
use crate::models::inventory::{InventoryItem, InventoryItemInput, InventoryQuantityInput};
use crate::services::export::CsvDocument;
use crate::state::AppState;

const ITEM_NOT_FOUND: &str = "Inventory item not found";

/// Build the inventory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/export", get(export))
        .route("/{id}", put(set_quantity).delete(remove))
}

/// All stock lines, raw materials first.
pub async fn index(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<InventoryItem>>> {
    let items = InventoryRepository::new(state.pool()).list().await?;
    Ok(Json(items))
}

/// Add a stock line.
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<InventoryItemInput>,
) -> Result<(StatusCode, Json<InventoryItem>)> {
    let input = input.validate()?;
    let item = InventoryRepository::new(state.pool()).create(&input).await?;

    info!(item_id = %item.id, name = %item.name, "Inventory item added");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Set the on-hand quantity; refreshes `lastUpdated`.
#[instrument(skip_all, fields(item_id = %id))]
pub async fn set_quantity(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<InventoryItemId>,
    ApiJson(input): ApiJson<InventoryQuantityInput>,
) -> Result<Json<InventoryItem>> {
    let quantity = input.validate()?;
    let item = InventoryRepository::new(state.pool())
        .set_quantity(id, quantity)
        .await
        .or_not_found(ITEM_NOT_FOUND)?;
    Ok(Json(item))
}

/// Remove a stock line.
#[instrument(skip_all, fields(item_id = %id))]
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<InventoryItemId>,
) -> Result<Json<Message>> {
    InventoryRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found(ITEM_NOT_FOUND)?;
    Ok(Json(Message::new("Inventory item removed")))
}

/// Download stock levels as `inventory.csv`.
pub async fn export(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Response> {
    let items = InventoryRepository::new(state.pool()).list().await?;

    let mut csv = CsvDocument::new(&["ID", "Name", "Type", "Quantity", "Unit", "Last Updated"]);
    for item in &items {
        csv.push_row([
            item.id.to_string(),
            item.name.clone(),
            item.kind.to_string(),
            item.quantity.to_string(),
            item.unit.to_string(),
            item.last_updated.to_rfc3339(),
        ]);
    }
    Ok(csv.into_download("inventory.csv"))
}
