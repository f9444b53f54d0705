//! Product route handlers.
//!
//! Reads go through the cached catalog; every write drops the cache.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
};
use serde::Deserialize;
use tracing::{info, instrument};

use yadukul_core::{ProductCategory, ProductId};

use super::Message;
use crate::db::ProductRepository;
use crate::error::{AppError, OrNotFound, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::RequireAdmin;
use crate::models::product::{Product, ProductInput};
use crate::services::export::CsvDocument;
use crate::state::AppState;

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Build the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/export", get(export))
        .route("/{id}", get(show).put(update).delete(delete))
}

/// Query string of `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<ProductCategory>,
}

/// All products, oldest first, optionally filtered by category.
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().all(state.pool()).await?;
    let products = products
        .iter()
        .filter(|p| query.category.is_none_or(|c| p.category == c))
        .cloned()
        .collect();
    Ok(Json(products))
}

/// A single product.
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()))?;
    Ok(Json(product))
}

/// Add a product to the catalog.
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let draft = input.validate()?;
    let product = ProductRepository::new(state.pool()).create(&draft).await?;
    state.catalog().invalidate().await;

    info!(product_id = %product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's editable fields.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<Product>> {
    let draft = input.validate()?;
    let product = ProductRepository::new(state.pool())
        .update(id, &draft)
        .await
        .or_not_found(PRODUCT_NOT_FOUND)?;
    state.catalog().invalidate().await;
    Ok(Json(product))
}

/// Remove a product.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Message>> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found(PRODUCT_NOT_FOUND)?;
    state.catalog().invalidate().await;

    info!(product_id = %id, "Product removed");
    Ok(Json(Message::new("Product removed")))
}

/// Download the catalog as `products.csv`.
pub async fn export(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Response> {
    let products = ProductRepository::new(state.pool()).list().await?;

    let mut csv = CsvDocument::new(&[
        "ID", "Name", "Category", "Price", "Rating", "Origin", "Nutrition", "Image URL",
    ]);
    for p in &products {
        csv.push_row(product_row(p));
    }
    Ok(csv.into_download("products.csv"))
}

/// One CSV row; the price is the bare amount so spreadsheets read it as a number.
fn product_row(p: &Product) -> [String; 8] {
    [
        p.id.to_string(),
        p.name.clone(),
        p.category.to_string(),
        p.price.amount().to_string(),
        p.rating.to_string(),
        p.origin.clone(),
        p.nutrition.clone(),
        p.image_url.clone(),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use yadukul_core::Price;

    use super::*;

    #[test]
    fn test_product_row_exports_plain_price() {
        let product = Product {
            id: ProductId::new(7),
            name: "A2 Cow Milk".to_owned(),
            category: ProductCategory::Milk,
            price: Price::new(Decimal::new(5850, 2)).unwrap(),
            image_url: "/uploads/milk.jpg".to_owned(),
            origin: "Gir".to_owned(),
            nutrition: "Protein 3.2g".to_owned(),
            rating: 4.5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let row = product_row(&product);
        assert_eq!(row[0], "7");
        assert_eq!(row[1], "A2 Cow Milk");
        assert_eq!(row[3], "58.50");
        assert_eq!(row[4], "4.5");
        assert_eq!(row[7], "/uploads/milk.jpg");
    }
}
