//! Orders and simulated payment.
//!
//! Line prices are read from the product table when the order is placed.
//! Paying is a customer-side confirmation; no gateway is involved.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::{info, instrument};

use yadukul_core::{OrderId, OrderStatus};

use super::customer_filter;
use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{RequireCustomer, RequireUser};
use crate::models::order::{Balance, Order, OrderInput, loyalty_points_for};
use crate::state::AppState;

/// Build the order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/balance", get(balance))
        .route("/{id}/pay", post(pay))
}

/// The caller's orders, newest first; every order for admins.
pub async fn index(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let customer_id = customer_filter(&user)?;
    let orders = OrderRepository::new(state.pool()).list(customer_id).await?;
    Ok(Json(orders))
}

/// Place an order priced from the current catalog.
#[instrument(skip_all, fields(customer_id = %customer.id))]
pub async fn create(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<OrderInput>,
) -> Result<(StatusCode, Json<Order>)> {
    input.validate()?;

    let products: HashMap<_, _> = ProductRepository::new(state.pool())
        .get_many(&input.product_ids())
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let (items, total) = input.price(&products)?;

    let order = OrderRepository::new(state.pool())
        .create(customer.id, &items, total)
        .await?;

    info!(order_id = %order.id, total = %order.total_amount, lines = order.items.len(), "Order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

/// Sum of the caller's unpaid orders.
pub async fn balance(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
) -> Result<Json<Balance>> {
    let outstanding = OrderRepository::new(state.pool())
        .outstanding_balance(customer.id)
        .await?;
    Ok(Json(Balance { outstanding }))
}

/// Confirm payment of one of the caller's orders and credit loyalty points.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn pay(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    if order.customer_id != customer.id {
        return Err(AppError::Forbidden(
            "Not authorized to pay for this order".to_owned(),
        ));
    }
    if order.status == OrderStatus::Paid {
        return Err(AppError::Conflict("Order already paid".to_owned()));
    }

    let points = loyalty_points_for(order.total_amount);
    let order = repo.mark_paid(id, points).await?;

    let id_str = id.to_string();
    add_breadcrumb("orders", "Order paid", Some(&[("order_id", id_str.as_str())]));
    info!(total = %order.total_amount, points, "Order paid");
    Ok(Json(order))
}
