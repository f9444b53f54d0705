//! Recurring delivery subscriptions.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::Utc;
use tracing::{info, instrument};

use yadukul_core::SubscriptionId;

use super::{Message, customer_filter};
use crate::db::{NewSubscription, ProductRepository, SubscriptionRepository};
use crate::error::{AppError, OrNotFound, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{RequireCustomer, RequireUser};
use crate::models::subscription::{
    Subscription, SubscriptionAction, SubscriptionActionInput, SubscriptionInput,
    first_delivery_after,
};
use crate::state::AppState;

const SUBSCRIPTION_NOT_FOUND: &str = "Subscription not found";

/// Build the subscription router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", put(update))
}

/// The caller's subscriptions; every subscription for admins.
pub async fn index(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Subscription>>> {
    let customer_id = customer_filter(&user)?;
    let subscriptions = SubscriptionRepository::new(state.pool())
        .list(customer_id)
        .await?;
    Ok(Json(subscriptions))
}

/// Subscribe to a product. The first delivery is tomorrow.
#[instrument(skip_all, fields(customer_id = %customer.id))]
pub async fn create(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SubscriptionInput>,
) -> Result<(StatusCode, Json<Subscription>)> {
    let input = input.validate()?;
    let product = ProductRepository::new(state.pool())
        .get_by_id(input.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    let subscription = SubscriptionRepository::new(state.pool())
        .create(&NewSubscription {
            customer_id: customer.id,
            product_id: product.id,
            product_name: &product.name,
            quantity: &input.quantity,
            frequency: input.frequency,
            next_delivery: first_delivery_after(Utc::now().date_naive()),
        })
        .await?;

    info!(subscription_id = %subscription.id, product = %product.name, "Subscription started");
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// Pause, resume or cancel one of the caller's subscriptions.
#[instrument(skip_all, fields(subscription_id = %id))]
pub async fn update(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SubscriptionId>,
    ApiJson(input): ApiJson<SubscriptionActionInput>,
) -> Result<Response> {
    let repo = SubscriptionRepository::new(state.pool());
    let subscription = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(SUBSCRIPTION_NOT_FOUND.to_owned()))?;

    if subscription.customer_id != customer.id {
        return Err(AppError::Forbidden(
            "Not authorized to modify this subscription".to_owned(),
        ));
    }

    match input.action {
        SubscriptionAction::Toggle => {
            let updated = repo
                .set_status(id, subscription.status.toggled())
                .await
                .or_not_found(SUBSCRIPTION_NOT_FOUND)?;
            info!(status = ?updated.status, "Subscription toggled");
            Ok(Json(updated).into_response())
        }
        SubscriptionAction::Cancel => {
            repo.delete(id).await.or_not_found(SUBSCRIPTION_NOT_FOUND)?;
            info!("Subscription cancelled");
            Ok(Json(Message::new("Subscription cancelled")).into_response())
        }
    }
}
