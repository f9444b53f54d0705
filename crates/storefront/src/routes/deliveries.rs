//! Delivery handlers.
//!
//! Admins assign deliveries to staff; the assigned staff member moves each
//! one along `Pending -> Out for Delivery -> Delivered | Returned` and can
//! attach a proof photo.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get, put},
};
use tracing::{info, instrument, warn};

use yadukul_core::{DeliveryId, Role, UserId};

use super::Message;
use crate::db::{DeliveryRepository, UserRepository};
use crate::error::{AppError, OrNotFound, Result, add_breadcrumb};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{RequireAdmin, RequireStaff, RequireUser};
use crate::models::delivery::{
    Delivery, DeliveryInput, DeliveryProofInput, DeliveryQuery, DeliveryScope,
    DeliveryStatusInput,
};
use crate::models::user::User;
use crate::services::export::CsvDocument;
use crate::state::AppState;

const DELIVERY_NOT_FOUND: &str = "Delivery not found";

/// Build the delivery router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/export", get(export))
        .route("/{id}", delete(remove))
        .route("/{id}/status", put(update_status))
        .route("/{id}/proof", put(update_proof))
}

/// Deliveries visible to the caller, newest first.
pub async fn index(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DeliveryQuery>,
) -> Result<Json<Vec<Delivery>>> {
    let scope = DeliveryScope::for_caller(user.id, user.role);
    let deliveries = DeliveryRepository::new(state.pool())
        .list(scope, query.active)
        .await?;
    Ok(Json(deliveries))
}

/// Look up a user and check they hold `role`.
async fn user_with_role(
    state: &AppState,
    id: UserId,
    role: Role,
    message: &str,
) -> Result<User> {
    UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .filter(|u| u.role == role)
        .ok_or_else(|| AppError::BadRequest(message.to_owned()))
}

/// Assign a delivery to a staff member.
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<DeliveryInput>,
) -> Result<(StatusCode, Json<Delivery>)> {
    let new = input.validate()?;

    let customer =
        user_with_role(&state, new.customer_id, Role::Customer, "Customer not found").await?;
    user_with_role(&state, new.staff_id, Role::Staff, "Staff member not found").await?;

    let customer_name = new.customer_name.unwrap_or(customer.name);
    let delivery = DeliveryRepository::new(state.pool())
        .create(new.customer_id, new.staff_id, &customer_name, &new.address)
        .await?;

    info!(delivery_id = %delivery.id, staff_id = %delivery.staff_id, "Delivery assigned");
    Ok((StatusCode::CREATED, Json(delivery)))
}

/// Load a delivery the caller is allowed to update.
async fn managed_delivery(state: &AppState, id: DeliveryId, caller: &User) -> Result<Delivery> {
    let delivery = DeliveryRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(DELIVERY_NOT_FOUND.to_owned()))?;

    if !delivery.is_managed_by(caller.id, caller.role) {
        return Err(AppError::Forbidden(
            "Not authorized to update this delivery".to_owned(),
        ));
    }
    Ok(delivery)
}

/// Advance a delivery's status. Re-sending the current status is a no-op.
#[instrument(skip_all, fields(delivery_id = %id))]
pub async fn update_status(
    RequireStaff(caller): RequireStaff,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DeliveryId>,
    ApiJson(input): ApiJson<DeliveryStatusInput>,
) -> Result<Json<Delivery>> {
    let delivery = managed_delivery(&state, id, &caller).await?;
    let (current, next) = (delivery.status, input.status);

    if current == next {
        return Ok(Json(delivery));
    }
    if !current.can_transition_to(next) {
        warn!(from = %current, to = %next, "Rejected delivery transition");
        return Err(AppError::Conflict(format!(
            "Cannot change delivery status from {current} to {next}"
        )));
    }

    let delivery = DeliveryRepository::new(state.pool())
        .update_status(id, current, next)
        .await?;

    let id_str = id.to_string();
    add_breadcrumb("deliveries", "Status updated", Some(&[("delivery_id", id_str.as_str())]));
    info!(from = %current, to = %next, "Delivery status updated");
    Ok(Json(delivery))
}

/// Attach a proof-of-delivery photo.
#[instrument(skip_all, fields(delivery_id = %id))]
pub async fn update_proof(
    RequireStaff(caller): RequireStaff,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DeliveryId>,
    ApiJson(input): ApiJson<DeliveryProofInput>,
) -> Result<Json<Delivery>> {
    let url = input.validate()?;
    managed_delivery(&state, id, &caller).await?;

    let delivery = DeliveryRepository::new(state.pool())
        .update_proof(id, &url)
        .await
        .or_not_found(DELIVERY_NOT_FOUND)?;
    Ok(Json(delivery))
}

/// Remove a delivery.
#[instrument(skip_all, fields(delivery_id = %id))]
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DeliveryId>,
) -> Result<Json<Message>> {
    DeliveryRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found(DELIVERY_NOT_FOUND)?;
    Ok(Json(Message::new("Delivery removed")))
}

/// Download every delivery as `deliveries.csv`.
pub async fn export(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Response> {
    let deliveries = DeliveryRepository::new(state.pool())
        .list(DeliveryScope::All, false)
        .await?;

    let mut csv = CsvDocument::new(&[
        "ID", "Customer ID", "Customer", "Staff ID", "Address", "Status", "Proof", "Created",
    ]);
    for d in &deliveries {
        csv.push_row([
            d.id.to_string(),
            d.customer_id.to_string(),
            d.customer_name.clone(),
            d.staff_id.to_string(),
            d.address.clone(),
            d.status.to_string(),
            d.proof_image_url.clone().unwrap_or_default(),
            d.created_at.to_rfc3339(),
        ]);
    }
    Ok(csv.into_download("deliveries.csv"))
}
