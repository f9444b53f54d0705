//! Profile and staff management handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use tracing::{info, instrument};

use yadukul_core::{Role, UserId};

use super::Message;
use crate::db::UserRepository;
use crate::error::{AppError, OrNotFound, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::user::{ProfileInput, StaffInput, User};
use crate::state::AppState;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile).put(update_profile))
        .route("/staff", get(list_staff).post(create_staff))
        .route("/staff/{id}", put(update_staff).delete(delete_staff))
}

/// The caller's own record.
pub async fn profile(RequireUser(user): RequireUser) -> Json<User> {
    Json(user)
}

/// Update the caller's name, address or avatar.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_profile(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProfileInput>,
) -> Result<Json<User>> {
    let update = input.validate()?;
    let user = UserRepository::new(state.pool())
        .update_profile(user.id, &update)
        .await?;
    Ok(Json(user))
}

/// All staff members.
pub async fn list_staff(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    let staff = UserRepository::new(state.pool())
        .list_by_role(Role::Staff)
        .await?;
    Ok(Json(staff))
}

/// Create a staff member.
#[instrument(skip_all)]
pub async fn create_staff(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<StaffInput>,
) -> Result<(StatusCode, Json<User>)> {
    let staff = input.validate()?;
    let user = UserRepository::new(state.pool())
        .create_staff(&staff)
        .await?;

    info!(staff_id = %user.id, phone = %user.phone.masked(), "Staff member created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Replace a staff member's fields.
#[instrument(skip_all, fields(staff_id = %id))]
pub async fn update_staff(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(input): ApiJson<StaffInput>,
) -> Result<Json<User>> {
    let staff = input.validate()?;
    let user = UserRepository::new(state.pool())
        .update_staff(id, &staff)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff member not found".to_owned()))?;
    Ok(Json(user))
}

/// Remove a staff member.
#[instrument(skip_all, fields(staff_id = %id))]
pub async fn delete_staff(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<Message>> {
    UserRepository::new(state.pool())
        .delete_staff(id)
        .await
        .or_not_found("Staff member not found")?;

    info!(staff_id = %id, "Staff member removed");
    Ok(Json(Message::new("Staff member removed")))
}
