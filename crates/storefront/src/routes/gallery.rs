//! Homepage gallery handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};
use tracing::{info, instrument};

use yadukul_core::GalleryImageId;

use super::Message;
use crate::db::GalleryRepository;
use crate::error::{OrNotFound, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdmin;
use crate::models::gallery::{GalleryImage, GalleryImageInput};
use crate::state::AppState;

/// Build the gallery router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", delete(remove))
}

/// Gallery images, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<GalleryImage>>> {
    let images = GalleryRepository::new(state.pool()).list().await?;
    Ok(Json(images))
}

/// Add an image to the gallery.
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<GalleryImageInput>,
) -> Result<(StatusCode, Json<GalleryImage>)> {
    let input = input.validate()?;
    let image = GalleryRepository::new(state.pool()).create(&input).await?;

    info!(image_id = %image.id, "Gallery image added");
    Ok((StatusCode::CREATED, Json(image)))
}

/// Remove an image from the gallery.
#[instrument(skip_all, fields(image_id = %id))]
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<GalleryImageId>,
) -> Result<Json<Message>> {
    GalleryRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found("Image not found")?;
    Ok(Json(Message::new("Image removed")))
}
