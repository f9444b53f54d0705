//! Image upload handler.

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    routing::post,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::services::UploadError;
use crate::state::AppState;

/// Multipart field carrying the file.
const IMAGE_FIELD: &str = "image";

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 16 * 1024;

/// Build the upload router. Bodies are capped just above `max_bytes`.
pub fn router(max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(upload))
        .layer(DefaultBodyLimit::max(max_bytes.saturating_add(MULTIPART_OVERHEAD)))
}

/// Successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub url: String,
}

/// Store the `image` field of a multipart body and return its public URL.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn upload(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|_| UploadError::Missing)?;
    let max_bytes = state.uploads().max_bytes();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, max_bytes))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(&e, max_bytes))?;

        let url = state
            .uploads()
            .save(file_name.as_deref(), content_type.as_deref(), &bytes)
            .await?;

        info!(size = bytes.len(), url = %url, "Image uploaded");
        return Ok(Json(UploadResponse {
            message: "Image uploaded successfully",
            url,
        }));
    }

    Err(UploadError::Missing.into())
}

fn multipart_error(err: &MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge { max_bytes }.into()
    } else {
        AppError::BadRequest(err.body_text())
    }
}
