//! Site settings handlers.

use axum::{Json, Router, extract::State, routing::get};
use tracing::{info, instrument};

use crate::db::SettingsRepository;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAdmin;
use crate::models::settings::SiteSettings;
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show).put(update))
}

/// Current logo and hero image.
pub async fn show(State(state): State<AppState>) -> Result<Json<SiteSettings>> {
    let settings = SettingsRepository::new(state.pool()).get().await?;
    Ok(Json(settings))
}

/// Update either image; absent or blank fields are left as they are.
#[instrument(skip_all)]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SiteSettings>,
) -> Result<Json<SiteSettings>> {
    let settings = SettingsRepository::new(state.pool())
        .update(&input.normalized())
        .await?;

    info!(admin_id = %admin.id, "Site settings updated");
    Ok(Json(settings))
}
