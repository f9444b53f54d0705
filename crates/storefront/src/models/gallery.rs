//! Gallery image domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use yadukul_core::GalleryImageId;

use super::{ValidationError, require_text};

/// An image on the homepage gallery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    #[serde(rename = "_id")]
    pub id: GalleryImageId,
    pub src: String,
    pub alt: String,
    /// CSS aspect class the gallery grid uses (e.g. `tall`, `wide`).
    pub aspect: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/gallery`.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImageInput {
    pub src: String,
    pub alt: String,
    pub aspect: String,
}

impl GalleryImageInput {
    /// Trim and check all three fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any field is blank.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            src: require_text("src", &self.src)?,
            alt: require_text("alt", &self.alt)?,
            aspect: require_text("aspect", &self.aspect)?,
        })
    }
}
