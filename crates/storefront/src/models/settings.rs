//! Site-wide settings shown on the public pages.

use serde::{Deserialize, Serialize};

use super::optional_text;

/// Setting key for the logo URL.
pub const LOGO_URL_KEY: &str = "logo_url";
/// Setting key for the homepage hero image URL.
pub const HERO_IMAGE_URL_KEY: &str = "hero_image_url";

/// Branding images the admin can swap out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub logo_url: Option<String>,
    pub hero_image_url: Option<String>,
}

impl SiteSettings {
    /// Trim both fields, turning blanks into `None`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            logo_url: optional_text(self.logo_url.as_deref()),
            hero_image_url: optional_text(self.hero_image_url.as_deref()),
        }
    }
}
