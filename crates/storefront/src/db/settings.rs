//! Site settings storage.
//!
//! Settings are key/value rows in `dairy.site_setting`; absent keys read as
//! unset.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::settings::{HERO_IMAGE_URL_KEY, LOGO_URL_KEY, SiteSettings};

/// Repository for site settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Read the current settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<SiteSettings, RepositoryError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT key, value FROM dairy.site_setting WHERE key = ANY($1)",
        )
        .bind(&[LOGO_URL_KEY, HERO_IMAGE_URL_KEY][..])
        .fetch_all(self.pool)
        .await?;

        let mut settings = SiteSettings::default();
        for (key, value) in rows {
            match key.as_str() {
                LOGO_URL_KEY => settings.logo_url = Some(value),
                HERO_IMAGE_URL_KEY => settings.hero_image_url = Some(value),
                _ => {}
            }
        }
        Ok(settings)
    }

    /// Write the fields that are set; `None` leaves a setting untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a write fails.
    pub async fn update(&self, settings: &SiteSettings) -> Result<SiteSettings, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for (key, value) in [
            (LOGO_URL_KEY, settings.logo_url.as_deref()),
            (HERO_IMAGE_URL_KEY, settings.hero_image_url.as_deref()),
        ] {
            let Some(value) = value else { continue };
            sqlx::query(
                "INSERT INTO dairy.site_setting (key, value) VALUES ($1, $2) \
                 ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.get().await
    }
}
