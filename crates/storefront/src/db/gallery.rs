//! Gallery image repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use yadukul_core::GalleryImageId;

use super::RepositoryError;
use crate::models::gallery::{GalleryImage, GalleryImageInput};

#[derive(Debug, sqlx::FromRow)]
struct GalleryImageRow {
    id: GalleryImageId,
    src: String,
    alt: String,
    aspect: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GalleryImageRow> for GalleryImage {
    fn from(row: GalleryImageRow) -> Self {
        Self {
            id: row.id,
            src: row.src,
            alt: row.alt,
            aspect: row.aspect,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for gallery image database operations.
pub struct GalleryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GalleryRepository<'a> {
    /// Create a new gallery repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all images, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<GalleryImage>, RepositoryError> {
        let rows = sqlx::query_as::<_, GalleryImageRow>(
            "SELECT id, src, alt, aspect, created_at, updated_at \
             FROM dairy.gallery_image ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add an image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, image: &GalleryImageInput) -> Result<GalleryImage, RepositoryError> {
        let row = sqlx::query_as::<_, GalleryImageRow>(
            "INSERT INTO dairy.gallery_image (src, alt, aspect) VALUES ($1, $2, $3) \
             RETURNING id, src, alt, aspect, created_at, updated_at",
        )
        .bind(&image.src)
        .bind(&image.alt)
        .bind(&image.aspect)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Remove an image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: GalleryImageId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM dairy.gallery_image WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove every image. Used by `seed catalog --clear`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM dairy.gallery_image")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
