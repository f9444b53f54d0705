//! Image upload storage.
//!
//! Uploads are written to a local directory that the server also serves under
//! `/uploads`. Stored names keep a sanitized form of the original stem and add
//! a random suffix, so two uploads of `milk.jpg` never collide.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::UploadConfig;

/// URL path uploads are served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Longest stem kept from the original file name.
const MAX_STEM_LEN: usize = 48;

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The request carried no file.
    #[error("No file uploaded")]
    Missing,

    /// The file is empty.
    #[error("Uploaded file is empty")]
    Empty,

    /// The file is not an image.
    #[error("Only image files are allowed")]
    NotAnImage,

    /// The file exceeds the configured limit.
    #[error("File too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: usize },

    /// Writing the file failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Local image store.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_url: String,
    max_bytes: usize,
}

impl UploadStore {
    /// Create a store from configuration.
    #[must_use]
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            public_url: config.public_url.clone(),
            max_bytes: config.max_bytes,
        }
    }

    /// Directory files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Largest accepted upload in bytes.
    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Store an image and return the URL it is served at.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` if the file is empty, too large, not an image, or
    /// cannot be written.
    pub async fn save(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }

        let extension = image_extension(original_name, content_type).ok_or(UploadError::NotAnImage)?;
        let file_name = format!(
            "{}-{}.{extension}",
            sanitized_stem(original_name),
            Uuid::new_v4().simple()
        );

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        info!(file = %file_name, size = bytes.len(), "Stored upload");
        Ok(format!("{}{UPLOADS_ROUTE}/{file_name}", self.public_url))
    }
}

/// Pick a file extension for an image, preferring the declared content type.
fn image_extension(original_name: Option<&str>, content_type: Option<&str>) -> Option<&'static str> {
    let from_mime = content_type.and_then(|ct| match ct.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/avif" => Some("avif"),
        _ => None,
    });
    if from_mime.is_some() {
        return from_mime;
    }

    // Some clients send application/octet-stream; fall back to the name
    let is_image_or_unknown = content_type.is_none_or(|ct| {
        let ct = ct.to_ascii_lowercase();
        ct.starts_with("image/") || ct == "application/octet-stream"
    });
    if !is_image_or_unknown {
        return None;
    }

    let ext = Path::new(original_name?)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "avif" => Some("avif"),
        _ => None,
    }
}

/// File stem reduced to `[a-z0-9-]`, or `image` when nothing is left.
fn sanitized_stem(original_name: Option<&str>) -> String {
    let stem = original_name
        .map(Path::new)
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let mut out = String::with_capacity(stem.len().min(MAX_STEM_LEN));
    for c in stem.chars() {
        if out.len() >= MAX_STEM_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }

    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "image".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(dir: PathBuf) -> UploadStore {
        UploadStore::new(&UploadConfig {
            dir,
            max_bytes: 16,
            public_url: String::new(),
        })
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("yadukul-upload-test-{}", Uuid::new_v4().simple()))
    }

    #[test]
    fn test_sanitized_stem() {
        assert_eq!(sanitized_stem(Some("Fresh Paneer (1).JPG")), "fresh-paneer-1");
        assert_eq!(sanitized_stem(Some("../../etc/passwd")), "passwd");
        assert_eq!(sanitized_stem(Some("???.png")), "image");
        assert_eq!(sanitized_stem(None), "image");
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(Some("a.png"), Some("image/jpeg")), Some("jpg"));
        assert_eq!(image_extension(Some("a.WEBP"), Some("application/octet-stream")), Some("webp"));
        assert_eq!(image_extension(Some("a.png"), None), Some("png"));
        assert_eq!(image_extension(Some("a.pdf"), Some("application/pdf")), None);
        assert_eq!(image_extension(Some("a.exe"), None), None);
    }

    #[tokio::test]
    async fn test_save_writes_file() {
        let dir = temp_dir();
        let store = store(dir.clone());

        let url = store
            .save(Some("milk.png"), Some("image/png"), b"\x89PNG")
            .await
            .unwrap();
        assert!(url.starts_with("/uploads/milk-"));
        assert!(url.ends_with(".png"));

        let name = url.trim_start_matches("/uploads/");
        let written = tokio::fs::read(dir.join(name)).await.unwrap();
        assert_eq!(written, b"\x89PNG");

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_bad_input() {
        let store = store(temp_dir());

        assert!(matches!(
            store.save(Some("a.png"), Some("image/png"), b"").await,
            Err(UploadError::Empty)
        ));
        assert!(matches!(
            store.save(Some("a.png"), Some("image/png"), &[0u8; 17]).await,
            Err(UploadError::TooLarge { max_bytes: 16 })
        ));
        assert!(matches!(
            store.save(Some("a.txt"), Some("text/plain"), b"hello").await,
            Err(UploadError::NotAnImage)
        ));
    }
}
