//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Phone + OTP login and bearer tokens
//! - `catalog` - Cached product list
//! - `export` - CSV downloads for the admin panel
//! - `upload` - Image uploads to local storage

pub mod auth;
pub mod catalog;
pub mod export;
pub mod upload;

pub use catalog::ProductCatalog;
pub use upload::{UploadError, UploadStore};
