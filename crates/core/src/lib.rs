//! Yadukul Core - Shared types library.
//!
//! This crate provides common types used across all Yadukul components:
//! - `storefront` - REST API serving the admin, staff and customer panels
//! - `cli` - Command-line tools for migrations, seeding and admin bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, phone numbers and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
