//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! All routes below are nested under `/api`.
//!
//! ```text
//! # Auth (rate limited)
//! POST   /users/otp                  - Request a login code
//! POST   /users/login                - Exchange phone + code for a token
//!
//! # Users
//! GET    /users/profile              - Caller's record
//! PUT    /users/profile              - Update caller's name, address, avatar
//! GET    /users/staff                - List staff (admin)
//! POST   /users/staff                - Create staff (admin)
//! PUT    /users/staff/{id}           - Update staff (admin)
//! DELETE /users/staff/{id}           - Remove staff (admin)
//!
//! # Catalog
//! GET    /products                   - Product list (?category=)
//! GET    /products/{id}              - Product detail
//! POST   /products                   - Create product (admin)
//! PUT    /products/{id}              - Replace product (admin)
//! DELETE /products/{id}              - Remove product (admin)
//! GET    /products/export            - products.csv (admin)
//! GET    /gallery                    - Gallery images
//! POST   /gallery                    - Add image (admin)
//! DELETE /gallery/{id}               - Remove image (admin)
//! POST   /upload                     - Multipart image upload (any user)
//! GET    /settings                   - Site settings
//! PUT    /settings                   - Update site settings (admin)
//!
//! # Deliveries
//! GET    /deliveries                 - Caller's deliveries (?active=true)
//! POST   /deliveries                 - Assign a delivery (admin)
//! PUT    /deliveries/{id}/status     - Advance status (assigned staff, admin)
//! PUT    /deliveries/{id}/proof      - Attach proof photo (assigned staff, admin)
//! DELETE /deliveries/{id}            - Remove delivery (admin)
//! GET    /deliveries/export          - deliveries.csv (admin)
//!
//! # Dairy floor (admin)
//! GET    /inventory                  - Inventory items
//! POST   /inventory                  - Add item
//! PUT    /inventory/{id}             - Set quantity
//! DELETE /inventory/{id}             - Remove item
//! GET    /inventory/export           - inventory.csv
//! GET    /conversion/intake          - Milk intake logs
//! POST   /conversion/intake          - Log milk intake
//! GET    /conversion/logs            - Conversion logs
//! POST   /conversion/logs            - Log a conversion
//! GET    /dashboard                  - Business stats
//!
//! # Customer
//! GET    /subscriptions              - Own subscriptions (admin: all)
//! POST   /subscriptions              - Subscribe (customer)
//! PUT    /subscriptions/{id}         - Toggle or cancel (owner)
//! GET    /orders                     - Own orders (admin: all)
//! POST   /orders                     - Place order (customer)
//! GET    /orders/balance             - Outstanding balance (customer)
//! POST   /orders/{id}/pay            - Confirm payment (owner)
//! ```

pub mod auth;
pub mod conversion;
pub mod dashboard;
pub mod deliveries;
pub mod gallery;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod settings;
pub mod subscriptions;
pub mod upload;
pub mod users;

use axum::Router;
use serde::Serialize;

use yadukul_core::{Role, UserId};

use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::state::AppState;

/// `{message}` body returned by deletes and other actions without a resource.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Message {
    pub message: &'static str,
}

impl Message {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Customer filter for per-customer lists: admins see every customer's
/// records (`None`), customers only their own. Staff have no such list.
fn customer_filter(user: &User) -> Result<Option<UserId>> {
    match user.role {
        Role::Admin => Ok(None),
        Role::Customer => Ok(Some(user.id)),
        Role::Staff => Err(AppError::Forbidden(
            "Not authorized as a customer".to_owned(),
        )),
    }
}

/// Create all `/api` routes.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .nest(
            "/users",
            auth::router(&config.rate_limit).merge(users::router()),
        )
        .nest("/products", products::router())
        .nest("/gallery", gallery::router())
        .nest("/upload", upload::router(config.upload.max_bytes))
        .nest("/settings", settings::router())
        .nest("/deliveries", deliveries::router())
        .nest("/inventory", inventory::router())
        .nest("/conversion", conversion::router())
        .nest("/dashboard", dashboard::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/orders", orders::router())
}
