//! Delivery domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use yadukul_core::{DeliveryId, DeliveryStatus, Role, UserId};

use super::{ValidationError, optional_text, require_text};

/// A delivery assigned to a staff member.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    #[serde(rename = "_id")]
    pub id: DeliveryId,
    pub customer_id: UserId,
    pub staff_id: UserId,
    pub customer_name: String,
    pub address: String,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Delivery {
    /// Whether `user_id` acting as `role` may update this delivery.
    #[must_use]
    pub fn is_managed_by(&self, user_id: UserId, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Staff => self.staff_id == user_id,
            Role::Customer => false,
        }
    }
}

/// Which deliveries a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryScope {
    All,
    AssignedTo(UserId),
    OrderedBy(UserId),
}

impl DeliveryScope {
    /// Scope for a caller: admins see everything, staff their assignments,
    /// customers their own deliveries.
    #[must_use]
    pub const fn for_caller(user_id: UserId, role: Role) -> Self {
        match role {
            Role::Admin => Self::All,
            Role::Staff => Self::AssignedTo(user_id),
            Role::Customer => Self::OrderedBy(user_id),
        }
    }
}

/// Query string of `GET /api/deliveries`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DeliveryQuery {
    /// Only `Pending` and `Out for Delivery`.
    #[serde(default)]
    pub active: bool,
}

/// Body of `POST /api/deliveries`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInput {
    pub customer_id: UserId,
    pub staff_id: UserId,
    pub address: String,
    pub customer_name: Option<String>,
}

/// A validated delivery assignment. `customer_name` is filled from the
/// customer record when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDelivery {
    pub customer_id: UserId,
    pub staff_id: UserId,
    pub address: String,
    pub customer_name: Option<String>,
}

impl DeliveryInput {
    /// Validate the assignment.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the address is blank.
    pub fn validate(&self) -> Result<NewDelivery, ValidationError> {
        Ok(NewDelivery {
            customer_id: self.customer_id,
            staff_id: self.staff_id,
            address: require_text("address", &self.address)?,
            customer_name: optional_text(self.customer_name.as_deref()),
        })
    }
}

/// Body of `PUT /api/deliveries/{id}/status`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeliveryStatusInput {
    pub status: DeliveryStatus,
}

/// Body of `PUT /api/deliveries/{id}/proof`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryProofInput {
    pub proof_image_url: String,
}

impl DeliveryProofInput {
    /// The trimmed proof URL.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the URL is blank.
    pub fn validate(&self) -> Result<String, ValidationError> {
        require_text("proofImageUrl", &self.proof_image_url)
    }
}
