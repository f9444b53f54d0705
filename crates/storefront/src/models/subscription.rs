//! Subscription domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use yadukul_core::{
    ProductId, SubscriptionFrequency, SubscriptionId, SubscriptionStatus, UserId,
};

use super::{ValidationError, require_text};

/// A recurring delivery of one product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: SubscriptionId,
    pub customer_id: UserId,
    pub product_id: ProductId,
    pub product_name: String,
    /// Free-form amount per delivery, e.g. `"1 L"`.
    pub quantity: String,
    pub frequency: SubscriptionFrequency,
    pub next_delivery: NaiveDate,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/subscriptions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInput {
    pub product_id: ProductId,
    pub quantity: String,
    pub frequency: SubscriptionFrequency,
}

impl SubscriptionInput {
    /// Validate the request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the quantity is blank.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            product_id: self.product_id,
            quantity: require_text("quantity", &self.quantity)?,
            frequency: self.frequency,
        })
    }
}

/// What `PUT /api/subscriptions/{id}` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionAction {
    /// Flip between `Active` and `Paused`.
    Toggle,
    /// Remove the subscription.
    Cancel,
}

/// Body of `PUT /api/subscriptions/{id}`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SubscriptionActionInput {
    pub action: SubscriptionAction,
}

/// First delivery date for a subscription started on `today`.
#[must_use]
pub fn first_delivery_after(today: NaiveDate) -> NaiveDate {
    today.succ_opt().unwrap_or(today)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_delivery_is_tomorrow() {
        let today = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(
            first_delivery_after(today),
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_action_parses() {
        let input: SubscriptionActionInput =
            serde_json::from_value(serde_json::json!({ "action": "toggle" })).unwrap();
        assert_eq!(input.action, SubscriptionAction::Toggle);
        assert!(
            serde_json::from_value::<SubscriptionActionInput>(serde_json::json!({ "action": "skip" }))
                .is_err()
        );
    }

    #[test]
    fn test_input_rejects_blank_quantity() {
        let input: SubscriptionInput = serde_json::from_value(serde_json::json!({
            "productId": 1,
            "quantity": " ",
            "frequency": "Alternate Days"
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }
}
