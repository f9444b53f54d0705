//! Inventory domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use yadukul_core::{InventoryItemId, InventoryKind, InventoryUnit};

use super::{ValidationError, require_text};

/// A stock line on the dairy floor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "_id")]
    pub id: InventoryItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InventoryKind,
    pub quantity: f64,
    pub unit: InventoryUnit,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/inventory`.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryItemInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InventoryKind,
    pub quantity: f64,
    pub unit: InventoryUnit,
}

impl InventoryItemInput {
    /// Validate the stock line.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank name or a negative quantity.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_text("name", &self.name)?,
            kind: self.kind,
            quantity: validate_quantity(self.quantity)?,
            unit: self.unit,
        })
    }
}

/// Body of `PUT /api/inventory/{id}`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InventoryQuantityInput {
    pub quantity: f64,
}

impl InventoryQuantityInput {
    /// Validate the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a negative or non-finite quantity.
    pub fn validate(self) -> Result<f64, ValidationError> {
        validate_quantity(self.quantity)
    }
}

fn validate_quantity(quantity: f64) -> Result<f64, ValidationError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(ValidationError::new("quantity must be zero or more"));
    }
    Ok(quantity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_input_uses_type_key() {
        let input: InventoryItemInput = serde_json::from_value(serde_json::json!({
            "name": "Cow Milk",
            "type": "Raw Material",
            "quantity": 120.5,
            "unit": "Liters"
        }))
        .unwrap();
        let item = input.validate().unwrap();
        assert_eq!(item.kind, InventoryKind::RawMaterial);
        assert_eq!(item.unit, InventoryUnit::Liters);
    }

    #[test]
    fn test_quantity_validation() {
        assert!(InventoryQuantityInput { quantity: 0.0 }.validate().is_ok());
        assert!(InventoryQuantityInput { quantity: -2.0 }.validate().is_err());
        assert!(
            InventoryQuantityInput {
                quantity: f64::NAN
            }
            .validate()
            .is_err()
        );
    }
}
