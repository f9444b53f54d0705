//! Milk intake and conversion log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use yadukul_core::{ConversionLogId, MilkIntakeLogId, MilkType, OutputUnit};

use super::{ValidationError, require_text};

/// Raw milk received at the dairy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkIntakeLog {
    #[serde(rename = "_id")]
    pub id: MilkIntakeLogId,
    #[serde(rename = "type")]
    pub milk_type: MilkType,
    pub quantity_liters: f64,
    pub date: DateTime<Utc>,
}

/// Body of `POST /api/conversion/intake`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkIntakeInput {
    #[serde(rename = "type")]
    pub milk_type: MilkType,
    pub quantity_liters: f64,
}

impl MilkIntakeInput {
    /// Validate the intake.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` unless the quantity is a positive number.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if !self.quantity_liters.is_finite() || self.quantity_liters <= 0.0 {
            return Err(ValidationError::new("quantityLiters must be greater than 0"));
        }
        Ok(self)
    }
}

/// Litres of each milk consumed by a conversion batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkUsed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cow_liters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffalo_liters: Option<f64>,
}

impl MilkUsed {
    /// Total litres across both milk types.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cow_liters.unwrap_or(0.0) + self.buffalo_liters.unwrap_or(0.0)
    }

    fn validate(self) -> Result<Self, ValidationError> {
        for liters in [self.cow_liters, self.buffalo_liters].into_iter().flatten() {
            if !liters.is_finite() || liters < 0.0 {
                return Err(ValidationError::new("milkUsed amounts must be zero or more"));
            }
        }
        if self.total() <= 0.0 {
            return Err(ValidationError::new("milkUsed must include some milk"));
        }
        Ok(self)
    }
}

/// A batch of raw milk turned into a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionLog {
    #[serde(rename = "_id")]
    pub id: ConversionLogId,
    pub product_name: String,
    pub quantity_produced: f64,
    pub unit: OutputUnit,
    pub milk_used: MilkUsed,
    pub date: DateTime<Utc>,
}

/// Body of `POST /api/conversion/logs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionInput {
    pub product_name: String,
    pub quantity_produced: f64,
    pub unit: OutputUnit,
    pub milk_used: MilkUsed,
}

impl ConversionInput {
    /// Validate the batch.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank product name, a non-positive
    /// output, or milk amounts that are negative or sum to nothing.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        if !self.quantity_produced.is_finite() || self.quantity_produced <= 0.0 {
            return Err(ValidationError::new("quantityProduced must be greater than 0"));
        }
        Ok(Self {
            product_name: require_text("productName", &self.product_name)?,
            quantity_produced: self.quantity_produced,
            unit: self.unit,
            milk_used: self.milk_used.validate()?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn conversion(milk_used: serde_json::Value) -> ConversionInput {
        serde_json::from_value(serde_json::json!({
            "productName": "Paneer",
            "quantityProduced": 4.5,
            "unit": "kg",
            "milkUsed": milk_used
        }))
        .unwrap()
    }

    #[test]
    fn test_conversion_accepts_single_milk_source() {
        let input = conversion(serde_json::json!({ "buffaloLiters": 25 }));
        let valid = input.validate().unwrap();
        assert!((valid.milk_used.total() - 25.0).abs() < f64::EPSILON);
        assert_eq!(valid.milk_used.cow_liters, None);
    }

    #[test]
    fn test_conversion_rejects_empty_milk_used() {
        assert!(conversion(serde_json::json!({})).validate().is_err());
        assert!(
            conversion(serde_json::json!({ "cowLiters": 0, "buffaloLiters": 0 }))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_conversion_rejects_negative_milk() {
        let input = conversion(serde_json::json!({ "cowLiters": 30, "buffaloLiters": -5 }));
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_intake_requires_positive_quantity() {
        let input = MilkIntakeInput {
            milk_type: MilkType::Cow,
            quantity_liters: 0.0,
        };
        assert!(input.validate().is_err());

        let input: MilkIntakeInput =
            serde_json::from_value(serde_json::json!({ "type": "Buffalo", "quantityLiters": 80 }))
                .unwrap();
        assert_eq!(input.validate().unwrap().milk_type, MilkType::Buffalo);
    }
}
