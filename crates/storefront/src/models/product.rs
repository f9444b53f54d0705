//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use yadukul_core::{Price, ProductCategory, ProductId};

use super::{ValidationError, require_text};

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Largest unit price the `NUMERIC(10, 2)` price column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
    pub price: Price,
    pub image_url: String,
    pub origin: String,
    pub nutrition: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/products` and `PUT /api/products/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub category: ProductCategory,
    pub price: Price,
    pub image_url: String,
    pub origin: String,
    pub nutrition: String,
    pub rating: Option<f64>,
}

/// Validated product fields, ready to write.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub category: ProductCategory,
    pub price: Price,
    pub image_url: String,
    pub origin: String,
    pub nutrition: String,
    pub rating: f64,
}

impl ProductInput {
    /// Validate the product fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a text field is blank, the price is above
    /// `MAX_PRICE`, or the rating is outside 0-5.
    pub fn validate(&self) -> Result<ProductDraft, ValidationError> {
        if self.price.amount() > MAX_PRICE {
            return Err(ValidationError(format!("price must be at most {MAX_PRICE}")));
        }
        let rating = self.rating.unwrap_or(0.0);
        if !(0.0..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::new("rating must be between 0 and 5"));
        }

        Ok(ProductDraft {
            name: require_text("name", &self.name)?,
            category: self.category,
            price: self.price,
            image_url: require_text("imageUrl", &self.image_url)?,
            origin: require_text("origin", &self.origin)?,
            nutrition: require_text("nutrition", &self.nutrition)?,
            rating,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input_json() -> serde_json::Value {
        serde_json::json!({
            "name": "A2 Cow Milk",
            "category": "Milk",
            "price": 58,
            "imageUrl": "/uploads/milk.jpg",
            "origin": "Gir cows, Mathura",
            "nutrition": "3.5% fat"
        })
    }

    #[test]
    fn test_product_input_defaults_rating() {
        let input: ProductInput = serde_json::from_value(input_json()).unwrap();
        let draft = input.validate().unwrap();
        assert!((draft.rating - 0.0).abs() < f64::EPSILON);
        assert_eq!(draft.category, ProductCategory::Milk);
    }

    #[test]
    fn test_product_input_rejects_blank_fields() {
        let mut json = input_json();
        json["origin"] = serde_json::json!("  ");
        let input: ProductInput = serde_json::from_value(json).unwrap();
        assert_eq!(
            input.validate(),
            Err(ValidationError::new("origin is required"))
        );
    }

    #[test]
    fn test_product_input_rejects_bad_rating() {
        let mut json = input_json();
        json["rating"] = serde_json::json!(5.5);
        let input: ProductInput = serde_json::from_value(json).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_product_input_caps_price() {
        let mut json = input_json();
        json["price"] = serde_json::json!(99_999_999.99);
        let input: ProductInput = serde_json::from_value(json.clone()).unwrap();
        assert!(input.validate().is_ok());

        json["price"] = serde_json::json!(1_000_000_000);
        let input: ProductInput = serde_json::from_value(json).unwrap();
        assert_eq!(
            input.validate(),
            Err(ValidationError::new("price must be at most 99999999.99"))
        );
    }

    #[test]
    fn test_max_price_matches_column() {
        assert_eq!(MAX_PRICE, Decimal::new(9_999_999_999, 2));
    }

    #[test]
    fn test_product_input_rejects_negative_price() {
        let mut json = input_json();
        json["price"] = serde_json::json!(-1);
        assert!(serde_json::from_value::<ProductInput>(json).is_err());
    }
}
