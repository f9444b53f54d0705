//! Order domain types and pricing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use yadukul_core::{OrderId, OrderStatus, Price, ProductId, UserId};

use super::ValidationError;
use super::product::Product;

/// Rupees spent per loyalty point earned.
pub const RUPEES_PER_LOYALTY_POINT: i64 = 100;

/// Largest order total the `NUMERIC(12, 2)` total column holds.
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// One line of an order, priced when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Price,
}

/// A customer order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub customer_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

/// A requested order line.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInput {
    pub items: Vec<OrderLineInput>,
}

impl OrderInput {
    /// Check the cart shape before any product lookup.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty cart or a zero quantity.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::new("Order must contain at least one item"));
        }
        if self.items.iter().any(|line| line.quantity == 0) {
            return Err(ValidationError::new("quantity must be at least 1"));
        }
        Ok(())
    }

    /// Distinct product ids referenced by the cart.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = Vec::with_capacity(self.items.len());
        for line in &self.items {
            if !ids.contains(&line.product_id) {
                ids.push(line.product_id);
            }
        }
        ids
    }

    /// Price every line from the catalog and total the order.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a line references a product that is not in
    /// `catalog`, or the total exceeds `MAX_ORDER_TOTAL`.
    pub fn price(
        &self,
        catalog: &HashMap<ProductId, Product>,
    ) -> Result<(Vec<OrderItem>, Price), ValidationError> {
        let items = self
            .items
            .iter()
            .map(|line| {
                let product = catalog.get(&line.product_id).ok_or_else(|| {
                    ValidationError(format!("Product {} not found", line.product_id))
                })?;
                Ok(OrderItem {
                    product_id: product.id,
                    name: product.name.clone(),
                    quantity: line.quantity,
                    price: product.price,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let total: Price = items.iter().map(|item| item.price.times(item.quantity)).sum();
        if total.amount() > MAX_ORDER_TOTAL {
            return Err(ValidationError(format!(
                "Order total must be at most {MAX_ORDER_TOTAL}"
            )));
        }
        Ok((items, total))
    }
}

/// Loyalty points earned by paying `total`: one per full hundred rupees.
#[must_use]
pub fn loyalty_points_for(total: Price) -> i32 {
    (total.amount() / Decimal::from(RUPEES_PER_LOYALTY_POINT))
        .floor()
        .to_i32()
        .unwrap_or(i32::MAX)
}

/// Body of `GET /api/orders/balance`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Balance {
    pub outstanding: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use yadukul_core::ProductCategory;

    use super::*;

    fn product(id: i32, name: &str, rupees: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            category: ProductCategory::Milk,
            price: Price::new(Decimal::from(rupees)).unwrap(),
            image_url: String::new(),
            origin: String::new(),
            nutrition: String::new(),
            rating: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog() -> HashMap<ProductId, Product> {
        [product(1, "A2 Cow Milk", 58), product(2, "Malai Paneer", 120)]
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    }

    fn cart(lines: &[(i32, u32)]) -> OrderInput {
        OrderInput {
            items: lines
                .iter()
                .map(|&(id, quantity)| OrderLineInput {
                    product_id: ProductId::new(id),
                    quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        let (items, total) = cart(&[(1, 10), (2, 1)]).price(&catalog()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "A2 Cow Milk");
        assert_eq!(total.amount(), Decimal::from(700));
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let err = cart(&[(1, 1), (9, 1)]).price(&catalog()).unwrap_err();
        assert_eq!(err, ValidationError::new("Product 9 not found"));
    }

    #[test]
    fn test_total_above_column_limit_is_rejected() {
        let err = cart(&[(1, 1_000_000_000)]).price(&catalog()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::new("Order total must be at most 9999999999.99")
        );
        assert_eq!(MAX_ORDER_TOTAL, Decimal::new(999_999_999_999, 2));

        assert!(cart(&[(2, 83_333_333)]).price(&catalog()).is_ok());
    }

    #[test]
    fn test_validate_cart_shape() {
        assert!(cart(&[]).validate().is_err());
        assert!(cart(&[(1, 0)]).validate().is_err());
        assert!(cart(&[(1, 2)]).validate().is_ok());
    }

    #[test]
    fn test_product_ids_are_distinct() {
        let ids = cart(&[(1, 1), (2, 1), (1, 3)]).product_ids();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2)]);
    }

    #[test]
    fn test_loyalty_points_round_down() {
        let points = |rupees: i64| loyalty_points_for(Price::new(Decimal::from(rupees)).unwrap());
        assert_eq!(points(0), 0);
        assert_eq!(points(99), 0);
        assert_eq!(points(100), 1);
        assert_eq!(points(1250), 12);
    }

    #[test]
    fn test_order_item_json_shape() {
        let item = OrderItem {
            product_id: ProductId::new(1),
            name: "A2 Cow Milk".to_owned(),
            quantity: 2,
            price: Price::new(Decimal::from(58)).unwrap(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], 1);
        assert_eq!(json["price"], 58.0);
    }
}
