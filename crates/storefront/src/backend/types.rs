//! Domain types returned by the marketplace backend.
//!
//! Wire structs deserialize the backend's camelCase GraphQL fields directly;
//! monetary amounts arrive as decimal strings and parse into `Decimal` via
//! the `serde-with-str` feature.

use chrono::{DateTime, Utc};
use greenbasket_core::types::{AddressId, OrderId, ProductId, StoreId};
use greenbasket_core::{CartProduct, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A store in the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// A product in a store's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in dollars.
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
        }
    }
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    /// Free-text address line.
    pub address: String,
    pub is_primary: bool,
}

/// An order as confirmed by the backend.
///
/// `total_amount` is the authoritative order total - the storefront's
/// pricing preview never overrides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A user error attached to a mutation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_camel_case() {
        let json = r#"{
            "id": "prod-1",
            "name": "Organic Apples",
            "price": "3.50",
            "imageUrl": "https://cdn.example.com/apples.jpg"
        }"#;

        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.id, ProductId::new("prod-1"));
        assert_eq!(product.price, "3.50".parse::<Decimal>().expect("decimal"));
        assert!(product.image_url.is_some());
        assert!(product.description.is_none());
    }

    #[test]
    fn test_placed_order_deserializes_status_and_amount() {
        let json = r#"{"id": "order-9", "status": "CONFIRMED", "totalAmount": "35.00"}"#;

        let order: PlacedOrder = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(
            order.total_amount,
            "35.00".parse::<Decimal>().expect("decimal")
        );
        // createdAt is optional on the wire
        assert!(order.created_at.is_none());
    }

    #[test]
    fn test_placed_order_parses_created_at() {
        let json = r#"{
            "id": "order-9",
            "status": "PENDING",
            "totalAmount": "12.50",
            "createdAt": "2026-08-27T15:04:05Z"
        }"#;

        let order: PlacedOrder = serde_json::from_str(json).expect("deserialize");
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_cart_product_conversion() {
        let product = Product {
            id: ProductId::new("prod-1"),
            name: "Milk".to_string(),
            price: "2.25".parse().expect("decimal"),
            image_url: None,
            description: None,
        };

        let cart_product = CartProduct::from(&product);
        assert_eq!(cart_product.product_id, product.id);
        assert_eq!(cart_product.unit_price, product.price);
    }
}
