//! GraphQL operation definitions for the marketplace backend.
//!
//! Each operation pairs a hand-written query document with typed serde
//! variables and response structs. Variables serialize camelCase to match
//! the backend schema; responses deserialize through
//! `graphql_client::Response`.

use greenbasket_core::order::{FulfillmentChoice, IdempotencyKey, OrderDraft};
use greenbasket_core::types::{AddressId, StoreId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Address, PlacedOrder, Product, Store, UserError};

// =============================================================================
// Catalog
// =============================================================================

pub const GET_STORES: &str = "\
query GetStores {
  stores {
    id
    name
    address
  }
}";

#[derive(Debug, Serialize)]
pub struct GetStoresVariables {}

#[derive(Debug, Deserialize)]
pub struct GetStoresData {
    pub stores: Vec<Store>,
}

pub const GET_PRODUCTS: &str = "\
query GetProducts($storeId: ID!) {
  products(storeId: $storeId) {
    id
    name
    price
    imageUrl
    description
  }
}";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProductsVariables {
    pub store_id: StoreId,
}

#[derive(Debug, Deserialize)]
pub struct GetProductsData {
    pub products: Vec<Product>,
}

// =============================================================================
// Addresses
// =============================================================================

pub const GET_ADDRESSES: &str = "\
query GetAddresses($userId: ID!) {
  addresses(userId: $userId) {
    id
    address
    isPrimary
  }
}";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAddressesVariables {
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct GetAddressesData {
    pub addresses: Vec<Address>,
}

pub const CREATE_ADDRESS: &str = "\
mutation CreateAddress($userId: ID!, $address: String!) {
  addressCreate(userId: $userId, address: $address) {
    address {
      id
      address
      isPrimary
    }
    userErrors {
      message
      code
    }
  }
}";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressVariables {
    pub user_id: UserId,
    pub address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressData {
    pub address_create: AddressPayload,
}

pub const UPDATE_ADDRESS: &str = "\
mutation UpdateAddress($id: ID!, $address: String!) {
  addressUpdate(id: $id, address: $address) {
    address {
      id
      address
      isPrimary
    }
    userErrors {
      message
      code
    }
  }
}";

#[derive(Debug, Serialize)]
pub struct UpdateAddressVariables {
    pub id: AddressId,
    pub address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressData {
    pub address_update: AddressPayload,
}

pub const DELETE_ADDRESS: &str = "\
mutation DeleteAddress($id: ID!) {
  addressDelete(id: $id) {
    deletedId
    userErrors {
      message
      code
    }
  }
}";

#[derive(Debug, Serialize)]
pub struct DeleteAddressVariables {
    pub id: AddressId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAddressData {
    pub address_delete: DeleteAddressPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAddressPayload {
    pub deleted_id: Option<AddressId>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

pub const SET_PRIMARY_ADDRESS: &str = "\
mutation SetPrimaryAddress($id: ID!) {
  addressSetPrimary(id: $id) {
    address {
      id
      address
      isPrimary
    }
    userErrors {
      message
      code
    }
  }
}";

#[derive(Debug, Serialize)]
pub struct SetPrimaryAddressVariables {
    pub id: AddressId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPrimaryAddressData {
    pub address_set_primary: AddressPayload,
}

/// Shared payload shape for address mutations.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub address: Option<Address>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

// =============================================================================
// Orders
// =============================================================================

pub const CREATE_ORDER: &str = "\
mutation CreateOrder($input: OrderInput!) {
  orderCreate(input: $input) {
    order {
      id
      status
      totalAmount
      createdAt
    }
    userErrors {
      message
      code
    }
  }
}";

#[derive(Debug, Serialize)]
pub struct CreateOrderVariables {
    pub input: OrderInput,
}

/// Wire shape of the order-creation input.
///
/// Line items carry productId + quantity only; the backend re-prices them.
/// `client_calculated_amount` is the preview total, sent only in the
/// payment flow so the backend can verify what the customer was shown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub user_id: UserId,
    pub product_items: Vec<OrderItemInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_id: Option<AddressId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_slot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_amount: Option<Decimal>,
    pub idempotency_key: IdempotencyKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_calculated_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: greenbasket_core::types::ProductId,
    pub quantity: u32,
}

impl OrderInput {
    /// Assemble the wire input from a validated draft.
    #[must_use]
    pub fn from_draft(
        user_id: UserId,
        draft: &OrderDraft,
        idempotency_key: IdempotencyKey,
        client_calculated_amount: Option<Decimal>,
        payment_id: Option<String>,
    ) -> Self {
        let (address_id, pickup_slot_id) = match &draft.fulfillment {
            FulfillmentChoice::Delivery { address_id } => (Some(address_id.clone()), None),
            FulfillmentChoice::Pickup { slot_id } => (None, Some(slot_id.to_string())),
        };

        Self {
            user_id,
            product_items: draft
                .line_items
                .iter()
                .map(|item| OrderItemInput {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                })
                .collect(),
            address_id,
            pickup_slot_id,
            delivery_instructions: draft.delivery_instructions.clone(),
            tip_amount: draft.tip,
            idempotency_key,
            client_calculated_amount,
            payment_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderData {
    pub order_create: CreateOrderPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub order: Option<PlacedOrder>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}
