//! Session-held storefront state.
//!
//! The cart and the shopper's selections live in the session and nowhere
//! else - there is no server-side cart entity. Everything here is typed
//! access over `tower_sessions::Session`.

use tower_sessions::Session;

use greenbasket_core::Cart;
use greenbasket_core::order::IdempotencyKey;
use greenbasket_core::types::{AddressId, StoreId};

/// Session keys for storefront state.
pub mod keys {
    /// Key for the session cart.
    pub const CART: &str = "cart";

    /// Key for the currently selected store.
    pub const SELECTED_STORE: &str = "selected_store";

    /// Key for the currently selected delivery address.
    pub const SELECTED_ADDRESS: &str = "selected_address";

    /// Key for the in-flight checkout attempt's idempotency key.
    pub const CHECKOUT_ATTEMPT: &str = "checkout_attempt";
}

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Load the session cart, defaulting to empty.
pub async fn load_cart(session: &Session) -> SessionResult<Cart> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Persist the cart back to the session.
pub async fn save_cart(session: &Session, cart: &Cart) -> SessionResult<()> {
    session.insert(keys::CART, cart).await
}

/// Get the currently selected store, if any.
pub async fn selected_store(session: &Session) -> SessionResult<Option<StoreId>> {
    session.get::<StoreId>(keys::SELECTED_STORE).await
}

/// Select the active store.
///
/// Products are store-scoped, so switching to a different store clears the
/// cart. Re-selecting the current store leaves the cart alone.
pub async fn select_store(session: &Session, store_id: StoreId) -> SessionResult<()> {
    let previous = selected_store(session).await?;
    if previous.as_ref() != Some(&store_id) {
        save_cart(session, &Cart::new()).await?;
    }
    session.insert(keys::SELECTED_STORE, store_id).await
}

/// Get the currently selected delivery address, if any.
pub async fn selected_address(session: &Session) -> SessionResult<Option<AddressId>> {
    session.get::<AddressId>(keys::SELECTED_ADDRESS).await
}

/// Select the delivery address.
pub async fn select_address(session: &Session, address_id: AddressId) -> SessionResult<()> {
    session.insert(keys::SELECTED_ADDRESS, address_id).await
}

/// Get the idempotency key for the current checkout attempt, creating one
/// on first use.
///
/// The key stays in the session across failed submissions so a manual
/// retry reuses it; [`finish_checkout_attempt`] clears it once an order is
/// placed.
pub async fn checkout_attempt(session: &Session) -> SessionResult<IdempotencyKey> {
    if let Some(key) = session
        .get::<IdempotencyKey>(keys::CHECKOUT_ATTEMPT)
        .await?
    {
        return Ok(key);
    }

    let key = IdempotencyKey::generate();
    session.insert(keys::CHECKOUT_ATTEMPT, key).await?;
    Ok(key)
}

/// Clear the checkout attempt and the cart after a successful order.
pub async fn finish_checkout_attempt(session: &Session) -> SessionResult<()> {
    session.remove::<IdempotencyKey>(keys::CHECKOUT_ATTEMPT).await?;
    save_cart(session, &Cart::new()).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use greenbasket_core::CartProduct;
    use greenbasket_core::types::ProductId;

    use super::*;

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    async fn cart_with_one_item(session: &Session) -> Cart {
        let mut cart = load_cart(session).await.expect("load");
        cart.add(CartProduct {
            product_id: ProductId::new("apples"),
            name: "Apples".to_owned(),
            unit_price: "3.50".parse().expect("decimal"),
        });
        save_cart(session, &cart).await.expect("save");
        cart
    }

    #[tokio::test]
    async fn test_cart_defaults_to_empty() {
        let session = test_session();
        let cart = load_cart(&session).await.expect("load");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_switching_stores_clears_the_cart() {
        let session = test_session();
        select_store(&session, StoreId::new("store-1"))
            .await
            .expect("select");
        cart_with_one_item(&session).await;

        select_store(&session, StoreId::new("store-2"))
            .await
            .expect("select");

        let cart = load_cart(&session).await.expect("load");
        assert!(cart.is_empty());
        assert_eq!(
            selected_store(&session).await.expect("get"),
            Some(StoreId::new("store-2"))
        );
    }

    #[tokio::test]
    async fn test_reselecting_the_same_store_keeps_the_cart() {
        let session = test_session();
        select_store(&session, StoreId::new("store-1"))
            .await
            .expect("select");
        let before = cart_with_one_item(&session).await;

        select_store(&session, StoreId::new("store-1"))
            .await
            .expect("select");

        let cart = load_cart(&session).await.expect("load");
        assert_eq!(cart, before);
    }

    #[tokio::test]
    async fn test_checkout_attempt_key_is_stable_until_finished() {
        let session = test_session();

        let first = checkout_attempt(&session).await.expect("key");
        let second = checkout_attempt(&session).await.expect("key");
        assert_eq!(first, second);

        cart_with_one_item(&session).await;
        finish_checkout_attempt(&session).await.expect("finish");

        // A fresh attempt gets a fresh key and the cart is gone
        let third = checkout_attempt(&session).await.expect("key");
        assert_ne!(third, first);
        assert!(load_cart(&session).await.expect("load").is_empty());
    }
}
