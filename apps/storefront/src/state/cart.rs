//! # Cart State
//!
//! The cart the header badge and cart drawer show, persisted under the
//! `cart` key after every change.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  UI Action                CartState               Cart Change           │
//! │  ─────────                ─────────               ───────────           │
//! │                                                                         │
//! │  Add to cart ────────────► add_item() ──────────► merge or push line   │
//! │                                                                         │
//! │  Change quantity ────────► update_quantity() ───► qty = n (≤0 removes) │
//! │                                                                         │
//! │  Click remove ───────────► remove_item() ───────► line dropped         │
//! │                                                                         │
//! │  Order placed ───────────► clear_cart() ────────► no lines             │
//! │                                                                         │
//! │  Every write: lock, change, save "cart", unlock.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use nutri_core::checkout::{OrderSummary, PricingRules};
use nutri_core::{Cart, CartLine, CoreResult, Product};
use nutri_store::StorageBackend;

use super::{restore, save};

/// Storage key of the client cart.
pub const CART_KEY: &str = "cart";

/// Shared, persisted cart.
///
/// Clones share the same cart.
#[derive(Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
    storage: Arc<dyn StorageBackend>,
}

impl CartState {
    /// Restores the saved cart, or starts empty.
    pub fn load(storage: Arc<dyn StorageBackend>) -> Self {
        let cart: Cart = restore(storage.as_ref(), CART_KEY).unwrap_or_default();
        debug!(lines = cart.len(), "Cart restored");
        CartState {
            cart: Arc::new(Mutex::new(cart)),
            storage,
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart, then saves it.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut cart);
        save(self.storage.as_ref(), CART_KEY, &*cart);
        result
    }

    pub fn add_item(&self, product: &Product, quantity: i64) -> CoreResult<()> {
        self.with_cart_mut(|cart| cart.add_item(product, quantity))
    }

    /// Returns whether the product was in the cart.
    pub fn remove_item(&self, product_id: &str) -> bool {
        self.with_cart_mut(|cart| cart.remove_item(product_id))
    }

    /// Zero or less removes the line.
    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> CoreResult<bool> {
        self.with_cart_mut(|cart| cart.update_quantity(product_id, quantity))
    }

    pub fn clear_cart(&self) {
        self.with_cart_mut(Cart::clear)
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.with_cart(|cart| cart.lines().to_vec())
    }

    /// A copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    pub fn is_empty(&self) -> bool {
        self.with_cart(Cart::is_empty)
    }

    pub fn total_items(&self) -> i64 {
        self.with_cart(Cart::total_items)
    }

    pub fn subtotal(&self) -> f64 {
        self.with_cart(Cart::subtotal)
    }

    pub fn summary(&self, rules: &PricingRules) -> OrderSummary {
        self.with_cart(|cart| OrderSummary::compute(cart, rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nutri_core::NewProduct;
    use nutri_store::MemoryStorage;

    fn whey() -> Product {
        NewProduct {
            name: "Organic Whey Protein".to_string(),
            description: "Grass-fed whey".to_string(),
            price: 49.99,
            discount_percentage: Some(10.0),
            category: "Supplements".to_string(),
            stock: 50,
            ..NewProduct::default()
        }
        .into_product("1".to_string(), Utc::now())
    }

    fn fish_oil() -> Product {
        NewProduct {
            name: "Omega-3 Fish Oil".to_string(),
            description: "Triple strength".to_string(),
            price: 29.99,
            category: "Supplements".to_string(),
            stock: 75,
            ..NewProduct::default()
        }
        .into_product("3".to_string(), Utc::now())
    }

    #[test]
    fn test_add_twice_is_one_line() {
        let state = CartState::load(Arc::new(MemoryStorage::new()));
        state.add_item(&whey(), 1).unwrap();
        state.add_item(&whey(), 1).unwrap();

        let lines = state.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(state.total_items(), 2);
        assert!((state.subtotal() - 89.982).abs() < 1e-9);
    }

    #[test]
    fn test_every_change_is_saved() {
        let storage = MemoryStorage::new();
        let state = CartState::load(Arc::new(storage.clone()));

        state.add_item(&whey(), 2).unwrap();
        state.add_item(&fish_oil(), 1).unwrap();
        state.update_quantity("3", 0).unwrap();

        let reloaded = CartState::load(Arc::new(storage.clone()));
        assert_eq!(reloaded.snapshot(), state.snapshot());
        assert_eq!(reloaded.total_items(), 2);

        state.clear_cart();
        assert!(CartState::load(Arc::new(storage)).is_empty());
    }

    #[test]
    fn test_remove_missing_line_changes_nothing() {
        let state = CartState::load(Arc::new(MemoryStorage::new()));
        state.add_item(&whey(), 1).unwrap();

        assert!(!state.remove_item("999"));
        assert_eq!(state.lines().len(), 1);
        assert!(state.remove_item("1"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_corrupt_saved_cart_starts_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_KEY, "{not json").unwrap();

        let state = CartState::load(Arc::new(storage));
        assert!(state.is_empty());
    }

    #[test]
    fn test_summary_uses_rules() {
        let state = CartState::load(Arc::new(MemoryStorage::new()));
        state.add_item(&fish_oil(), 2).unwrap();

        let summary = state.summary(&PricingRules::default());
        assert_eq!(summary.subtotal.cents(), 5998);
        assert_eq!(summary.shipping.cents(), 999);
        assert_eq!(summary.tax.cents(), 480);
        assert_eq!(summary.total.cents(), 7477);
    }
}
