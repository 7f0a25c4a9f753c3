//! # Wishlist
//!
//! Saved products with set semantics: a product appears at most once.

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// The client-side wishlist.
///
/// Serializes as a bare array of products (the `wishlist` storage key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    pub fn new() -> Self {
        Wishlist::default()
    }

    /// Adds a product unless it is already saved. Returns whether it was added.
    pub fn add(&mut self, product: &Product) -> bool {
        if self.is_in_wishlist(&product.id) {
            return false;
        }
        self.items.push(product.clone());
        true
    }

    /// Removes a product. Returns whether it was present.
    pub fn remove(&mut self, product_id: &str) -> bool {
        match self.items.iter().position(|p| p.id == product_id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Adds the product if absent, removes it if present.
    ///
    /// Returns `true` when the product is saved afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.is_in_wishlist(&product.id) {
            self.remove(&product.id);
            false
        } else {
            self.items.push(product.clone());
            true
        }
    }

    pub fn is_in_wishlist(&self, product_id: &str) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewProduct;
    use chrono::Utc;
    use proptest::prelude::*;

    fn product(id: &str) -> Product {
        NewProduct {
            name: format!("Product {}", id),
            description: "test".to_string(),
            price: 10.0,
            category: "Vitamins".to_string(),
            ..NewProduct::default()
        }
        .into_product(id.to_string(), Utc::now())
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add(&product("1")));
        assert!(!wishlist.add(&product("1")));
        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.item_ids(), vec!["1"]);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.toggle(&product("2")));
        assert!(wishlist.is_in_wishlist("2"));
        assert!(!wishlist.toggle(&product("2")));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_remove_missing() {
        let mut wishlist = Wishlist::new();
        wishlist.add(&product("1"));
        assert!(!wishlist.remove("9"));
        assert_eq!(wishlist.len(), 1);
        wishlist.clear();
        assert!(wishlist.is_empty());
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_restores_membership(
            saved in proptest::collection::btree_set(0u8..20, 0..10),
            target in 0u8..20,
        ) {
            let mut wishlist = Wishlist::new();
            for id in &saved {
                wishlist.add(&product(&id.to_string()));
            }
            let before = wishlist.clone();

            let p = product(&target.to_string());
            wishlist.toggle(&p);
            wishlist.toggle(&p);

            let mut ids_before = before.item_ids();
            let mut ids_after = wishlist.item_ids();
            ids_before.sort_unstable();
            ids_after.sort_unstable();
            prop_assert_eq!(ids_before, ids_after);
        }
    }
}
