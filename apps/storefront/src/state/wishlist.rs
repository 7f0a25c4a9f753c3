//! # Wishlist State
//!
//! Saved products behind the heart buttons, persisted under the `wishlist`
//! key after every change.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use nutri_core::{Product, Wishlist};
use nutri_store::StorageBackend;

use super::{restore, save};

/// Storage key of the client wishlist.
pub const WISHLIST_KEY: &str = "wishlist";

/// Shared, persisted wishlist. Clones share the same list.
#[derive(Clone)]
pub struct WishlistState {
    wishlist: Arc<Mutex<Wishlist>>,
    storage: Arc<dyn StorageBackend>,
}

impl WishlistState {
    /// Restores the saved wishlist, or starts empty.
    pub fn load(storage: Arc<dyn StorageBackend>) -> Self {
        let wishlist: Wishlist = restore(storage.as_ref(), WISHLIST_KEY).unwrap_or_default();
        debug!(items = wishlist.len(), "Wishlist restored");
        WishlistState {
            wishlist: Arc::new(Mutex::new(wishlist)),
            storage,
        }
    }

    fn with_wishlist<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Wishlist) -> R,
    {
        let wishlist = self.wishlist.lock().unwrap_or_else(PoisonError::into_inner);
        f(&wishlist)
    }

    fn with_wishlist_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Wishlist) -> R,
    {
        let mut wishlist = self.wishlist.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut wishlist);
        save(self.storage.as_ref(), WISHLIST_KEY, &*wishlist);
        result
    }

    /// No-op for a product already saved. Returns whether it was added.
    pub fn add_item(&self, product: &Product) -> bool {
        self.with_wishlist_mut(|w| w.add(product))
    }

    pub fn remove_item(&self, product_id: &str) -> bool {
        self.with_wishlist_mut(|w| w.remove(product_id))
    }

    /// Adds when absent, removes when present. Returns whether the product
    /// is saved afterwards.
    pub fn toggle_item(&self, product: &Product) -> bool {
        self.with_wishlist_mut(|w| w.toggle(product))
    }

    pub fn is_in_wishlist(&self, product_id: &str) -> bool {
        self.with_wishlist(|w| w.is_in_wishlist(product_id))
    }

    pub fn items(&self) -> Vec<Product> {
        self.with_wishlist(|w| w.items().to_vec())
    }

    pub fn len(&self) -> usize {
        self.with_wishlist(Wishlist::len)
    }

    pub fn is_empty(&self) -> bool {
        self.with_wishlist(Wishlist::is_empty)
    }

    pub fn clear_wishlist(&self) {
        self.with_wishlist_mut(Wishlist::clear)
    }
}
