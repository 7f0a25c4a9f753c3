//! # Wishlist Repository
//!
//! Saved products per user. A product appears at most once per user.

use tracing::debug;

use nutri_core::WishlistItem;

use crate::backend::StorageBackend;
use crate::database::MockDatabase;
use crate::error::StoreResult;

/// Repository for the wishlist table.
pub struct WishlistRepository<'a, B: StorageBackend> {
    db: &'a mut MockDatabase<B>,
}

impl<'a, B: StorageBackend> WishlistRepository<'a, B> {
    pub(crate) fn new(db: &'a mut MockDatabase<B>) -> Self {
        WishlistRepository { db }
    }

    pub fn items(&self, user_id: &str) -> Vec<WishlistItem> {
        self.db
            .tables
            .wishlist_items
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn contains(&self, user_id: &str, product_id: &str) -> bool {
        self.db
            .tables
            .wishlist_items
            .iter()
            .any(|w| w.user_id == user_id && w.product_id == product_id)
    }

    /// Saves the product. An existing row is returned unchanged.
    pub fn add(&mut self, user_id: &str, product_id: &str) -> StoreResult<WishlistItem> {
        if let Some(existing) = self
            .db
            .tables
            .wishlist_items
            .iter()
            .find(|w| w.user_id == user_id && w.product_id == product_id)
        {
            return Ok(existing.clone());
        }

        let item = WishlistItem {
            id: self.db.next_id(),
            user_id: user_id.to_string(),
            product_id: product_id.to_string(),
        };
        self.db.tables.wishlist_items.push(item.clone());
        self.db.persist()?;

        debug!(user_id = %user_id, product_id = %product_id, "Wishlist item added");
        Ok(item)
    }

    /// Removes the first matching row. Returns whether one was found.
    pub fn remove(&mut self, user_id: &str, product_id: &str) -> StoreResult<bool> {
        let Some(index) = self
            .db
            .tables
            .wishlist_items
            .iter()
            .position(|w| w.user_id == user_id && w.product_id == product_id)
        else {
            return Ok(false);
        };

        self.db.tables.wishlist_items.remove(index);
        self.db.persist()?;
        debug!(user_id = %user_id, product_id = %product_id, "Wishlist item removed");
        Ok(true)
    }

    /// Adds when absent, removes when present. Returns whether the product
    /// is saved afterwards.
    pub fn toggle(&mut self, user_id: &str, product_id: &str) -> StoreResult<bool> {
        if self.remove(user_id, product_id)? {
            Ok(false)
        } else {
            self.add(user_id, product_id)?;
            Ok(true)
        }
    }
}
