//! # Cart Repository
//!
//! Server-side cart rows: one row per (user, product), quantity merges on
//! repeat add.

use tracing::debug;

use nutri_core::validation::validate_quantity;
use nutri_core::CartItem;

use crate::backend::StorageBackend;
use crate::database::MockDatabase;
use crate::error::StoreResult;

/// Repository for the cart table.
pub struct CartRepository<'a, B: StorageBackend> {
    db: &'a mut MockDatabase<B>,
}

impl<'a, B: StorageBackend> CartRepository<'a, B> {
    pub(crate) fn new(db: &'a mut MockDatabase<B>) -> Self {
        CartRepository { db }
    }

    /// The user's rows in insertion order.
    pub fn items(&self, user_id: &str) -> Vec<CartItem> {
        self.db
            .tables
            .cart_items
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Adds `quantity` of a product, merging into an existing row.
    ///
    /// Returns the resulting row. The product id is not checked against the
    /// catalog.
    pub fn add(&mut self, user_id: &str, product_id: &str, quantity: i64) -> StoreResult<CartItem> {
        validate_quantity(quantity)?;

        let existing = self
            .db
            .tables
            .cart_items
            .iter_mut()
            .find(|c| c.user_id == user_id && c.product_id == product_id);

        let item = match existing {
            Some(row) => {
                row.quantity += quantity;
                row.clone()
            }
            None => {
                let row = CartItem {
                    id: self.db.next_id(),
                    user_id: user_id.to_string(),
                    product_id: product_id.to_string(),
                    quantity,
                };
                self.db.tables.cart_items.push(row.clone());
                row
            }
        };

        self.db.persist()?;
        debug!(user_id = %user_id, product_id = %product_id, quantity = item.quantity, "Cart row saved");
        Ok(item)
    }

    /// Sets the row's quantity; zero or less removes the row.
    ///
    /// Returns the updated row, or `None` when it was removed or never
    /// existed.
    pub fn update_quantity(
        &mut self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> StoreResult<Option<CartItem>> {
        if quantity <= 0 {
            self.remove(user_id, product_id)?;
            return Ok(None);
        }
        validate_quantity(quantity)?;

        let Some(row) = self
            .db
            .tables
            .cart_items
            .iter_mut()
            .find(|c| c.user_id == user_id && c.product_id == product_id)
        else {
            return Ok(None);
        };
        row.quantity = quantity;
        let updated = row.clone();

        self.db.persist()?;
        Ok(Some(updated))
    }

    /// Removes the first matching row. Returns whether one was found.
    pub fn remove(&mut self, user_id: &str, product_id: &str) -> StoreResult<bool> {
        let Some(index) = self
            .db
            .tables
            .cart_items
            .iter()
            .position(|c| c.user_id == user_id && c.product_id == product_id)
        else {
            return Ok(false);
        };

        self.db.tables.cart_items.remove(index);
        self.db.persist()?;
        debug!(user_id = %user_id, product_id = %product_id, "Cart row removed");
        Ok(true)
    }

    /// Drops every row of the user. Returns how many were removed.
    pub fn clear(&mut self, user_id: &str) -> StoreResult<usize> {
        let before = self.db.tables.cart_items.len();
        self.db.tables.cart_items.retain(|c| c.user_id != user_id);
        let removed = before - self.db.tables.cart_items.len();

        if removed > 0 {
            self.db.persist()?;
        }
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStorage;

    fn open() -> MockDatabase<MemoryStorage> {
        MockDatabase::open(MemoryStorage::new()).unwrap()
    }

    #[test]
    fn test_add_twice_merges() {
        let mut db = open();
        let first = db.cart().add("user2", "1", 1).unwrap();
        let second = db.cart().add("user2", "1", 1).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 2);
        assert_eq!(db.cart().items("user2").len(), 1);
    }

    #[test]
    fn test_rows_are_per_user() {
        let mut db = open();
        db.cart().add("user1", "1", 1).unwrap();
        db.cart().add("user2", "1", 3).unwrap();

        assert_eq!(db.cart().items("user1")[0].quantity, 1);
        assert_eq!(db.cart().items("user2")[0].quantity, 3);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut db = open();
        assert!(db.cart().add("user2", "1", 0).is_err());
        assert!(db.cart().items("user2").is_empty());
    }

    #[test]
    fn test_remove_nonexistent_keeps_length() {
        let mut db = open();
        db.cart().add("user2", "1", 1).unwrap();
        db.cart().add("user2", "2", 1).unwrap();
        let before = db.snapshot().cart_items.len();

        assert!(!db.cart().remove("user2", "99").unwrap());
        assert!(!db.cart().remove("user1", "1").unwrap());
        assert_eq!(db.snapshot().cart_items.len(), before);

        assert!(db.cart().remove("user2", "1").unwrap());
        assert_eq!(db.snapshot().cart_items.len(), before - 1);
    }

    #[test]
    fn test_update_quantity() {
        let mut db = open();
        db.cart().add("user2", "1", 1).unwrap();

        let row = db.cart().update_quantity("user2", "1", 5).unwrap().unwrap();
        assert_eq!(row.quantity, 5);

        assert!(db.cart().update_quantity("user2", "1", 0).unwrap().is_none());
        assert!(db.cart().items("user2").is_empty());
        assert!(db.cart().update_quantity("user2", "4", 2).unwrap().is_none());
    }

    #[test]
    fn test_clear_only_touches_one_user() {
        let mut db = open();
        db.cart().add("user1", "1", 1).unwrap();
        db.cart().add("user2", "1", 1).unwrap();
        db.cart().add("user2", "2", 1).unwrap();

        assert_eq!(db.cart().clear("user2").unwrap(), 2);
        assert_eq!(db.cart().clear("user2").unwrap(), 0);
        assert_eq!(db.cart().items("user1").len(), 1);
    }
}
