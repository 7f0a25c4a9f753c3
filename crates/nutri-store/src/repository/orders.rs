//! # Order Repository
//!
//! Placed orders and the back office's status changes.
//!
//! Orders are append-only apart from `status`. Any status may follow any
//! other; the admin page decides what makes sense.

use chrono::Utc;
use tracing::info;

use nutri_core::{NewOrder, Order, OrderStatus};

use crate::backend::StorageBackend;
use crate::database::MockDatabase;
use crate::error::StoreResult;

/// Repository for the order table.
pub struct OrderRepository<'a, B: StorageBackend> {
    db: &'a mut MockDatabase<B>,
}

impl<'a, B: StorageBackend> OrderRepository<'a, B> {
    pub(crate) fn new(db: &'a mut MockDatabase<B>) -> Self {
        OrderRepository { db }
    }

    /// Appends an order with a fresh id and the current time.
    pub fn create(&mut self, new_order: NewOrder) -> StoreResult<Order> {
        let order = Order {
            id: self.db.next_id(),
            user_id: new_order.user_id,
            items: new_order.items,
            total_amount: new_order.total_amount,
            status: new_order.status,
            shipping_address: new_order.shipping_address,
            payment_method: new_order.payment_method,
            created_at: Utc::now(),
        };

        self.db.tables.orders.push(order.clone());
        self.db.persist()?;

        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = order.total_amount,
            items = order.items.len(),
            "Order created"
        );
        Ok(order)
    }

    pub fn get(&self, id: &str) -> Option<Order> {
        self.db.tables.orders.iter().find(|o| o.id == id).cloned()
    }

    /// The user's orders, newest first.
    pub fn by_user(&self, user_id: &str) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .db
            .tables
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Every order, newest first.
    pub fn all(&self) -> Vec<Order> {
        let mut orders = self.db.tables.orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Sets the status. `Ok(None)` when no such order.
    pub fn update_status(&mut self, id: &str, status: OrderStatus) -> StoreResult<Option<Order>> {
        let Some(order) = self.db.tables.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };

        let previous = order.status;
        order.status = status;
        let updated = order.clone();

        self.db.persist()?;
        info!(order_id = %id, from = %previous, to = %status, "Order status changed");
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStorage;
    use nutri_core::{OrderItem, PaymentMethod};

    fn open() -> MockDatabase<MemoryStorage> {
        MockDatabase::open(MemoryStorage::new()).unwrap()
    }

    fn order_for(user_id: &str, total: f64) -> NewOrder {
        NewOrder {
            user_id: user_id.to_string(),
            items: vec![OrderItem {
                product_id: "1".to_string(),
                name: "Organic Whey Protein".to_string(),
                price: 44.99,
                quantity: 2,
            }],
            total_amount: total,
            status: OrderStatus::Pending,
            shipping_address: None,
            payment_method: Some(PaymentMethod::CreditCard),
        }
    }

    #[test]
    fn test_create_and_lookup() {
        let mut db = open();
        let order = db.orders().create(order_for("user2", 97.18)).unwrap();

        assert_eq!(order.item_count(), 2);
        assert_eq!(db.orders().get(&order.id), Some(order.clone()));
        assert_eq!(db.orders().by_user("user2"), vec![order]);
        assert!(db.orders().by_user("user1").is_empty());
    }

    #[test]
    fn test_ids_are_unique_within_a_millisecond() {
        let mut db = open();
        let a = db.orders().create(order_for("user2", 10.0)).unwrap();
        let b = db.orders().create(order_for("user2", 20.0)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(db.orders().all().len(), 2);
    }

    #[test]
    fn test_any_status_transition_is_allowed() {
        let mut db = open();
        let order = db.orders().create(order_for("user2", 10.0)).unwrap();

        let delivered = db
            .orders()
            .update_status(&order.id, OrderStatus::Delivered)
            .unwrap()
            .unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);

        let back = db
            .orders()
            .update_status(&order.id, OrderStatus::Pending)
            .unwrap()
            .unwrap();
        assert_eq!(back.status, OrderStatus::Pending);

        assert!(db
            .orders()
            .update_status("missing", OrderStatus::Shipped)
            .unwrap()
            .is_none());
    }
}
