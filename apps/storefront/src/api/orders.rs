//! # Order Endpoints
//!
//! `orderAPI`: placing orders and reading them back. Status changes live in
//! [`super::admin`].
//!
//! Without a session, orders are only accepted while guest checkout is
//! enabled; they then belong to [`GUEST_USER_ID`] and must carry a shipping
//! address.

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use nutri_core::{
    Cart, CartLine, CoreError, NewOrder, Order, OrderItem, OrderStatus, PaymentMethod,
    ShippingAddress,
};
use nutri_store::{MockDatabase, StorageBackend};

use super::{Api, ApiResponse, Latency};
use crate::error::{ApiError, ApiResult};

/// Owner of orders placed without a session.
pub const GUEST_USER_ID: &str = "guest";

/// The user an order is placed for: the session user, else a guest when
/// the store allows guest checkout.
fn order_owner<B: StorageBackend>(db: &MockDatabase<B>, guest_checkout: bool) -> ApiResult<String> {
    match db.current_user() {
        Some(user) => Ok(user.id),
        None if guest_checkout => Ok(GUEST_USER_ID.to_string()),
        None => Err(ApiError::not_authenticated()),
    }
}

/// What the checkout page submits. The user comes from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

impl OrderRequest {
    pub fn new(items: Vec<OrderItem>, total_amount: f64) -> Self {
        OrderRequest {
            items,
            total_amount,
            shipping_address: None,
            payment_method: None,
        }
    }

    pub fn shipping_address(mut self, address: ShippingAddress) -> Self {
        self.shipping_address = Some(address);
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }
}

/// `orderAPI`.
pub struct OrderApi<'a, B: StorageBackend> {
    api: &'a Api<B>,
}

impl<'a, B: StorageBackend> OrderApi<'a, B> {
    pub(crate) fn new(api: &'a Api<B>) -> Self {
        OrderApi { api }
    }

    /// Stores a pending order for the session user, or for a guest.
    pub async fn create_order(&self, request: OrderRequest) -> ApiResponse<Order> {
        let guest_checkout = self.api.settings.read().await.enable_guest_checkout;
        let result = self
            .api
            .public(Latency::Standard, |db| {
                let user_id = order_owner(&*db, guest_checkout)?;
                if request.items.is_empty() {
                    return Err(CoreError::EmptyCart.into());
                }
                if !request.total_amount.is_finite() || request.total_amount <= 0.0 {
                    return Err(ApiError::validation("Invalid order total"));
                }
                if user_id == GUEST_USER_ID && request.shipping_address.is_none() {
                    return Err(ApiError::validation("Shipping address is required"));
                }

                let order = db.orders().create(NewOrder {
                    user_id,
                    items: request.items,
                    total_amount: request.total_amount,
                    status: OrderStatus::Pending,
                    shipping_address: request.shipping_address,
                    payment_method: request.payment_method,
                })?;
                info!(order_id = %order.id, user_id = %order.user_id, total = order.total_amount, "Order placed");
                Ok(order)
            })
            .await;

        ApiResponse::from_result(result, "Order created successfully")
    }

    /// Checks that `cart` can be ordered right now, without the simulated
    /// delay: someone may place orders and every product still exists with
    /// enough stock. Checkout runs this before charging.
    ///
    /// ## Errors
    /// - `NotAuthenticated` without a session while guest checkout is off
    /// - `NotFound` when a product was deleted
    /// - `InsufficientStock` for the first line over the stored stock
    pub async fn verify_checkout(&self, cart: &Cart) -> ApiResult<()> {
        let guest_checkout = self.api.settings.read().await.enable_guest_checkout;
        let mut db = self.api.database().lock().await;
        order_owner(&*db, guest_checkout)?;

        let mut current = Vec::with_capacity(cart.len());
        for line in cart.lines() {
            let product = db
                .products()
                .get(&line.product.id)
                .ok_or_else(|| ApiError::not_found("Product"))?;
            current.push(CartLine {
                product,
                quantity: line.quantity,
            });
        }

        match current.into_iter().collect::<Cart>().stock_shortfalls().into_iter().next() {
            Some(shortfall) => Err(shortfall.into()),
            None => Ok(()),
        }
    }

    /// The session user's orders, newest first.
    pub async fn get_user_orders(&self) -> ApiResponse<Vec<Order>> {
        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| Ok(db.orders().by_user(&user.id)))
            .await;

        result.into()
    }

    /// An order of the session user. Admins may read any order; anyone else
    /// gets "Order not found" for orders that are not theirs.
    pub async fn get_order_by_id(&self, id: &str) -> ApiResponse<Order> {
        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                db.orders()
                    .get(id)
                    .filter(|order| order.user_id == user.id || user.is_admin())
                    .ok_or_else(|| ApiError::not_found("Order"))
            })
            .await;

        result.into()
    }
}
