//! # Placing an Order
//!
//! Drives the last step of the checkout wizard against the facade.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  wizard on Payment step, shipping accepted                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  orders().verify_checkout(cart) ── no session / short stock ──► error,  │
//! │       │                                               nothing charged   │
//! │       ▼                                                                 │
//! │  OrderSummary::compute(cart, pricing rules)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  payments().process_payment(total) ──── declined ──► wizard stays on    │
//! │       │                                              Payment, cart kept │
//! │       ▼                                                                 │
//! │  orders().create_order(lines, total, address, method)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cart.clear_cart() ──► wizard.confirm(order id) ──► Confirmation        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{info, warn};

use nutri_core::checkout::{CheckoutWizard, OrderSummary};
use nutri_core::{CartLine, CoreError, Order, OrderItem};
use nutri_store::StorageBackend;

use crate::api::payment::PAYMENT_DECLINED;
use crate::api::{Api, OrderRequest, PaymentReceipt};
use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::state::CartState;

/// Everything the confirmation page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order: Order,
    pub receipt: PaymentReceipt,
    pub summary: OrderSummary,
}

/// The order line for a cart line, priced after discount.
pub fn order_item(line: &CartLine) -> OrderItem {
    OrderItem {
        product_id: line.product.id.clone(),
        name: line.product.name.clone(),
        price: line.product.effective_price(),
        quantity: line.quantity,
    }
}

/// Charges the cart total, stores the order and empties the cart.
///
/// ## Errors
/// - `BusinessLogic` unless the wizard is on the payment step
/// - `CartError` for an empty cart
/// - `NotAuthenticated` when no one is signed in and guest checkout is off
/// - `InsufficientStock` or `NotFound` when the store can no longer supply
///   a line
/// - `PaymentError` when the payment is declined; nothing changes, so the
///   customer can simply try again
///
/// Every check except the payment itself runs before the customer is
/// charged.
pub async fn place_order<B: StorageBackend>(
    api: &Api<B>,
    cart: &CartState,
    wizard: &mut CheckoutWizard,
) -> ApiResult<PlacedOrder> {
    let (details, method) = wizard.ready_to_place()?;
    let address = details.to_address();

    let snapshot = cart.snapshot();
    if snapshot.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }
    api.orders().verify_checkout(&snapshot).await?;

    let summary = OrderSummary::compute(&snapshot, &api.pricing_rules().await);
    let total = summary.total.to_dollars();

    let payment = api.payments().process_payment(total, method).await;
    let receipt = match (payment.success, payment.data) {
        (true, Some(receipt)) => receipt,
        _ => {
            warn!(total, "Checkout stopped at payment");
            return Err(payment
                .error
                .unwrap_or_else(|| ApiError::payment(PAYMENT_DECLINED)));
        }
    };

    let items = snapshot.lines().iter().map(order_item).collect();
    let request = OrderRequest::new(items, total)
        .shipping_address(address)
        .payment_method(method);

    let created = api.orders().create_order(request).await;
    let order = match (created.success, created.data) {
        (true, Some(order)) => order,
        _ => {
            return Err(created
                .error
                .unwrap_or_else(|| ApiError::new(ErrorCode::Internal, "Order was not created")));
        }
    };

    cart.clear_cart();
    wizard.confirm(order.id.clone())?;
    info!(order_id = %order.id, transaction_id = %receipt.transaction_id, total, "Checkout complete");

    Ok(PlacedOrder {
        order,
        receipt,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FixedDecider;
    use crate::config::LatencyProfile;
    use nutri_core::checkout::{CheckoutStep, ShippingDetails};
    use crate::api::GUEST_USER_ID;
    use crate::config::StoreSettings;
    use nutri_core::{OrderStatus, PaymentMethod, ProductUpdate};
    use nutri_store::{MemoryStorage, MockDatabase};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn details() -> ShippingDetails {
        ShippingDetails {
            full_name: "Regular User".to_string(),
            email: "user@example.com".to_string(),
            phone: "5551234567".to_string(),
            street: "42 Market Street".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            postal_code: "97201".to_string(),
            ..ShippingDetails::default()
        }
    }

    async fn setup(approve: bool) -> (Api<MemoryStorage>, CartState) {
        let storage = MemoryStorage::new();
        let db = MockDatabase::open(storage.clone()).unwrap();
        let api = Api::builder(db)
            .latency(LatencyProfile::zero())
            .payments(FixedDecider(approve))
            .build();
        api.auth().login("user@example.com", "user123").await;

        let cart = CartState::load(Arc::new(storage));
        let fish_oil = api.products().get_product_by_id("3").await.data.unwrap();
        cart.add_item(&fish_oil, 2).unwrap();
        (api, cart)
    }

    #[tokio::test]
    async fn test_successful_checkout() {
        let (api, cart) = setup(true).await;
        let mut wizard = CheckoutWizard::start(&cart.snapshot()).unwrap();
        wizard.submit_shipping(details()).unwrap();
        wizard.select_payment_method(PaymentMethod::Paypal).unwrap();

        let placed = place_order(&api, &cart, &mut wizard).await.unwrap();

        assert_eq!(wizard.step(), CheckoutStep::Confirmation);
        assert_eq!(wizard.order_id(), Some(placed.order.id.as_str()));
        assert!(cart.is_empty());
        assert_eq!(placed.order.status, OrderStatus::Pending);
        assert_eq!(placed.order.total_amount, placed.summary.total.to_dollars());
        assert_eq!(placed.order.payment_method, Some(PaymentMethod::Paypal));
        assert_eq!(placed.order.items.len(), 1);
        assert_eq!(placed.receipt.amount, placed.order.total_amount);

        let orders = api.orders().get_user_orders().await.data.unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_declined_payment_keeps_cart() {
        let (api, cart) = setup(false).await;
        let mut wizard = CheckoutWizard::start(&cart.snapshot()).unwrap();
        wizard.submit_shipping(details()).unwrap();

        let err = place_order(&api, &cart, &mut wizard).await.unwrap_err();

        assert_eq!(err.message, "Payment failed. Please try again.");
        assert_eq!(wizard.step(), CheckoutStep::Payment);
        assert_eq!(cart.total_items(), 2);
        assert!(api.orders().get_user_orders().await.data.unwrap().is_empty());
    }

    /// An approving simulator that counts its charges, over a fish oil ×2
    /// cart and nobody signed in.
    fn counting(settings: StoreSettings) -> (Api<MemoryStorage>, CartState, Arc<AtomicUsize>) {
        let storage = MemoryStorage::new();
        let db = MockDatabase::open(storage.clone()).unwrap();
        let charges = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&charges);
        let api = Api::builder(db)
            .latency(LatencyProfile::zero())
            .settings(settings)
            .payments(move |_amount: f64| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            })
            .build();

        let cart = CartState::load(Arc::new(storage));
        (api, cart, charges)
    }

    #[tokio::test]
    async fn test_anonymous_checkout_is_not_charged() {
        let (api, cart, charges) = counting(StoreSettings::default());
        let fish_oil = api.products().get_product_by_id("3").await.data.unwrap();
        cart.add_item(&fish_oil, 2).unwrap();
        let mut wizard = CheckoutWizard::start(&cart.snapshot()).unwrap();
        wizard.submit_shipping(details()).unwrap();

        let err = place_order(&api, &cart, &mut wizard).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        assert_eq!(charges.load(Ordering::SeqCst), 0);
        assert_eq!(wizard.step(), CheckoutStep::Payment);
        assert_eq!(cart.total_items(), 2);
    }

    #[tokio::test]
    async fn test_guest_checkout_places_guest_order() {
        let (api, cart, charges) = counting(StoreSettings {
            enable_guest_checkout: true,
            ..StoreSettings::default()
        });
        let fish_oil = api.products().get_product_by_id("3").await.data.unwrap();
        cart.add_item(&fish_oil, 2).unwrap();
        let mut wizard = CheckoutWizard::start(&cart.snapshot()).unwrap();
        wizard.submit_shipping(details()).unwrap();

        let placed = place_order(&api, &cart, &mut wizard).await.unwrap();

        assert_eq!(placed.order.user_id, GUEST_USER_ID);
        assert_eq!(charges.load(Ordering::SeqCst), 1);
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_short_stock_is_not_charged() {
        let (api, cart, charges) = counting(StoreSettings::default());
        api.auth().login("user@example.com", "user123").await;
        let fish_oil = api.products().get_product_by_id("3").await.data.unwrap();
        cart.add_item(&fish_oil, 5).unwrap();

        let update = ProductUpdate {
            stock: Some(3),
            ..ProductUpdate::default()
        };
        api.database().lock().await.products().update("3", update).unwrap();

        let mut wizard = CheckoutWizard::start(&cart.snapshot()).unwrap();
        wizard.submit_shipping(details()).unwrap();
        let err = place_order(&api, &cart, &mut wizard).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(charges.load(Ordering::SeqCst), 0);
        assert_eq!(cart.total_items(), 5);
    }

    #[tokio::test]
    async fn test_wizard_must_be_on_payment_step() {
        let (api, cart) = setup(true).await;
        let mut wizard = CheckoutWizard::start(&cart.snapshot()).unwrap();

        assert!(place_order(&api, &cart, &mut wizard).await.is_err());
        assert_eq!(cart.total_items(), 2);
    }
}
