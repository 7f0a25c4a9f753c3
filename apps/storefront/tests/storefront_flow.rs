//! End-to-end storefront journeys through the facade and the client state.

use std::sync::Arc;

use nutri_core::checkout::{CheckoutStep, CheckoutWizard, ShippingDetails};
use nutri_core::{NewProduct, OrderStatus, PaymentMethod, ProductQuery};
use nutri_store::{MemoryStorage, MockDatabase, StorageBackend, DATABASE_KEY};
use nutri_storefront::api::{Api, FixedDecider};
use nutri_storefront::checkout::place_order;
use nutri_storefront::config::{AppConfig, LatencyProfile};
use nutri_storefront::error::ErrorCode;
use nutri_storefront::state::{AuthState, CartState, WishlistState};
use nutri_storefront::Storefront;

fn config() -> AppConfig {
    AppConfig {
        latency: LatencyProfile::zero(),
        ..AppConfig::default()
    }
}

fn shipping() -> ShippingDetails {
    ShippingDetails {
        full_name: "Noah Park".to_string(),
        email: "noah@example.com".to_string(),
        phone: "5035550199".to_string(),
        street: "18 Orchard Lane".to_string(),
        city: "Salem".to_string(),
        state: "OR".to_string(),
        postal_code: "97301".to_string(),
        ..ShippingDetails::default()
    }
}

fn open_over(storage: &MemoryStorage, approve: bool) -> Storefront<MemoryStorage> {
    let db = MockDatabase::open(storage.clone()).unwrap();
    let client: Arc<dyn StorageBackend> = Arc::new(storage.clone());
    Storefront {
        api: Api::builder(db)
            .latency(LatencyProfile::zero())
            .payments(FixedDecider(approve))
            .build(),
        cart: CartState::load(Arc::clone(&client)),
        wishlist: WishlistState::load(Arc::clone(&client)),
        auth: AuthState::load(client),
    }
}

#[tokio::test]
async fn customer_buys_then_admin_ships() {
    let storage = MemoryStorage::new();
    let shop = open_over(&storage, true);

    let created = shop
        .auth
        .register(&shop.api, "Noah Park", "noah@example.com", "secret1")
        .await;
    assert!(created.success);

    let proteins = shop
        .api
        .products()
        .get_products(&ProductQuery::from_query_string("?search=protein"))
        .await;
    assert_eq!(proteins.pagination.total, 2);

    for product in &proteins.data {
        shop.cart.add_item(product, 1).unwrap();
    }
    let magnesium = shop.api.products().get_product_by_id("6").await.data.unwrap();
    shop.wishlist.toggle_item(&magnesium);

    let mut wizard = CheckoutWizard::start(&shop.cart.snapshot()).unwrap();
    wizard.submit_shipping(shipping()).unwrap();
    wizard.select_payment_method(PaymentMethod::CreditCard).unwrap();
    let placed = place_order(&shop.api, &shop.cart, &mut wizard).await.unwrap();

    assert_eq!(wizard.step(), CheckoutStep::Confirmation);
    assert!(shop.cart.is_empty());
    assert_eq!(placed.order.items.len(), 2);
    assert_eq!(
        placed.order.shipping_address.as_ref().map(|a| a.city.as_str()),
        Some("Salem")
    );

    shop.auth.logout(&shop.api).await;
    shop.auth
        .login(&shop.api, "admin@nutrihealth.com", "admin123")
        .await;

    let pending = shop
        .api
        .admin()
        .list_orders(Some("noah"), Some(OrderStatus::Pending))
        .await
        .data
        .unwrap();
    assert_eq!(pending.len(), 1);

    let shipped = shop
        .api
        .admin()
        .update_order_status(&placed.order.id, OrderStatus::Shipped)
        .await;
    assert_eq!(shipped.message.as_deref(), Some("Order status updated"));

    let stats = shop.api.admin().dashboard().await.data.unwrap();
    assert_eq!(stats.order_count, 1);
    assert_eq!(stats.total_revenue, placed.order.total_amount);
    assert_eq!(stats.customer_count, 4);

    shop.auth
        .login(&shop.api, "noah@example.com", "secret1")
        .await;
    let mine = shop.api.orders().get_user_orders().await.data.unwrap();
    assert_eq!(mine[0].status, OrderStatus::Shipped);

    // Wishlist survives the whole journey.
    assert!(shop.wishlist.is_in_wishlist("6"));
}

#[tokio::test]
async fn declined_payment_can_be_retried() {
    let storage = MemoryStorage::new();
    let declining = open_over(&storage, false);
    declining
        .auth
        .login(&declining.api, "user@example.com", "user123")
        .await;
    let whey = declining.api.products().get_product_by_id("1").await.data.unwrap();
    declining.cart.add_item(&whey, 2).unwrap();

    let mut wizard = CheckoutWizard::start(&declining.cart.snapshot()).unwrap();
    wizard.submit_shipping(shipping()).unwrap();

    let err = place_order(&declining.api, &declining.cart, &mut wizard)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PaymentError);
    assert_eq!(wizard.step(), CheckoutStep::Payment);

    // Same storage, now with an approving simulator: the cart and session
    // are still there.
    let approving = open_over(&storage, true);
    assert_eq!(approving.cart.total_items(), 2);
    let placed = place_order(&approving.api, &approving.cart, &mut wizard)
        .await
        .unwrap();
    assert_eq!(placed.summary.subtotal.cents(), 8998);
    assert_eq!(placed.order.total_amount, 107.17);
}

#[tokio::test]
async fn client_state_reloads_from_storage() {
    let storage = MemoryStorage::new();
    let first = open_over(&storage, true);

    first.auth.login(&first.api, "emma@example.com", "emma123").await;
    let drops = first.api.products().get_product_by_id("2").await.data.unwrap();
    first.cart.add_item(&drops, 1).unwrap();
    first.cart.add_item(&drops, 1).unwrap();
    first.wishlist.toggle_item(&drops);

    let second = open_over(&storage, true);
    assert_eq!(second.cart.lines().len(), 1);
    assert_eq!(second.cart.total_items(), 2);
    assert!(second.wishlist.is_in_wishlist("2"));
    assert_eq!(
        second.auth.current_user().map(|u| u.email),
        Some("emma@example.com".to_string())
    );
}

#[tokio::test]
async fn corrupt_database_blob_falls_back_to_seed() {
    let storage = MemoryStorage::new();
    storage.set_item(DATABASE_KEY, "{{{ definitely not json").unwrap();

    let shop = open_over(&storage, true);
    let page = shop.api.products().get_products(&ProductQuery::new()).await;
    assert_eq!(page.pagination.total, 8);
}

#[tokio::test]
async fn vitamins_paginate_one_per_page() {
    let shop = Storefront::in_memory(&config()).unwrap();
    shop.auth
        .login(&shop.api, "admin@nutrihealth.com", "admin123")
        .await;
    shop.api
        .products()
        .create_product(NewProduct {
            name: "Daily Multivitamin".to_string(),
            description: "Complete A to Z formula".to_string(),
            price: 19.99,
            category: "Vitamins".to_string(),
            stock: 40,
            ..NewProduct::default()
        })
        .await;

    let page = shop
        .api
        .products()
        .get_products(&ProductQuery::new().category("Vitamins").page(1, 1))
        .await;
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.total_pages, 2);
}

#[tokio::test]
async fn protected_endpoints_without_session() {
    let shop = Storefront::in_memory(&config()).unwrap();

    let cart = shop.api.cart().get_cart_items().await;
    assert_eq!(cart.message.as_deref(), Some("Not authenticated"));

    let order = shop.api.orders().get_user_orders().await;
    assert_eq!(order.message.as_deref(), Some("Not authenticated"));

    let admin = shop.api.admin().list_customers(None).await;
    assert_eq!(admin.message.as_deref(), Some("Unauthorized"));

    let product = shop.api.products().delete_product("1").await;
    assert_eq!(product.message.as_deref(), Some("Unauthorized"));
}
