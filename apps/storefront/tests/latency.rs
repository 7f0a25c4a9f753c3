//! Simulated network delays, checked against a paused clock.

use std::time::Duration;

use tokio::time::Instant;

use nutri_core::{PaymentMethod, ProductQuery};
use nutri_store::{MemoryStorage, MockDatabase};
use nutri_storefront::api::{Api, FixedDecider};
use nutri_storefront::config::LatencyProfile;

fn api(latency: LatencyProfile) -> Api<MemoryStorage> {
    let db = MockDatabase::open(MemoryStorage::new()).unwrap();
    Api::builder(db)
        .latency(latency)
        .payments(FixedDecider(true))
        .build()
}

fn assert_took(start: Instant, expected_ms: u64) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_millis(expected_ms)
            && elapsed < Duration::from_millis(expected_ms + 50),
        "expected ~{}ms, took {:?}",
        expected_ms,
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn default_profile_delays() {
    let api = api(LatencyProfile::default());

    let start = Instant::now();
    api.products().get_products(&ProductQuery::new()).await;
    assert_took(start, 500);

    let start = Instant::now();
    api.auth().login("user@example.com", "user123").await;
    assert_took(start, 200);

    let start = Instant::now();
    api.auth().get_current_user().await;
    assert_took(start, 200);

    let start = Instant::now();
    api.cart().add_to_cart("1", 1).await;
    assert_took(start, 500);

    let start = Instant::now();
    api.payments().process_payment(25.0, PaymentMethod::CreditCard).await;
    assert_took(start, 2000);

    let start = Instant::now();
    api.auth().logout().await;
    assert_took(start, 200);
}

#[tokio::test(start_paused = true)]
async fn session_check_happens_after_the_delay() {
    let api = api(LatencyProfile::default());

    let start = Instant::now();
    let response = api.orders().get_user_orders().await;
    assert!(!response.success);
    assert_took(start, 500);
}

#[tokio::test(start_paused = true)]
async fn zero_profile_does_not_wait() {
    let api = api(LatencyProfile::zero());

    let start = Instant::now();
    api.products().get_products(&ProductQuery::new()).await;
    api.payments().process_payment(25.0, PaymentMethod::Paypal).await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}
