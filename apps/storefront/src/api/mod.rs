//! # API Facade
//!
//! The mock store presented as an async "network" boundary.
//!
//! ## Call Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  api.cart().add_to_cart("1", 2).await                                  │
//! │       │                                                                 │
//! │       ├── 1. sleep(latency)        500ms standard                       │
//! │       │                            200ms login / logout / current user  │
//! │       │                            2000ms payment                       │
//! │       │                                                                 │
//! │       ├── 2. lock the store        one caller at a time                 │
//! │       │                                                                 │
//! │       ├── 3. session check         none → "Not authenticated"           │
//! │       │                            not admin → "Unauthorized"           │
//! │       │                                                                 │
//! │       └── 4. store operation ──► ApiResponse { success, message, data } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Endpoint Groups
//!
//! - [`auth`] - signup, login, logout, current user, profile, password reset
//! - [`products`] - listing, detail, admin CRUD, categories
//! - [`cart`] - server-side cart rows
//! - [`wishlist`] - server-side wishlist rows
//! - [`orders`] - placing and reading orders
//! - [`reviews`] - product reviews
//! - [`payment`] - the payment simulator
//! - [`admin`] - dashboard, order and customer management, settings

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod payment;
pub mod products;
pub mod reviews;
pub mod wishlist;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::warn;

use nutri_core::User;
use nutri_store::{MockDatabase, StorageBackend};

use crate::config::{AppConfig, LatencyProfile, ShippingSettings, StoreSettings};
use crate::error::{ApiError, ApiResult};

pub use admin::{AdminApi, CategoryCount, CustomerSummary, DashboardStats, StatusCount};
pub use auth::AuthApi;
pub use cart::{CartApi, CartItemWithProduct};
pub use orders::{OrderApi, OrderRequest, GUEST_USER_ID};
pub use payment::{FixedDecider, PaymentApi, PaymentDecider, PaymentReceipt, RandomDecider};
pub use products::ProductApi;
pub use reviews::{ReviewApi, ReviewWithUser};
pub use wishlist::{WishlistApi, WishlistItemWithProduct};

// =============================================================================
// Envelope
// =============================================================================

/// The `{success, message?, data}` wrapper every endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
    /// Machine-readable reason of a failure. Never serialized.
    #[serde(skip)]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn ok_with(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: ApiError) -> Self {
        ApiResponse {
            success: false,
            message: Some(error.message.clone()),
            data: None,
            error: Some(error),
        }
    }

    /// Success carries `message`; failure carries the error's own message.
    pub fn from_result(result: ApiResult<T>, message: &str) -> Self {
        match result {
            Ok(data) => ApiResponse::ok_with(message, data),
            Err(e) => ApiResponse::fail(e),
        }
    }

    /// The payload of a successful response.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> From<ApiResult<T>> for ApiResponse<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::fail(e),
        }
    }
}

// =============================================================================
// Api Handle
// =============================================================================

/// Which artificial delay an endpoint waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latency {
    Standard,
    Session,
    Payment,
}

/// Cheap to clone; every clone talks to the same store.
///
/// ## Usage
/// ```rust
/// use nutri_storefront::api::Api;
/// use nutri_storefront::config::LatencyProfile;
/// use nutri_store::{MemoryStorage, MockDatabase};
///
/// # tokio_test_block(async {
/// let db = MockDatabase::open(MemoryStorage::new()).unwrap();
/// let api = Api::builder(db).latency(LatencyProfile::zero()).build();
///
/// let login = api.auth().login("admin@nutrihealth.com", "admin123").await;
/// assert!(login.success);
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
/// # }
/// ```
pub struct Api<B: StorageBackend> {
    db: Arc<Mutex<MockDatabase<B>>>,
    settings: Arc<RwLock<StoreSettings>>,
    shipping: ShippingSettings,
    latency: LatencyProfile,
    payments: Arc<dyn PaymentDecider>,
}

impl<B: StorageBackend> Clone for Api<B> {
    fn clone(&self) -> Self {
        Api {
            db: Arc::clone(&self.db),
            settings: Arc::clone(&self.settings),
            shipping: self.shipping,
            latency: self.latency,
            payments: Arc::clone(&self.payments),
        }
    }
}

/// Builder for [`Api`].
pub struct ApiBuilder<B: StorageBackend> {
    db: MockDatabase<B>,
    settings: StoreSettings,
    shipping: ShippingSettings,
    latency: LatencyProfile,
    payments: Arc<dyn PaymentDecider>,
}

impl<B: StorageBackend> ApiBuilder<B> {
    pub fn latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    pub fn settings(mut self, settings: StoreSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn shipping(mut self, shipping: ShippingSettings) -> Self {
        self.shipping = shipping;
        self
    }

    pub fn payments(mut self, decider: impl PaymentDecider + 'static) -> Self {
        self.payments = Arc::new(decider);
        self
    }

    /// Takes latency, store settings, shipping and payment success rate from
    /// `config`.
    pub fn config(self, config: &AppConfig) -> Self {
        self.latency(config.latency)
            .settings(config.store.clone())
            .shipping(config.shipping)
            .payments(RandomDecider::new(config.payment_success_rate))
    }

    pub fn build(self) -> Api<B> {
        Api {
            db: Arc::new(Mutex::new(self.db)),
            settings: Arc::new(RwLock::new(self.settings)),
            shipping: self.shipping,
            latency: self.latency,
            payments: self.payments,
        }
    }
}

impl<B: StorageBackend> Api<B> {
    /// Starts from default latency, settings and a 90% payment simulator.
    pub fn builder(db: MockDatabase<B>) -> ApiBuilder<B> {
        ApiBuilder {
            db,
            settings: StoreSettings::default(),
            shipping: ShippingSettings::default(),
            latency: LatencyProfile::default(),
            payments: Arc::new(RandomDecider::default()),
        }
    }

    pub fn auth(&self) -> AuthApi<'_, B> {
        AuthApi::new(self)
    }

    pub fn products(&self) -> ProductApi<'_, B> {
        ProductApi::new(self)
    }

    pub fn cart(&self) -> CartApi<'_, B> {
        CartApi::new(self)
    }

    pub fn wishlist(&self) -> WishlistApi<'_, B> {
        WishlistApi::new(self)
    }

    pub fn orders(&self) -> OrderApi<'_, B> {
        OrderApi::new(self)
    }

    pub fn reviews(&self) -> ReviewApi<'_, B> {
        ReviewApi::new(self)
    }

    pub fn payments(&self) -> PaymentApi<'_, B> {
        PaymentApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_, B> {
        AdminApi::new(self)
    }

    /// The store, for startup code and tests that need to look underneath
    /// the facade.
    pub fn database(&self) -> &Arc<Mutex<MockDatabase<B>>> {
        &self.db
    }

    /// Current store settings.
    pub async fn settings(&self) -> StoreSettings {
        self.settings.read().await.clone()
    }

    /// Checkout pricing under the current settings.
    pub async fn pricing_rules(&self) -> nutri_core::checkout::PricingRules {
        crate::config::pricing_rules(&self.shipping, &*self.settings.read().await)
    }

    // =========================================================================
    // Endpoint plumbing
    // =========================================================================

    pub(crate) async fn delay(&self, latency: Latency) {
        let duration = match latency {
            Latency::Standard => self.latency.standard(),
            Latency::Session => self.latency.session(),
            Latency::Payment => self.latency.payment(),
        };
        if duration > Duration::ZERO {
            tokio::time::sleep(duration).await;
        }
    }

    /// Waits, locks and runs `f` without a session check.
    pub(crate) async fn public<T>(
        &self,
        latency: Latency,
        f: impl FnOnce(&mut MockDatabase<B>) -> ApiResult<T>,
    ) -> ApiResult<T> {
        self.delay(latency).await;
        let mut db = self.db.lock().await;
        f(&mut db)
    }

    /// Like [`Api::public`], but only with a session user.
    pub(crate) async fn signed_in<T>(
        &self,
        latency: Latency,
        f: impl FnOnce(&mut MockDatabase<B>, &User) -> ApiResult<T>,
    ) -> ApiResult<T> {
        self.delay(latency).await;
        let mut db = self.db.lock().await;
        let user = db.current_user().ok_or_else(ApiError::not_authenticated)?;
        f(&mut db, &user)
    }

    /// Like [`Api::public`], but only for an admin session.
    pub(crate) async fn admin_only<T>(
        &self,
        latency: Latency,
        f: impl FnOnce(&mut MockDatabase<B>, &User) -> ApiResult<T>,
    ) -> ApiResult<T> {
        self.delay(latency).await;
        let mut db = self.db.lock().await;
        let user = match db.current_user() {
            Some(user) if user.is_admin() => user,
            Some(user) => {
                warn!(user_id = %user.id, "Admin endpoint refused");
                return Err(ApiError::unauthorized());
            }
            None => return Err(ApiError::unauthorized()),
        };
        f(&mut db, &user)
    }
}
