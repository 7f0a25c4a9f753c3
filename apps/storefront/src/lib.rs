//! # NutriHealth Storefront
//!
//! The storefront application layer: the async API facade over the mock
//! store, the client state containers, and checkout orchestration.
//!
//! ## Module Organization
//! ```text
//! nutri_storefront/
//! ├── lib.rs          ◄─── You are here (startup & Storefront handle)
//! ├── config.rs       ◄─── nutri.toml + NUTRI_* environment overrides
//! ├── error.rs        ◄─── ApiError / StartupError
//! ├── api/
//! │   ├── mod.rs      ◄─── Envelope, Api handle, latency, session checks
//! │   ├── auth.rs     ◄─── signup / login / logout / profile / reset
//! │   ├── products.rs ◄─── listing, detail, admin CRUD
//! │   ├── cart.rs     ◄─── store-side cart rows
//! │   ├── wishlist.rs ◄─── store-side wishlist rows
//! │   ├── orders.rs   ◄─── placing and reading orders
//! │   ├── reviews.rs  ◄─── product reviews
//! │   ├── payment.rs  ◄─── payment simulator
//! │   └── admin.rs    ◄─── dashboard, orders, customers, settings
//! ├── state/
//! │   ├── cart.rs     ◄─── CartState ("cart")
//! │   ├── wishlist.rs ◄─── WishlistState ("wishlist")
//! │   └── auth.rs     ◄─── AuthState ("user")
//! └── checkout.rs     ◄─── payment → order → clear cart
//! ```
//!
//! ## One Store Per Process
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Storefront::open(config)                                               │
//! │     │                                                                   │
//! │     ├── FileStorage(data dir) ─────────────┐ one backend, many keys     │
//! │     │                                       │                           │
//! │     ├── MockDatabase::open ──► Api ◄────────┤ "mockDatabase"            │
//! │     │                                       │ "currentUserId"           │
//! │     ├── CartState::load  ◄──────────────────┤ "cart"                    │
//! │     ├── WishlistState::load ◄───────────────┤ "wishlist"                │
//! │     └── AuthState::load  ◄──────────────────┘ "user"                    │
//! │                                                                         │
//! │  The handle is built once and passed by reference; nothing global.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use nutri_core::ProductQuery;
use nutri_store::{FileStorage, MemoryStorage, MockDatabase, StorageBackend};

use api::Api;
use config::AppConfig;
use error::StartupError;
use state::{AuthState, CartState, WishlistState};

/// Everything the UI layer needs, wired to one storage backend.
#[derive(Clone)]
pub struct Storefront<B: StorageBackend> {
    pub api: Api<B>,
    pub cart: CartState,
    pub wishlist: WishlistState,
    pub auth: AuthState,
}

impl<B: StorageBackend + Clone + 'static> Storefront<B> {
    /// Opens the store and restores the client state from `backend`.
    pub fn with_backend(backend: B, config: &AppConfig) -> Result<Self, StartupError> {
        let db = MockDatabase::open(backend.clone())?;
        let api = Api::builder(db).config(config).build();
        let client: Arc<dyn StorageBackend> = Arc::new(backend);

        Ok(Storefront {
            api,
            cart: CartState::load(Arc::clone(&client)),
            wishlist: WishlistState::load(Arc::clone(&client)),
            auth: AuthState::load(client),
        })
    }
}

impl Storefront<FileStorage> {
    /// Opens the storefront in the configured data directory.
    pub fn open(config: &AppConfig) -> Result<Self, StartupError> {
        let dir = config.data_dir().ok_or(StartupError::NoDataDir)?;
        info!(?dir, "Data directory determined");
        Storefront::with_backend(FileStorage::new(dir)?, config)
    }
}

impl Storefront<MemoryStorage> {
    /// A fresh, seeded storefront that keeps nothing on disk.
    pub fn in_memory(config: &AppConfig) -> Result<Self, StartupError> {
        Storefront::with_backend(MemoryStorage::new(), config)
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nutri=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Starts the storefront and logs what it found.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging      RUST_LOG, default info + crate debug        │
/// │  2. Load Configuration      defaults ◄ nutri.toml ◄ NUTRI_* env         │
/// │  3. Open Storage            data dir, seed empty tables                 │
/// │  4. Restore Client State    cart, wishlist, user                        │
/// │  5. Report                  catalog size, session                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), StartupError> {
    init_tracing();
    info!("Starting NutriHealth storefront");

    let config = AppConfig::load()?;
    let storefront = Storefront::open(&config)?;

    let catalog = storefront.api.products().get_products(&ProductQuery::new()).await;
    let categories = storefront.api.products().get_categories().await.into_data().unwrap_or_default();
    let settings = storefront.api.settings().await;

    info!(
        store = %settings.store_name,
        products = catalog.pagination.total,
        categories = categories.len(),
        cart_items = storefront.cart.total_items(),
        wishlist_items = storefront.wishlist.len(),
        signed_in = storefront.auth.is_authenticated(),
        "Storefront ready"
    );

    Ok(())
}
