//! # Mock Database
//!
//! The in-process store: six entity tables mirrored to one JSON blob.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  MockDatabase::open(backend)                                           │
//! │       │                                                                 │
//! │       ├── get_item("mockDatabase") ──► parse Snapshot                   │
//! │       │        (missing → empty, unreadable → logged, empty)            │
//! │       │                                                                 │
//! │       ├── seed::seed_empty_tables() ← demo data, empty tables only      │
//! │       │                                                                 │
//! │       └── persist() ──► set_item("mockDatabase", json)                  │
//! │                                                                         │
//! │  Every mutation: change table in memory → persist() whole snapshot      │
//! │  A failed persist() restores the tables last written successfully       │
//! │                                                                         │
//! │  Session: "currentUserId" is its own key, never part of the snapshot   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use nutri_core::{CartItem, Order, Product, Review, User, WishlistItem};

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};
use crate::repository::cart::CartRepository;
use crate::repository::orders::OrderRepository;
use crate::repository::products::ProductRepository;
use crate::repository::reviews::ReviewRepository;
use crate::repository::users::UserRepository;
use crate::repository::wishlist::WishlistRepository;
use crate::seed;

/// Storage key of the serialized tables.
pub const DATABASE_KEY: &str = "mockDatabase";

/// Storage key of the session user id.
pub const SESSION_KEY: &str = "currentUserId";

// =============================================================================
// Snapshot
// =============================================================================

/// A pending password reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Every table of the store, exactly as persisted.
///
/// Missing tables read back as empty, so older blobs still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub wishlist_items: Vec<WishlistItem>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub password_resets: Vec<PasswordReset>,
}

impl Snapshot {
    /// Largest numeric id in any table (seed ids like "1"; generated ids are
    /// epoch milliseconds).
    fn max_numeric_id(&self) -> i64 {
        let ids = self
            .users
            .iter()
            .map(|u| u.id.as_str())
            .chain(self.products.iter().map(|p| p.id.as_str()))
            .chain(self.cart_items.iter().map(|c| c.id.as_str()))
            .chain(self.wishlist_items.iter().map(|w| w.id.as_str()))
            .chain(self.orders.iter().map(|o| o.id.as_str()))
            .chain(self.reviews.iter().map(|r| r.id.as_str()));

        ids.filter_map(|id| id.parse::<i64>().ok()).max().unwrap_or(0)
    }
}

// =============================================================================
// Id Generator
// =============================================================================

/// Timestamp ids that never repeat within one store.
///
/// ```text
///   now = 1700000000000, last = 1699999999999 → 1700000000000
///   now = 1700000000000, last = 1700000000000 → 1700000000001
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn starting_after(last: i64) -> Self {
        IdGenerator { last }
    }

    pub fn next_at(&mut self, now_millis: i64) -> String {
        let id = now_millis.max(self.last + 1);
        self.last = id;
        id.to_string()
    }

    pub fn next(&mut self) -> String {
        self.next_at(Utc::now().timestamp_millis())
    }
}

// =============================================================================
// MockDatabase
// =============================================================================

/// The store handle. Construct once at startup and pass it by reference.
///
/// ## Usage
/// ```rust
/// use nutri_store::{MemoryStorage, MockDatabase};
/// use nutri_core::ProductQuery;
///
/// let mut db = MockDatabase::open(MemoryStorage::new())?;
/// let page = db.products().list(&ProductQuery::new().category("Vitamins"));
/// assert_eq!(page.pagination.total, 1);
/// # Ok::<(), nutri_store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct MockDatabase<B: StorageBackend> {
    backend: B,
    pub(crate) tables: Snapshot,
    /// The tables as last written to the backend.
    saved: Snapshot,
    pub(crate) ids: IdGenerator,
}

impl<B: StorageBackend> MockDatabase<B> {
    /// Loads the snapshot from `backend`, seeds empty tables and persists.
    ///
    /// An unreadable snapshot is logged and treated as empty.
    pub fn open(backend: B) -> StoreResult<Self> {
        let mut db = MockDatabase::load(backend);
        if seed::seed_empty_tables(&mut db.tables) {
            info!(
                products = db.tables.products.len(),
                users = db.tables.users.len(),
                "Seeded demo data"
            );
        }
        db.persist()?;
        Ok(db)
    }

    /// Loads the snapshot without seeding or writing anything.
    pub fn load(backend: B) -> Self {
        let tables = match backend.get_item(DATABASE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Snapshot>(&json) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    error!(error = %e, "Stored database is unreadable, starting empty");
                    Snapshot::default()
                }
            },
            Ok(None) => Snapshot::default(),
            Err(e) => {
                error!(error = %e, "Error loading from storage, starting empty");
                Snapshot::default()
            }
        };

        debug!(
            users = tables.users.len(),
            products = tables.products.len(),
            orders = tables.orders.len(),
            "Database loaded"
        );

        let ids = IdGenerator::starting_after(tables.max_numeric_id());
        MockDatabase {
            backend,
            saved: tables.clone(),
            tables,
            ids,
        }
    }

    /// Writes the whole snapshot under [`DATABASE_KEY`].
    ///
    /// On failure the in-memory tables roll back to the last successful
    /// write, so a failed mutation is not visible to later reads.
    pub fn persist(&mut self) -> StoreResult<()> {
        let written = serde_json::to_string(&self.tables)
            .map_err(StoreError::from)
            .and_then(|json| self.backend.set_item(DATABASE_KEY, &json));

        match written {
            Ok(()) => {
                self.saved = self.tables.clone();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Save failed, restoring last saved tables");
                self.tables = self.saved.clone();
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.tables
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) fn next_id(&mut self) -> String {
        self.ids.next()
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Sets (or with `None` clears) the session user.
    pub fn set_current_user(&mut self, user_id: Option<&str>) -> StoreResult<()> {
        match user_id {
            Some(id) => {
                debug!(user_id = %id, "Session started");
                self.backend.set_item(SESSION_KEY, id)
            }
            None => {
                debug!("Session cleared");
                self.backend.remove_item(SESSION_KEY)
            }
        }
    }

    pub fn current_user_id(&self) -> Option<String> {
        match self.backend.get_item(SESSION_KEY) {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(e) => {
                warn!(error = %e, "Could not read session, treating as anonymous");
                None
            }
        }
    }

    /// The session user, or `None` when anonymous or the id no longer
    /// resolves to a user.
    pub fn current_user(&self) -> Option<User> {
        let id = self.current_user_id()?;
        self.tables.users.iter().find(|u| u.id == id).cloned()
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    pub fn users(&mut self) -> UserRepository<'_, B> {
        UserRepository::new(self)
    }

    pub fn products(&mut self) -> ProductRepository<'_, B> {
        ProductRepository::new(self)
    }

    pub fn cart(&mut self) -> CartRepository<'_, B> {
        CartRepository::new(self)
    }

    pub fn wishlist(&mut self) -> WishlistRepository<'_, B> {
        WishlistRepository::new(self)
    }

    pub fn orders(&mut self) -> OrderRepository<'_, B> {
        OrderRepository::new(self)
    }

    pub fn reviews(&mut self) -> ReviewRepository<'_, B> {
        ReviewRepository::new(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
