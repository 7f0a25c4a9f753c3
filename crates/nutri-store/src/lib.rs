//! # nutri-store: Mock Database Layer for the NutriHealth Storefront
//!
//! Every entity the storefront knows about lives here, in memory, mirrored
//! to local-storage style key/value persistence after each mutation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     NutriHealth Data Flow                               │
//! │                                                                         │
//! │  API facade (cartAPI.addToCart)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   nutri-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ MockDatabase  │    │ Repositories  │    │    Seed      │  │   │
//! │  │   │ (database.rs) │    │ users, cart,  │    │  8 products  │  │   │
//! │  │   │               │◄───│ products, ... │    │  4 users     │  │   │
//! │  │   │ Snapshot      │    │               │    │  3 reviews   │  │   │
//! │  │   │ session key   │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  StorageBackend: MemoryStorage | FileStorage                    │   │
//! │  │  keys: mockDatabase, currentUserId                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`backend`] - Local-storage style key/value backends
//! - [`database`] - The store handle, snapshot and session
//! - [`error`] - Store error types
//! - [`repository`] - Per-table repositories
//! - [`seed`] - Demo catalog, accounts and reviews
//!
//! ## Usage
//!
//! ```rust
//! use nutri_store::{MemoryStorage, MockDatabase};
//!
//! let mut db = MockDatabase::open(MemoryStorage::new())?;
//!
//! let row = db.cart().add("user2", "1", 2)?;
//! assert_eq!(row.quantity, 2);
//!
//! let admin = db.users().find_by_email("admin@nutrihealth.com");
//! assert!(admin.map(|u| u.is_admin()).unwrap_or(false));
//! # Ok::<(), nutri_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod database;
pub mod error;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{FileStorage, MemoryStorage, StorageBackend};
pub use database::{MockDatabase, PasswordReset, Snapshot, DATABASE_KEY, SESSION_KEY};
pub use error::{StoreError, StoreResult};

pub use repository::{
    CartRepository, OrderRepository, ProductRepository, ReviewRepository, UserRepository,
    WishlistRepository,
};
