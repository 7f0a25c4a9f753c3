//! # Repository Module
//!
//! Table accessors for the mock database.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  API facade                                                            │
//! │       │                                                                 │
//! │       │  db.products().list(&query)                                    │
//! │       ▼                                                                 │
//! │  ProductRepository<'_, B>   (borrows the MockDatabase mutably)         │
//! │  ├── list / get                                                        │
//! │  ├── create / update / delete                                          │
//! │  └── categories                                                        │
//! │       │                                                                 │
//! │       │  mutate table in memory, then persist()                        │
//! │       ▼                                                                 │
//! │  StorageBackend ("mockDatabase" key)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`] - Accounts, profile edits, password resets
//! - [`ProductRepository`] - Catalog queries and admin CRUD
//! - [`CartRepository`] - Per-user cart rows
//! - [`WishlistRepository`] - Per-user saved products
//! - [`OrderRepository`] - Orders and status changes
//! - [`ReviewRepository`] - Reviews and product rating upkeep

pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;
pub mod wishlist;

pub use cart::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;
pub use wishlist::WishlistRepository;
