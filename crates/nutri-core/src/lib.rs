//! # nutri-core: Pure Business Logic for the NutriHealth Storefront
//!
//! This crate is the **heart** of the storefront. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     NutriHealth Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI layer (pages, admin)                      │   │
//! │  │    Catalog ──► Product ──► Cart ──► Checkout ──► Profile        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          nutri-storefront (API facade + client state)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nutri-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │ catalog  │ │checkout│  │   │
//! │  │   │ Product │ │  Money  │ │ Cart    │ │ filters  │ │ wizard │  │   │
//! │  │   │  Order  │ │ TaxRate │ │Wishlist │ │ paginate │ │ totals │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                nutri-store (mock database)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, Order, Review, ...)
//! - [`money`] - Money type with integer arithmetic for checkout totals
//! - [`cart`] - Cart lines, merge-on-add, subtotal
//! - [`wishlist`] - Set-semantics wishlist
//! - [`catalog`] - Product queries, filters, sorting and pagination
//! - [`checkout`] - The three-step checkout wizard and order summary
//! - [`routes`] - Client route table
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use nutri_core::money::Money;
//! use nutri_core::types::TaxRate;
//!
//! let subtotal = Money::from_cents(5000); // $50.00
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(800)); // 8%
//! assert_eq!(tax.cents(), 400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod routes;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use catalog::{Page, Pagination, ProductFilters, ProductQuery, SortOrder};
pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::Money;
pub use types::*;
pub use wishlist::Wishlist;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in a cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Stock level below which the admin dashboard flags a product.
pub const LOW_STOCK_THRESHOLD: i64 = 10;
