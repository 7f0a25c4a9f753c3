//! # Product Repository
//!
//! Catalog queries for the storefront and CRUD for the back office.
//!
//! ## Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  list(&ProductQuery { category: "Vitamins", page: 1, limit: 1 })       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  linear scan in stored order                                           │
//! │  ├── category  exact match                                             │
//! │  ├── search    lowercase substring of name / description / tags        │
//! │  └── bestseller                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Page { data: [..1 item], pagination: { total: 2, totalPages: 2 } }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting a product does not touch cart, wishlist or order rows that
//! reference it.

use chrono::Utc;
use tracing::{debug, info};

use nutri_core::catalog;
use nutri_core::validation::{validate_new_product, validate_product_update};
use nutri_core::{NewProduct, Page, Product, ProductQuery, ProductUpdate};

use crate::backend::StorageBackend;
use crate::database::MockDatabase;
use crate::error::StoreResult;
use crate::seed::CATEGORIES;

/// Repository for the product table.
pub struct ProductRepository<'a, B: StorageBackend> {
    db: &'a mut MockDatabase<B>,
}

impl<'a, B: StorageBackend> ProductRepository<'a, B> {
    pub(crate) fn new(db: &'a mut MockDatabase<B>) -> Self {
        ProductRepository { db }
    }

    /// Filters and paginates the catalog. Page and limit default to 1 / 12.
    pub fn list(&self, query: &ProductQuery) -> Page<Product> {
        let page = query.run(&self.db.tables.products);
        debug!(
            category = ?query.category,
            search = ?query.search,
            total = page.pagination.total,
            "Listed products"
        );
        page
    }

    /// Every product in stored order.
    pub fn all(&self) -> Vec<Product> {
        self.db.tables.products.clone()
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.db.tables.products.iter().find(|p| p.id == id).cloned()
    }

    /// Adds a product with a fresh id and the current time.
    ///
    /// ## Errors
    /// `Validation` with every failing field of the admin form.
    pub fn create(&mut self, new_product: NewProduct) -> StoreResult<Product> {
        validate_new_product(&new_product)?;

        let product = new_product.into_product(self.db.next_id(), Utc::now());
        self.db.tables.products.push(product.clone());
        self.db.persist()?;

        info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Applies `update` to the product. `Ok(None)` when no such product.
    pub fn update(&mut self, id: &str, update: ProductUpdate) -> StoreResult<Option<Product>> {
        validate_product_update(&update)?;

        let Some(product) = self.db.tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        update.apply_to(product);
        let updated = product.clone();

        self.db.persist()?;
        info!(product_id = %id, "Product updated");
        Ok(Some(updated))
    }

    /// Removes the product. Returns whether it existed.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let Some(index) = self.db.tables.products.iter().position(|p| p.id == id) else {
            return Ok(false);
        };

        self.db.tables.products.remove(index);
        self.db.persist()?;
        info!(product_id = %id, "Product deleted");
        Ok(true)
    }

    /// The storefront categories followed by any other category a product
    /// uses.
    pub fn categories(&self) -> Vec<String> {
        let mut all: Vec<String> = CATEGORIES.iter().map(|c| c.to_string()).collect();
        for category in catalog::categories(&self.db.tables.products) {
            if !all.contains(&category) {
                all.push(category);
            }
        }
        all
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
