//! # Catalog
//!
//! Product listing logic shared by the mock store and the products page.
//!
//! ## Two Query Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductQuery (store / API)           ProductFilters (products page)    │
//! │  ──────────────────────────           ──────────────────────────────    │
//! │  category   exact match               search   name/desc/category/tags  │
//! │  search     name/desc/tags            categories  any-of                │
//! │  bestseller, in-stock flags           tags        any-of                │
//! │  page/limit (1/12)                    price range inclusive             │
//! │        │                              min rating, in stock only         │
//! │        ▼                              sort: newest|price-*|rating       │
//! │  Page { data, pagination }                  │                           │
//! │                                             ▼                           │
//! │                                       Vec<Product> (in memory)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both shapes can be seeded from the `/products` query string
//! (`search`, `category`, `bestseller=true`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Product;

/// Page size used when none (or zero) is requested.
pub const DEFAULT_PAGE_SIZE: usize = 12;

// =============================================================================
// Pagination
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// One page of results plus its pagination block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Slices `items` into the requested page.
///
/// `page` and `limit` of zero fall back to 1 and [`DEFAULT_PAGE_SIZE`].
/// A page past the end yields no data but still reports the totals.
///
/// ## Example
/// ```rust
/// use nutri_core::catalog::paginate;
///
/// let page = paginate(vec![1, 2, 3, 4, 5], 2, 2);
/// assert_eq!(page.data, vec![3, 4]);
/// assert_eq!(page.pagination.total_pages, 3);
/// ```
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> Page<T> {
    let page = if page == 0 { 1 } else { page };
    let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
    let total = items.len();
    let start = (page - 1).saturating_mul(limit);

    let data = items.into_iter().skip(start).take(limit).collect();

    Page {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    }
}

// =============================================================================
// ProductQuery (store-side listing)
// =============================================================================

/// Filters accepted by the product listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Exact category name.
    pub category: Option<String>,
    /// Case-insensitive substring over name, description and tags.
    pub search: Option<String>,
    /// Only best sellers when `true`.
    #[serde(default)]
    pub bestseller: bool,
    /// Hides products with no stock when `true`.
    #[serde(default)]
    pub in_stock_only: bool,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl ProductQuery {
    pub fn new() -> Self {
        ProductQuery::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn bestseller(mut self, bestseller: bool) -> Self {
        self.bestseller = bestseller;
        self
    }

    pub fn in_stock_only(mut self, in_stock_only: bool) -> Self {
        self.in_stock_only = in_stock_only;
        self
    }

    pub fn page(mut self, page: usize, limit: usize) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Reads `search`, `category`, `bestseller`, `page` and `limit` from a
    /// URL query string (with or without the leading `?`).
    ///
    /// Unknown keys and unparsable numbers are ignored.
    ///
    /// ## Example
    /// ```rust
    /// use nutri_core::catalog::ProductQuery;
    ///
    /// let q = ProductQuery::from_query_string("?category=Vitamins&page=2&bestseller=true");
    /// assert_eq!(q.category.as_deref(), Some("Vitamins"));
    /// assert_eq!(q.page, Some(2));
    /// assert!(q.bestseller);
    /// ```
    pub fn from_query_string(query: &str) -> Self {
        let mut q = ProductQuery::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" if !value.is_empty() => q.search = Some(value.into_owned()),
                "category" if !value.is_empty() => q.category = Some(value.into_owned()),
                "bestseller" => q.bestseller = value == "true",
                "page" => q.page = value.parse().ok(),
                "limit" => q.limit = value.parse().ok(),
                _ => {}
            }
        }

        q
    }

    /// Whether `product` passes the category, search, bestseller and stock
    /// filters.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if product.category != category {
                return false;
            }
        }

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            if !product.matches_text(&search.to_lowercase()) {
                return false;
            }
        }

        if self.in_stock_only && !product.is_in_stock() {
            return false;
        }

        !self.bestseller || product.best_seller
    }

    /// Filters `products` (in stored order) and returns the requested page.
    pub fn run(&self, products: &[Product]) -> Page<Product> {
        let filtered: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        paginate(
            filtered,
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

// =============================================================================
// ProductFilters (products page)
// =============================================================================

/// Sort options of the products page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<SortOrder> {
        match value {
            "newest" => Some(SortOrder::Newest),
            "price-asc" => Some(SortOrder::PriceAsc),
            "price-desc" => Some(SortOrder::PriceDesc),
            "rating" => Some(SortOrder::Rating),
            _ => None,
        }
    }

    /// Sorts in place. Ties keep their incoming order.
    pub fn sort(&self, products: &mut [Product]) {
        match self {
            SortOrder::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOrder::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
    }
}

/// Filter panel state of the products page, applied to the in-memory list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    pub search: String,
    /// Any-of; empty means every category.
    pub categories: Vec<String>,
    /// Any-of; empty means every tag.
    pub tags: Vec<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Zero disables the rating filter.
    pub min_rating: f64,
    pub in_stock_only: bool,
    pub best_sellers_only: bool,
    pub sort: SortOrder,
    /// Store-wide setting, not a panel control: survives [`reset`](Self::reset).
    #[serde(default)]
    pub hide_out_of_stock: bool,
}

impl ProductFilters {
    /// Seeds the filter panel from the `/products` query string.
    pub fn from_query(query: &str) -> Self {
        let q = ProductQuery::from_query_string(query);
        ProductFilters {
            search: q.search.unwrap_or_default(),
            categories: q.category.into_iter().collect(),
            best_sellers_only: q.bestseller,
            ..ProductFilters::default()
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let search = self.search.trim();
        if !search.is_empty() {
            let needle = search.to_lowercase();
            if !product.matches_text(&needle) && !product.category.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }

        if !self.tags.is_empty() && !product.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }

        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }

        if self.min_rating > 0.0 && product.rating < self.min_rating {
            return false;
        }

        if (self.in_stock_only || self.hide_out_of_stock) && !product.is_in_stock() {
            return false;
        }

        !self.best_sellers_only || product.best_seller
    }

    /// Filters then sorts a copy of `products`.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut result: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        self.sort.sort(&mut result);
        result
    }

    /// Clears every filter but keeps the sort order and the store's stock
    /// visibility.
    pub fn reset(&mut self) {
        *self = ProductFilters {
            sort: self.sort,
            hide_out_of_stock: self.hide_out_of_stock,
            ..ProductFilters::default()
        };
    }
}

// =============================================================================
// Catalog Helpers
// =============================================================================

/// Price slider bounds: floor of the cheapest, ceil of the dearest.
///
/// `None` for an empty catalog.
pub fn price_bounds(products: &[Product]) -> Option<(f64, f64)> {
    let min = products.iter().map(|p| p.price).reduce(f64::min)?;
    let max = products.iter().map(|p| p.price).reduce(f64::max)?;
    Some((min.floor(), max.ceil()))
}

/// Distinct tags, in first-seen order.
pub fn all_tags(products: &[Product]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    products
        .iter()
        .flat_map(|p| p.tags.iter())
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect()
}

/// Distinct categories, in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    products
        .iter()
        .map(|p| &p.category)
        .filter(|c| seen.insert(*c))
        .cloned()
        .collect()
}

/// Featured products for the home page.
pub fn featured(products: &[Product], limit: usize) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.featured)
        .take(limit)
        .cloned()
        .collect()
}

/// Best sellers for the home page.
pub fn best_sellers(products: &[Product], limit: usize) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.best_seller)
        .take(limit)
        .cloned()
        .collect()
}

/// Other products of the same category, for the product detail page.
pub fn related(products: &[Product], product: &Product, limit: usize) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.category == product.category && p.id != product.id)
        .take(limit)
        .cloned()
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
