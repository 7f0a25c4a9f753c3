//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Product     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (immutable) │   │  id             │       │
//! │  │  email (unique) │   │  price ≥ 0      │   │  user_id        │       │
//! │  │  role           │   │  discount 0-100 │   │  items[]        │       │
//! │  └─────────────────┘   └─────────────────┘   │  status         │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartItem     │   │  WishlistItem   │   │     Review      │       │
//! │  │  (user,product) │   │  (user,product) │   │  rating 1-5     │       │
//! │  │  quantity ≥ 1   │   │  set semantics  │   │  no edit/delete │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every type serializes with camelCase keys so the persisted snapshots keep
//! the layout the storefront writes to local storage (`createdAt`,
//! `discountPercentage`, `bestSeller`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (checkout default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// User
// =============================================================================

/// Role of an account.
///
/// Older UI snapshots wrote `"user"` for ordinary accounts; it reads back as
/// [`UserRole::Customer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    #[serde(alias = "user")]
    Customer,
    Admin,
}

/// A storefront account.
///
/// The mock backend keeps the password in plaintext; every API response
/// passes the user through [`User::redacted`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Unique within the store.
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Copy of the user with the password blanked, safe to hand to the UI.
    pub fn redacted(&self) -> User {
        User {
            password: String::new(),
            ..self.clone()
        }
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

/// Fields supplied when creating a user (id and createdAt are assigned).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Profile fields a signed-in user may change. `None` keeps the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// ## Invariants
/// - `price >= 0`
/// - `discount_percentage` in `[0, 100]` when present
/// - `id` is assigned at creation and never changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub description: String,
    /// Unit price in dollars, as persisted.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Image URLs. Snapshots written by the first backend prototype used
    /// `imageUrls`; both spellings load.
    #[serde(default, alias = "imageUrls")]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub best_seller: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Price after the product discount, if any.
    ///
    /// A zero or missing discount leaves the price untouched.
    pub fn effective_price(&self) -> f64 {
        match self.discount_percentage {
            Some(discount) if discount > 0.0 => self.price * (1.0 - discount / 100.0),
            _ => self.price,
        }
    }

    #[inline]
    pub fn price_money(&self) -> Money {
        Money::from_dollars(self.price)
    }

    #[inline]
    pub fn effective_price_money(&self) -> Money {
        Money::from_dollars(self.effective_price())
    }

    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    #[inline]
    pub fn is_discounted(&self) -> bool {
        self.discount_percentage.is_some_and(|d| d > 0.0)
    }

    /// Case-insensitive substring match over name, description and tags.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Fields supplied when creating a product (id and createdAt are assigned).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub best_seller: bool,
}

impl NewProduct {
    /// Materialises the product with its assigned id and timestamp.
    ///
    /// An empty slug is derived from the name.
    pub fn into_product(self, id: String, created_at: DateTime<Utc>) -> Product {
        let slug = if self.slug.trim().is_empty() {
            slugify(&self.name)
        } else {
            self.slug
        };

        Product {
            id,
            name: self.name,
            slug,
            description: self.description,
            price: self.price,
            discount_percentage: self.discount_percentage,
            category: self.category,
            tags: self.tags,
            images: self.images,
            stock: self.stock,
            rating: self.rating,
            featured: self.featured,
            best_seller: self.best_seller,
            created_at,
        }
    }
}

/// Partial update of a product from the admin form.
///
/// `None` leaves the field as it is. The id and createdAt can never be
/// changed through an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    /// `Some(None)` clears the discount.
    pub discount_percentage: Option<Option<f64>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub stock: Option<i64>,
    pub featured: Option<bool>,
    pub best_seller: Option<bool>,
}

impl ProductUpdate {
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.slug = slugify(&name);
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(discount) = self.discount_percentage {
            product.discount_percentage = discount;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(tags) = self.tags {
            product.tags = tags;
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(best_seller) = self.best_seller {
            product.best_seller = best_seller;
        }
    }
}

/// URL slug for a product name: lowercase ASCII alphanumerics joined by `-`.
///
/// ```rust
/// use nutri_core::types::slugify;
///
/// assert_eq!(slugify("Vitamin D3 + K2 Drops"), "vitamin-d3-k2-drops");
/// ```
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

// =============================================================================
// Cart & Wishlist rows
// =============================================================================

/// A cart row in the mock database: one per (user, product) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    /// Always ≥ 1 while the row exists.
    pub quantity: i64,
}

/// A wishlist row in the mock database: a product appears at most once per
/// user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
}

// =============================================================================
// Order
// =============================================================================

/// Lifecycle of an order.
///
/// Conceptually linear (pending → processing → shipped → delivered, with
/// cancelled as an exit) but no transition rules are enforced: the back
/// office may set any status at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::error::ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown order status '{}'", s),
            })
    }
}

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::Paypal => "paypal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line of an order, snapshotted at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    /// Product name at time of purchase (frozen).
    pub name: String,
    /// Unit price paid, after discount (frozen).
    pub price: f64,
    pub quantity: i64,
}

/// Where an order ships to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Fields supplied when placing an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<PaymentMethod>,
}

// =============================================================================
// Review
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub user_id: String,
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn whey() -> Product {
        NewProduct {
            name: "Organic Whey Protein".to_string(),
            description: "Premium grass-fed whey protein".to_string(),
            price: 49.99,
            discount_percentage: Some(10.0),
            category: "Supplements".to_string(),
            tags: vec!["protein".to_string(), "Organic".to_string()],
            stock: 50,
            ..NewProduct::default()
        }
        .into_product("1".to_string(), Utc::now())
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(7.5);
        assert_eq!(rate.bps(), 750);
        assert!((rate.percentage() - 7.5).abs() < 0.001);
    }

    #[test]
    fn test_effective_price_applies_discount() {
        let mut product = whey();
        assert!((product.effective_price() - 44.991).abs() < 1e-9);
        assert!(product.is_discounted());

        product.discount_percentage = Some(0.0);
        assert_eq!(product.effective_price(), 49.99);
        assert!(!product.is_discounted());

        product.discount_percentage = None;
        assert_eq!(product.effective_price(), 49.99);
        assert_eq!(product.price_money().cents(), 4999);
    }

    #[test]
    fn test_matches_text_is_case_insensitive() {
        let product = whey();
        assert!(product.matches_text("whey"));
        assert!(product.matches_text("grass-fed"));
        assert!(product.matches_text("organic"));
        assert!(!product.matches_text("vitamin"));
    }

    #[test]
    fn test_into_product_derives_slug() {
        let product = whey();
        assert_eq!(product.slug, "organic-whey-protein");
        assert_eq!(product.id, "1");
    }

    #[test]
    fn test_product_update_keeps_identity() {
        let mut product = whey();
        let created_at = product.created_at;
        ProductUpdate {
            name: Some("Whey Isolate".to_string()),
            price: Some(54.0),
            discount_percentage: Some(None),
            ..ProductUpdate::default()
        }
        .apply_to(&mut product);

        assert_eq!(product.id, "1");
        assert_eq!(product.created_at, created_at);
        assert_eq!(product.name, "Whey Isolate");
        assert_eq!(product.slug, "whey-isolate");
        assert_eq!(product.price, 54.0);
        assert_eq!(product.discount_percentage, None);
        assert_eq!(product.category, "Supplements");
    }

    #[test]
    fn test_product_reads_legacy_image_urls() {
        let json = r#"{
            "id": "2",
            "name": "Omega-3 Fish Oil",
            "slug": "omega-3-fish-oil",
            "description": "Pure omega-3 fish oil",
            "price": 32.99,
            "category": "Supplements",
            "tags": ["omega-3"],
            "imageUrls": ["https://example.com/fish-oil.jpg"],
            "stock": 75,
            "rating": 4.6,
            "createdAt": "2024-01-02T00:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.images.len(), 1);
        assert!(!product.best_seller);
        assert_eq!(product.discount_percentage, None);

        let written = serde_json::to_value(&product).unwrap();
        assert!(written.get("discountPercentage").is_none());
        assert!(written.get("bestSeller").is_some());
    }

    #[test]
    fn test_user_role_accepts_legacy_user() {
        let role: UserRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, UserRole::Customer);
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_user_redacted_blanks_password() {
        let user = User {
            id: "admin1".to_string(),
            name: "Admin User".to_string(),
            email: "admin@nutrihealth.com".to_string(),
            password: "admin123".to_string(),
            role: UserRole::Admin,
            created_at: Utc::now(),
        };
        assert!(user.verify_password("admin123"));
        assert!(!user.verify_password("admin"));
        let redacted = user.redacted();
        assert!(redacted.password.is_empty());
        assert!(redacted.is_admin());
    }

    #[test]
    fn test_order_status_parse_and_display() {
        assert_eq!("Shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("paid".parse::<OrderStatus>().is_err());
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"credit-card\""
        );
        assert_eq!(PaymentMethod::Paypal.to_string(), "paypal");
    }
}
