//! # Money Module
//!
//! Provides the `Money` type for checkout totals.
//!
//! ## Where Integer Money Applies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog prices are stored as decimal numbers (49.99) so the persisted │
//! │  snapshot keeps the shape the storefront has always written.           │
//! │                                                                         │
//! │  The moment a price feeds a TOTAL that a customer is charged           │
//! │  (shipping, tax, order total, payment amount) it is converted once     │
//! │  into integer cents and all further arithmetic is exact:               │
//! │                                                                         │
//! │    cart.subtotal() = 89.982  ──► Money::from_dollars ──► 8998 cents    │
//! │    + shipping 999 + tax 720 ──► total 10717 cents ──► "$107.17"        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nutri_core::money::Money;
//!
//! let price = Money::from_cents(999); // $9.99
//! let doubled = price * 2;            // $19.98
//! assert_eq!(doubled.cents(), 1998);
//! assert_eq!(Money::from_dollars(49.99).cents(), 4999);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds, discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use nutri_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal dollar amount to cents, rounding half away from zero.
    ///
    /// Only used at the boundary where a stored catalog price or a cart
    /// subtotal becomes a chargeable amount.
    ///
    /// ## Example
    /// ```rust
    /// use nutri_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(24.99).cents(), 2499);
    /// assert_eq!(Money::from_dollars(89.982).cents(), 8998);
    /// assert_eq!(Money::from_dollars(0.005).cents(), 1);
    /// ```
    pub fn from_dollars(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    ///
    /// ## Example
    /// ```rust
    /// use nutri_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).dollars(), 10);
    /// assert_eq!(Money::from_cents(-550).dollars(), -5);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Decimal dollar value, for persisting into the order snapshot.
    #[inline]
    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Calculates tax at the given rate.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 rounds half up (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use nutri_core::money::Money;
    /// use nutri_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(8998); // $89.98
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(800)); // 8%
    /// // $89.98 × 8% = $7.1984 → $7.20
    /// assert_eq!(tax.cents(), 720);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large totals cannot overflow the intermediate product
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use nutri_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2999); // $29.99
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 8997);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (1000 = 10%)
    ///
    /// ## Example
    /// ```rust
    /// use nutri_core::money::Money;
    ///
    /// let price = Money::from_cents(5999); // $59.99
    /// let discounted = price.apply_percentage_discount(1500); // 15% off
    /// assert_eq!(discounted.cents(), 5099);
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        let discount_amount = (self.0 as i128 * discount_bps as i128 + 5000) / 10000;
        Money::from_cents(self.0 - discount_amount as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and tests. The UI formats with the configured currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
