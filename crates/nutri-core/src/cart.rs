//! # Cart
//!
//! The client-side shopping cart: full product snapshots plus quantities.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Operations                                 │
//! │                                                                         │
//! │  add_item(p, n)        ──► line for p exists? qty += n : push {p, n}    │
//! │  update_quantity(id,n) ──► n <= 0 ? remove : qty = n                    │
//! │  remove_item(id)       ──► remove first line for id, report found       │
//! │  clear()               ──► no lines                                     │
//! │                                                                         │
//! │  Derived (recomputed on every read, never stored):                      │
//! │    total_items = Σ quantity                                             │
//! │    subtotal    = Σ effective_price × quantity                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding the same product merges)
//! - Every line has quantity ≥ 1
//! - At most [`MAX_CART_ITEMS`] lines, at most [`MAX_ITEM_QUANTITY`] per line

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// One line of the cart.
///
/// Holds the whole product as it looked when added, so the cart renders
/// without a catalog lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i64,
}

impl CartLine {
    /// Effective unit price × quantity.
    pub fn line_total(&self) -> f64 {
        self.product.effective_price() * self.quantity as f64
    }
}

/// The shopping cart.
///
/// Serializes as a bare array of lines, which is the layout persisted under
/// the `cart` storage key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds `quantity` of a product, merging with an existing line.
    ///
    /// ## Errors
    /// - `Validation` if `quantity` is not in `1..=999`
    /// - `QuantityTooLarge` if the merged quantity would exceed 999
    /// - `CartTooLarge` if a new line would exceed 100 lines
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            let merged = line.quantity + quantity;
            if merged > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(CartLine {
            product: product.clone(),
            quantity,
        });
        Ok(())
    }

    /// Sets the quantity of a line; zero or less removes it.
    ///
    /// Returns whether a line for `product_id` existed.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<bool> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| l.product.id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the line for `product_id`. Returns `false` (and leaves the
    /// cart untouched) when there is none.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        match self.lines.iter().position(|l| l.product.id == product_id) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.get(product_id).map_or(0, |l| l.quantity)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all quantities (the badge on the cart icon).
    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of discounted-or-full price × quantity, in dollars.
    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// The subtotal rounded to cents, for checkout.
    pub fn subtotal_money(&self) -> Money {
        Money::from_dollars(self.subtotal())
    }

    /// Lines whose quantity exceeds the product's recorded stock.
    pub fn stock_shortfalls(&self) -> Vec<CoreError> {
        self.lines
            .iter()
            .filter(|l| l.quantity > l.product.stock)
            .map(|l| CoreError::InsufficientStock {
                name: l.product.name.clone(),
                available: l.product.stock,
                requested: l.quantity,
            })
            .collect()
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        Cart {
            lines: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
