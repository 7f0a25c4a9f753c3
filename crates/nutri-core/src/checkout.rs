//! # Checkout
//!
//! The three-step checkout wizard and the order summary it shows.
//!
//! ## Wizard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  submit_shipping  ┌──────────┐  confirm  ┌────────────┐  │
//! │   │ Shipping │ ────────────────► │ Payment  │ ────────► │Confirmation│  │
//! │   │  (1)     │ ◄──────────────── │  (2)     │           │   (3)      │  │
//! │   └──────────┘       back        └──────────┘           └────────────┘  │
//! │                                                                         │
//! │   Entry requires a non-empty cart. Confirmation is terminal.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Summary
//! ```text
//!   subtotal  = cart subtotal, rounded to cents
//!   shipping  = 0 if subtotal ≥ $100.00 else $9.99
//!   tax       = subtotal × rate (default 8%)
//!   total     = subtotal + shipping + tax
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationErrors};
use crate::money::Money;
use crate::types::{PaymentMethod, ShippingAddress, TaxRate};
use crate::validation::{validate_email, validate_min_len};

// =============================================================================
// Pricing
// =============================================================================

/// Shipping and tax rules applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingRules {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Money,
    pub flat_shipping: Money,
    pub tax_rate: TaxRate,
}

impl Default for PricingRules {
    fn default() -> Self {
        PricingRules {
            free_shipping_threshold: Money::from_cents(10_000),
            flat_shipping: Money::from_cents(999),
            tax_rate: TaxRate::from_bps(800),
        }
    }
}

impl PricingRules {
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_shipping
        }
    }
}

/// Totals shown beside every checkout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub item_count: i64,
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderSummary {
    pub fn compute(cart: &Cart, rules: &PricingRules) -> Self {
        let mut summary = OrderSummary::from_subtotal(cart.subtotal_money(), rules);
        summary.item_count = cart.total_items();
        summary
    }

    pub fn from_subtotal(subtotal: Money, rules: &PricingRules) -> Self {
        let shipping = rules.shipping_for(subtotal);
        let tax = subtotal.calculate_tax(rules.tax_rate);

        OrderSummary {
            item_count: 0,
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

// =============================================================================
// Shipping Details
// =============================================================================

/// The shipping form of step 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for ShippingDetails {
    fn default() -> Self {
        ShippingDetails {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: "USA".to_string(),
        }
    }
}

impl ShippingDetails {
    /// Checks every field, reporting all failures at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check(validate_min_len("fullName", &self.full_name, 3));
        errors.check(validate_email(&self.email));
        errors.check(validate_min_len("phone", &self.phone, 10));
        errors.check(validate_min_len("street", &self.street, 5));
        errors.check(validate_min_len("city", &self.city, 2));
        errors.check(validate_min_len("state", &self.state, 2));
        errors.check(validate_min_len("postalCode", &self.postal_code, 5));
        errors.check(validate_min_len("country", &self.country, 2));

        errors.into_result()
    }

    pub fn to_address(&self) -> ShippingAddress {
        ShippingAddress {
            full_name: self.full_name.trim().to_string(),
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }
}

// =============================================================================
// Wizard
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    /// 1-based position shown in the progress bar.
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Shipping => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Confirmation => 3,
        }
    }
}

/// State of one checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutWizard {
    step: CheckoutStep,
    shipping: Option<ShippingDetails>,
    payment_method: PaymentMethod,
    order_id: Option<String>,
}

impl CheckoutWizard {
    /// Opens checkout for `cart`.
    ///
    /// ## Errors
    /// `EmptyCart` when there is nothing to buy.
    pub fn start(cart: &Cart) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(CheckoutWizard {
            step: CheckoutStep::Shipping,
            shipping: None,
            payment_method: PaymentMethod::default(),
            order_id: None,
        })
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn shipping(&self) -> Option<&ShippingDetails> {
        self.shipping.as_ref()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    fn expect_step(&self, expected: CheckoutStep) -> CoreResult<()> {
        if self.step != expected {
            return Err(CoreError::InvalidCheckoutStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    /// Step 1 → 2. Invalid details keep the wizard on step 1.
    pub fn submit_shipping(&mut self, details: ShippingDetails) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Shipping)?;
        details.validate()?;
        self.shipping = Some(details);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    pub fn select_payment_method(&mut self, method: PaymentMethod) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Payment)?;
        self.payment_method = method;
        Ok(())
    }

    /// Step 2 → 1, keeping the entered shipping details.
    pub fn back(&mut self) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Payment)?;
        self.step = CheckoutStep::Shipping;
        Ok(())
    }

    /// The accepted shipping details, once the wizard is on the payment step.
    pub fn ready_to_place(&self) -> CoreResult<(&ShippingDetails, PaymentMethod)> {
        self.expect_step(CheckoutStep::Payment)?;
        match &self.shipping {
            Some(details) => Ok((details, self.payment_method)),
            None => Err(CoreError::InvalidCheckoutStep {
                expected: CheckoutStep::Shipping,
                actual: self.step,
            }),
        }
    }

    /// Step 2 → 3 once the order has been placed.
    pub fn confirm(&mut self, order_id: impl Into<String>) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Payment)?;
        self.order_id = Some(order_id.into());
        self.step = CheckoutStep::Confirmation;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
