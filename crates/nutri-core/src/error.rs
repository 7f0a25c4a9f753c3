//! # Error Types
//!
//! Domain-specific error types for nutri-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nutri-core errors (this file)                                         │
//! │  ├── CoreError         - General domain errors                         │
//! │  ├── ValidationError   - One failed field                              │
//! │  └── ValidationErrors  - Every failed field of a form                  │
//! │                                                                         │
//! │  nutri-store errors (separate crate)                                   │
//! │  └── StoreError        - Local storage / serialization failures        │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── ApiError          - Folded into the {success:false} envelope      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Envelope  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use thiserror::Error;

use crate::checkout::CheckoutStep;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product is in the cart but its stock cannot cover the request.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Cart has exceeded maximum allowed distinct products.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout was started with nothing to buy.
    #[error("Cart is empty")]
    EmptyCart,

    /// A checkout action was attempted from the wrong wizard step.
    ///
    /// ## When This Occurs
    /// - Placing an order before shipping details were accepted
    /// - Submitting shipping details after the order was confirmed
    #[error("Checkout is at step {actual:?}, expected {expected:?}")]
    InvalidCheckoutStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A whole form failed validation.
    #[error("Validation failed: {0}")]
    Form(#[from] ValidationErrors),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be below zero.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., malformed email, weak password).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not (e.g., password confirmation).
    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },

    /// Duplicate value (e.g., email already registered).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Name of the form field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Mismatch { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }
}

/// Every field error of one form submission, in field order.
///
/// Forms report all failing fields at once so the UI can render them
/// inline next to each input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    /// Records the error of a single-field check, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            self.0.push(err);
        }
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// First error reported for `field`.
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field() == field)
    }

    /// `Ok(())` when nothing failed, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
