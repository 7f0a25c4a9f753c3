//! # API Error Type
//!
//! Unified error type behind every facade call.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  UI layer                    Rust facade                                │
//! │  ────────                    ───────────                                │
//! │                                                                         │
//! │  api.cart().add_to_cart("1", 2)                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Endpoint body: ApiResult<T>                                     │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  No session? ──── ApiError::not_authenticated() ──┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Store error? ─── StoreError::Duplicate ────── ApiError ───────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── ApiResponse { success: false, message: "Not authenticated" } ── │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business failures never escape as `Err`: the facade folds every
//! `ApiError` into the envelope, keeping the `code` for logs and tests.

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use nutri_core::{CoreError, ValidationError, ValidationErrors};
use nutri_store::StoreError;

use crate::config::ConfigError;

/// API error carried by a failed envelope.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_AUTHENTICATED",
///   "message": "Not authenticated"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for failed envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Value already taken (e.g. email)
    Conflict,

    /// No session user
    NotAuthenticated,

    /// Session user lacks the admin role
    Unauthorized,

    /// Wrong credentials
    InvalidCredentials,

    /// Local storage read/write failed
    StorageError,

    /// Business rule violated
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Insufficient stock
    InsufficientStock,

    /// Payment declined or invalid
    PaymentError,

    /// Feature switched off in the store settings
    Disabled,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// `"<Resource> not found"`.
    pub fn not_found(resource: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn not_authenticated() -> Self {
        ApiError::new(ErrorCode::NotAuthenticated, "Not authenticated")
    }

    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Unauthorized")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn payment(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::PaymentError, message)
    }

    pub fn disabled(feature: &str) -> Self {
        ApiError::new(ErrorCode::Disabled, format!("{} are disabled", feature))
    }
}

/// Result type for facade endpoint bodies.
pub type ApiResult<T> = Result<T, ApiError>;

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io { key, source } => {
                // Log the actual error but return a generic message
                error!(key = %key, error = %source, "Storage I/O failed");
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
            StoreError::Serialization(e) => {
                error!(error = %e, "Snapshot serialization failed");
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
            StoreError::Duplicate { field, .. } => {
                ApiError::new(ErrorCode::Conflict, format!("{} already exists", capitalize(&field)))
            }
            StoreError::Validation(errors) => ApiError::from(errors),
            StoreError::Core(e) => ApiError::from(e),
            StoreError::InvalidResetToken => {
                ApiError::validation("Invalid or expired reset token")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => ApiError::not_found("Product"),
            e @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ (CoreError::CartTooLarge { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::EmptyCart) => ApiError::new(ErrorCode::CartError, e.to_string()),
            e @ CoreError::InvalidCheckoutStep { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, e.to_string())
            }
            CoreError::Validation(e) => ApiError::from(e),
            CoreError::Form(errors) => ApiError::from(errors),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation(errors.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Failures while bringing the storefront up. These abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Could not determine a data directory; set NUTRI_DATA_DIR")]
    NoDataDir,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
