//! # Store Error Types
//!
//! Error types for mock database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error / ValidationErrors                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the storage key / entity context      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in storefront) ← Folded into {success:false, message}       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Absence is not an error here: lookups return `Option`, removals return
//! `bool`.

use nutri_core::{CoreError, ValidationError, ValidationErrors};
use thiserror::Error;

/// Mock database errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend could not read or write a key.
    ///
    /// ## When This Occurs
    /// - Data directory is missing and cannot be created
    /// - File permissions issue
    /// - Disk full
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unique constraint violation (e.g. email already registered).
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Input rejected before it reached a table.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Business rule violation from the domain layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A password reset token is unknown, used or expired.
    #[error("Invalid or expired reset token")]
    InvalidResetToken,
}

impl StoreError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            key: key.into(),
            source,
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push(err);
        StoreError::Validation(errors)
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_validation_error_is_wrapped() {
        let err: StoreError = ValidationError::Required {
            field: "email".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "email is required");
    }

    #[test]
    fn test_duplicate_message() {
        let err = StoreError::duplicate("email", "admin@nutrihealth.com");
        assert_eq!(
            err.to_string(),
            "Duplicate email: 'admin@nutrihealth.com' already exists"
        );
    }
}
