//! # Validation Module
//!
//! Input validation for every form the storefront submits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form schema (this module)                                    │
//! │  ├── Field-level checks (required, length, format, range)              │
//! │  └── ValidationErrors: every failing field, shown inline               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Mock store                                                   │
//! │  ├── Unique email                                                      │
//! │  └── Price / discount invariants re-checked before persisting          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: API envelope                                                 │
//! │  └── {success:false, message} for business failures                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nutri_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_email("user@example.com").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::{ValidationError, ValidationErrors};
use crate::types::{NewProduct, ProductUpdate, UserUpdate};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum length of a login password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum length of a password chosen on the reset page.
pub const MIN_NEW_PASSWORD_LEN: usize = 8;

// =============================================================================
// String Validators
// =============================================================================

/// Requires a non-blank value of at least `min` characters (after trimming).
///
/// ## Example
/// ```rust
/// use nutri_core::validation::validate_min_len;
///
/// assert!(validate_min_len("city", "Oslo", 2).is_ok());
/// assert!(validate_min_len("city", " ", 2).is_err());
/// ```
pub fn validate_min_len(field: &str, value: &str, min: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }

    Ok(())
}

/// Validates a person's display name.
///
/// ## Rules
/// - Must not be empty
/// - At least 2 characters, at most 100
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    validate_min_len("name", name, 2)?;

    if name.trim().chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use nutri_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Magnesium Glycinate").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates an email address.
///
/// A pragmatic check: one `@`, a non-empty local part, and a domain with a
/// dot that neither starts nor ends the domain. No whitespace anywhere.
///
/// ## Example
/// ```rust
/// use nutri_core::validation::validate_email;
///
/// assert!(validate_email("admin@nutrihealth.com").is_ok());
/// assert!(validate_email("admin@nutrihealth").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !domain.starts_with('.') => {
            Ok(())
        }
        _ => Err(invalid()),
    }
}

/// Validates a login password (only its length; the store checks equality).
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a newly chosen password.
///
/// ## Rules
/// - At least 8 characters
/// - At least one uppercase letter, one lowercase letter and one digit
/// - `confirmation` must equal `password`
///
/// ## Example
/// ```rust
/// use nutri_core::validation::validate_new_password;
///
/// assert!(validate_new_password("Secret123", "Secret123").is_ok());
/// assert!(validate_new_password("secret123", "secret123").is_err());
/// assert!(validate_new_password("Secret123", "Secret124").is_err());
/// ```
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if password.chars().count() < MIN_NEW_PASSWORD_LEN {
        errors.push(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_NEW_PASSWORD_LEN,
        });
    } else {
        let has_upper = password.chars().any(|c| c.is_uppercase());
        let has_lower = password.chars().any(|c| c.is_lowercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(has_upper && has_lower && has_digit) {
            errors.push(ValidationError::InvalidFormat {
                field: "password".to_string(),
                reason: "must contain an uppercase letter, a lowercase letter and a number"
                    .to_string(),
            });
        }
    }

    if password != confirmation {
        errors.push(ValidationError::Mismatch {
            field: "confirmPassword".to_string(),
            other: "password".to_string(),
        });
    }

    errors.into_result()
}

/// Validates the profile page's change-password form.
///
/// The current password only needs to look like a password here; the store
/// compares it with the stored one.
pub fn validate_password_change(
    current: &str,
    new_password: &str,
    confirmation: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if current.chars().count() < MIN_PASSWORD_LEN {
        errors.push(ValidationError::Required {
            field: "currentPassword".to_string(),
        });
    }
    if new_password.chars().count() < MIN_NEW_PASSWORD_LEN {
        errors.push(ValidationError::TooShort {
            field: "newPassword".to_string(),
            min: MIN_NEW_PASSWORD_LEN,
        });
    }
    if new_password != confirmation {
        errors.push(ValidationError::Mismatch {
            field: "confirmPassword".to_string(),
            other: "newPassword".to_string(),
        });
    }

    errors.into_result()
}

/// Validates the profile form.
pub fn validate_user_update(update: &UserUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(name) = &update.name {
        errors.check(validate_person_name(name));
    }
    if let Some(email) = &update.email {
        errors.check(validate_email(email));
    }
    errors.into_result()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product page: Add to cart                                              │
/// │                                                                         │
/// │  User picks quantity: 5                                                 │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → cart.add_item                                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1.0,
            max: MAX_ITEM_QUANTITY as f64,
        });
    }

    Ok(())
}

/// Validates a catalog price: finite and not negative. Free items are allowed.
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage (inclusive 0 to 100).
pub fn validate_discount(discount: f64) -> ValidationResult<()> {
    if !discount.is_finite() || !(0.0..=100.0).contains(&discount) {
        return Err(ValidationError::OutOfRange {
            field: "discountPercentage".to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

/// Validates a stock level: a non-negative integer.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0.0,
            max: i64::MAX as f64,
        });
    }

    Ok(())
}

/// Validates a review rating: whole stars from 1 to 5.
pub fn validate_rating(rating: u8) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1.0,
            max: 5.0,
        });
    }

    Ok(())
}

/// Validates a tax rate in percent (admin settings page).
pub fn validate_tax_percentage(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "taxRate".to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the admin "add product" form, reporting every failing field.
pub fn validate_new_product(product: &NewProduct) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_product_name(&product.name));
    if product.description.trim().is_empty() {
        errors.push(ValidationError::Required {
            field: "description".to_string(),
        });
    }
    errors.check(validate_price(product.price));
    if let Some(discount) = product.discount_percentage {
        errors.check(validate_discount(discount));
    }
    if product.category.trim().is_empty() {
        errors.push(ValidationError::Required {
            field: "category".to_string(),
        });
    }
    errors.check(validate_stock(product.stock));

    errors.into_result()
}

/// Validates the fields present in a product patch.
pub fn validate_product_update(update: &ProductUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Some(name) = &update.name {
        errors.check(validate_product_name(name));
    }
    if let Some(description) = &update.description {
        if description.trim().is_empty() {
            errors.push(ValidationError::Required {
                field: "description".to_string(),
            });
        }
    }
    if let Some(price) = update.price {
        errors.check(validate_price(price));
    }
    if let Some(Some(discount)) = update.discount_percentage {
        errors.check(validate_discount(discount));
    }
    if let Some(stock) = update.stock {
        errors.check(validate_stock(stock));
    }

    errors.into_result()
}

/// Validates a review before it is stored.
pub fn validate_review(rating: u8, comment: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validate_rating(rating));
    if comment.trim().is_empty() {
        errors.push(ValidationError::Required {
            field: "comment".to_string(),
        });
    }
    errors.into_result()
}

/// Validates the sign-up form.
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validate_person_name(name));
    errors.check(validate_email(email));
    errors.check(validate_password(password));
    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("  jane.doe+promo@mail.co.uk ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("userexample.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@example").is_err());
        assert!(validate_email("user@.com").is_err());
        assert!(validate_email("user@example.").is_err());
        assert!(validate_email("us er@example.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("admin123").is_ok());
        assert_eq!(
            validate_password("12345"),
            Err(ValidationError::TooShort {
                field: "password".to_string(),
                min: 6
            })
        );
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("Health2024", "Health2024").is_ok());

        let errors = validate_new_password("short", "short").unwrap_err();
        assert!(errors.for_field("password").is_some());

        let errors = validate_new_password("alllowercase1", "alllowercase1").unwrap_err();
        assert!(matches!(
            errors.for_field("password"),
            Some(ValidationError::InvalidFormat { .. })
        ));

        let errors = validate_new_password("Health2024", "Health2025").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.for_field("confirmPassword").is_some());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_and_discount() {
        assert!(validate_price(0.01).is_ok());
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(-4.0).is_err());
        assert!(validate_price(f64::NAN).is_err());

        assert!(validate_discount(0.0).is_ok());
        assert!(validate_discount(100.0).is_ok());
        assert!(validate_discount(100.5).is_err());
        assert!(validate_discount(-1.0).is_err());
    }

    #[test]
    fn test_validate_min_len() {
        assert!(validate_min_len("postalCode", "12345", 5).is_ok());
        assert_eq!(
            validate_min_len("postalCode", "1234", 5),
            Err(ValidationError::TooShort {
                field: "postalCode".to_string(),
                min: 5
            })
        );
        assert_eq!(
            validate_min_len("street", "   ", 5),
            Err(ValidationError::Required {
                field: "street".to_string()
            })
        );
    }

    #[test]
    fn test_validate_new_product_reports_every_field() {
        let form = NewProduct {
            name: String::new(),
            description: " ".to_string(),
            price: -1.0,
            discount_percentage: Some(120.0),
            category: "Vitamins".to_string(),
            stock: -3,
            ..NewProduct::default()
        };

        let errors = validate_new_product(&form).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(
            fields,
            vec!["name", "description", "price", "discountPercentage", "stock"]
        );
    }

    #[test]
    fn test_validate_product_update_checks_present_fields_only() {
        assert!(validate_product_update(&ProductUpdate::default()).is_ok());

        let update = ProductUpdate {
            price: Some(-0.5),
            discount_percentage: Some(None),
            ..ProductUpdate::default()
        };
        let errors = validate_product_update(&update).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.for_field("price").is_some());
    }

    #[test]
    fn test_validate_review() {
        assert!(validate_review(5, "Great taste").is_ok());
        assert!(validate_review(0, "Great taste").is_err());
        assert!(validate_review(6, "Great taste").is_err());

        let errors = validate_review(3, "").unwrap_err();
        assert!(errors.for_field("comment").is_some());
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration("Jane", "jane@example.com", "secret1").is_ok());
        let errors = validate_registration("J", "jane", "123").unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validate_password_change() {
        assert!(validate_password_change("admin123", "newpass99", "newpass99").is_ok());

        let errors = validate_password_change("", "short", "other").unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.for_field("currentPassword").is_some());
        assert!(errors.for_field("newPassword").is_some());
        assert!(errors.for_field("confirmPassword").is_some());
    }

    #[test]
    fn test_validate_user_update() {
        assert!(validate_user_update(&UserUpdate::default()).is_ok());
        let update = UserUpdate {
            name: Some("Jane".to_string()),
            email: Some("not-an-email".to_string()),
        };
        let errors = validate_user_update(&update).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.for_field("email").is_some());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  whey ").unwrap(), "whey");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }
}
