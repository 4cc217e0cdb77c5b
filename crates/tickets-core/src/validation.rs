//! # Validation Module
//!
//! Input validation for item construction and cart limits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request payload (tickets-checkout)                           │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── Configured limits (max items, max quantity)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Item / value constructors (THIS MODULE)                      │
//! │  ├── Ids, quantities, prices                                           │
//! │  └── Precision and percent thresholds (precision.rs, percent.rs)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tickets_core::validation::{validate_item_id, validate_quantity};
//!
//! validate_item_id("ga-admission").unwrap();
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(-1).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted item id.
pub const MAX_ITEM_ID_LENGTH: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a raw item id (before prefixing).
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Only letters, numbers, hyphens and underscores
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > MAX_ITEM_ID_LENGTH {
        return Err(ValidationError::OutOfRange {
            field: "id length".to_string(),
            min: 1,
            max: MAX_ITEM_ID_LENGTH as i64,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an item quantity. Zero is allowed; negatives are not.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity against a configured ceiling.
pub fn validate_quantity_limit(qty: i64, max: i64) -> ValidationResult<()> {
    validate_quantity(qty)?;

    if qty > max {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

/// Validates a ticket price in cents.
///
/// ## Example
/// ```rust
/// use tickets_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());     // Free ticket
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more distinct item fits in the cart.
pub fn validate_cart_size(current_items: usize, max_items: usize) -> ValidationResult<()> {
    if current_items >= max_items {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: max_items as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_id() {
        assert!(validate_item_id("42").is_ok());
        assert!(validate_item_id("vip-pass_2").is_ok());

        assert!(validate_item_id("").is_err());
        assert!(validate_item_id("   ").is_err());
        assert!(validate_item_id("has space").is_err());
        assert!(validate_item_id(&"A".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(1000).is_ok());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_quantity_limit() {
        assert!(validate_quantity_limit(999, 999).is_ok());
        assert!(validate_quantity_limit(1000, 999).is_err());
        assert!(validate_quantity_limit(-1, 999).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0, 100).is_ok());
        assert!(validate_cart_size(99, 100).is_ok());
        assert!(validate_cart_size(100, 100).is_err());
    }
}
