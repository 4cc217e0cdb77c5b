//! # Error Types
//!
//! Domain-specific error types for tickets-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tickets-core errors (this file)                                       │
//! │  ├── CoreError        - Cart and arithmetic failures                   │
//! │  └── ValidationError  - Construction-time input validation             │
//! │                                                                         │
//! │  tickets-checkout errors (separate crate)                              │
//! │  ├── ConfigError      - Config file / environment failures             │
//! │  └── ApiError         - What callers see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Caller                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, limits)
//! 3. Errors are enum variants, never String
//! 4. Construction fails fast; there is no recovery path inside the core

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing errors.
///
/// These represent cart rule violations or arithmetic that cannot be
/// expressed in the fixed precision representation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No item with the given prefixed id is in the cart.
    #[error("Cart item not found: {0}")]
    ItemNotFound(String),

    /// The cart total left the 32-bit cent range.
    ///
    /// Only produced by [`Cart::checked_total`](crate::cart::Cart::checked_total);
    /// [`Cart::get_total`](crate::cart::Cart::get_total) clamps instead.
    #[error("Cart total overflowed the maximum of {max} cents")]
    TotalOverflow { max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by value constructors (`PrecisionValue::new`, `PercentValue::new`,
/// `IntegerValue::parse`, ...) and by quantity updates.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Input could not be read as a number.
    #[error("{field} must be numeric, got '{value}'")]
    NotNumeric { field: String, value: String },

    /// Float input was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Requested precision exceeds the supported maximum.
    #[error("precision {precision} exceeds the maximum of {max}")]
    PrecisionTooLarge { precision: u8, max: u8 },

    /// Percent magnitude is below the smallest representable percent.
    #[error("percent {percent} is below the minimum of {min}%")]
    BelowMinimumPercent { percent: f64, min: f64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. unknown symbol position, malformed id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value does not fit the fixed precision representation.
    #[error("{field} is too large to represent at precision {precision}")]
    Overflow { field: String, precision: u8 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemNotFound("ticket_42".to_string());
        assert_eq!(err.to_string(), "Cart item not found: ticket_42");

        let err = CoreError::TotalOverflow { max: 2_147_483_647 };
        assert_eq!(
            err.to_string(),
            "Cart total overflowed the maximum of 2147483647 cents"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::PrecisionTooLarge { precision: 7, max: 6 };
        assert_eq!(err.to_string(), "precision 7 exceeds the maximum of 6");

        let err = ValidationError::NotNumeric {
            field: "value".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "value must be numeric, got 'abc'");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
