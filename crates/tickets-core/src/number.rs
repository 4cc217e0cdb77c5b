//! # Number Leaves
//!
//! Validated scalar wrappers used as inputs to the precision arithmetic.
//!
//! ```text
//! IntegerValue          any i64 (quantities, multipliers)
//! PositiveIntegerValue  i64 >= 0 (quantities that may not go negative)
//! FloatValue            finite f64 (raw decimal input before rounding)
//! ```
//!
//! Each constructor validates once; after that the value can be passed
//! around without re-checking.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

// =============================================================================
// Integer Value
// =============================================================================

/// A whole number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IntegerValue(i64);

impl IntegerValue {
    #[inline]
    pub const fn new(value: i64) -> Self {
        IntegerValue(value)
    }

    /// Parses integer text such as `"42"` or `" -3 "`.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::number::IntegerValue;
    ///
    /// assert_eq!(IntegerValue::parse("42").unwrap().get(), 42);
    /// assert!(IntegerValue::parse("4.2").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        trimmed
            .parse::<i64>()
            .map(IntegerValue)
            .map_err(|_| ValidationError::NotNumeric {
                field: "integer".to_string(),
                value: trimmed.to_string(),
            })
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for IntegerValue {
    fn from(value: i64) -> Self {
        IntegerValue(value)
    }
}

impl fmt::Display for IntegerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Positive Integer Value
// =============================================================================

/// A whole number that is not negative. Zero is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PositiveIntegerValue(i64);

impl PositiveIntegerValue {
    /// ## Example
    /// ```rust
    /// use tickets_core::number::PositiveIntegerValue;
    ///
    /// assert!(PositiveIntegerValue::new(0).is_ok());
    /// assert!(PositiveIntegerValue::new(-1).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: "value".to_string(),
            });
        }
        Ok(PositiveIntegerValue(value))
    }

    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        Self::new(IntegerValue::parse(text)?.get())
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for PositiveIntegerValue {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        PositiveIntegerValue::new(value)
    }
}

impl From<PositiveIntegerValue> for i64 {
    fn from(value: PositiveIntegerValue) -> Self {
        value.0
    }
}

impl From<PositiveIntegerValue> for IntegerValue {
    fn from(value: PositiveIntegerValue) -> Self {
        IntegerValue(value.0)
    }
}

// =============================================================================
// Float Value
// =============================================================================

/// A finite floating point number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FloatValue(f64);

impl FloatValue {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "float".to_string(),
            });
        }
        Ok(FloatValue(value))
    }

    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| ValidationError::NotNumeric {
                field: "float".to_string(),
                value: trimmed.to_string(),
            })?;
        Self::new(value)
    }

    #[inline]
    pub const fn get(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for FloatValue {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        FloatValue::new(value)
    }
}

impl From<FloatValue> for f64 {
    fn from(value: FloatValue) -> Self {
        value.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_parse() {
        assert_eq!(IntegerValue::parse(" -3 ").unwrap().get(), -3);
        assert!(matches!(
            IntegerValue::parse("three"),
            Err(ValidationError::NotNumeric { .. })
        ));
        assert!(IntegerValue::parse("").is_err());
    }

    #[test]
    fn test_positive_integer() {
        assert_eq!(PositiveIntegerValue::new(5).unwrap().get(), 5);
        assert_eq!(
            PositiveIntegerValue::new(-1),
            Err(ValidationError::MustNotBeNegative {
                field: "value".to_string()
            })
        );
        assert!(PositiveIntegerValue::parse("-7").is_err());

        let as_integer: IntegerValue = PositiveIntegerValue::new(9).unwrap().into();
        assert_eq!(as_integer.get(), 9);
    }

    #[test]
    fn test_float_value() {
        assert_eq!(FloatValue::parse("2.5").unwrap().get(), 2.5);
        assert!(FloatValue::new(f64::NAN).is_err());
        assert!(FloatValue::new(f64::NEG_INFINITY).is_err());
        assert!(FloatValue::parse("abc").is_err());
    }

    #[test]
    fn test_serde_validates() {
        assert!(serde_json::from_str::<PositiveIntegerValue>("3").is_ok());
        assert!(serde_json::from_str::<PositiveIntegerValue>("-3").is_err());
    }
}
