//! # Precision Module
//!
//! Provides `PrecisionValue`, a decimal amount stored as a scaled integer.
//!
//! ## Why Scaled Integers?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: value × 10^precision stored as i64                      │
//! │    PrecisionValue(0.10, 2) → integer 10                                 │
//! │    PrecisionValue(0.20, 2) → integer 20                                 │
//! │    10 + 20 = 30 → 0.30 exactly                                          │
//! │                                                                         │
//! │  Floats are only touched at construction (rounded once) and in get()   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tickets_core::precision::PrecisionValue;
//!
//! let price = PrecisionValue::new(10.99, 2).unwrap();
//! let fee = PrecisionValue::new(0.125, 3).unwrap();
//!
//! // Mixed precision: both sides are lifted to precision 3
//! let total = price.add(&fee);
//! assert_eq!(total.precision(), 3);
//! assert_eq!(total.integer(), 11_115);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::number::IntegerValue;

/// Largest supported number of decimal places.
pub const MAX_PRECISION: u8 = 6;

/// Precision used when none is given (cents).
pub const DEFAULT_PRECISION: u8 = 2;

// =============================================================================
// Precision Value
// =============================================================================

/// A decimal amount held as `integer / 10^precision`.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative amounts represent discounts and refunds
/// - **Immutable**: every operation returns a new value
/// - **Saturating**: arithmetic clamps at the i64 boundary instead of panicking
///
/// ## Where It Is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  TicketItem.price_cents ──► Cart::get_subtotal() ──┐                    │
/// │                                                     ▼                   │
/// │  PercentValue (precision 4) ──► FeeItem / CouponItem amounts           │
/// │                                                     │                   │
/// │                          Cart::get_total() ◄────────┘                   │
/// │                                 │                                       │
/// │                                 ▼                                       │
/// │                 CurrencyFormatter::create(total).get() → "$11.00"      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ScaledParts", into = "ScaledParts")]
pub struct PrecisionValue {
    integer: i64,
    precision: u8,
}

/// Wire form of a [`PrecisionValue`]; validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScaledParts {
    integer: i64,
    precision: u8,
}

impl TryFrom<ScaledParts> for PrecisionValue {
    type Error = ValidationError;

    fn try_from(parts: ScaledParts) -> Result<Self, Self::Error> {
        PrecisionValue::from_scaled(parts.integer, parts.precision)
    }
}

impl From<PrecisionValue> for ScaledParts {
    fn from(value: PrecisionValue) -> Self {
        ScaledParts {
            integer: value.integer,
            precision: value.precision,
        }
    }
}

impl PrecisionValue {
    /// Creates a value by rounding `value` to `precision` decimal places.
    ///
    /// Rounding is half away from zero.
    ///
    /// ## Errors
    /// - `PrecisionTooLarge` when `precision > MAX_PRECISION`
    /// - `NotFinite` for NaN or infinite input
    /// - `Overflow` when the scaled value does not fit in an i64
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::precision::PrecisionValue;
    ///
    /// let value = PrecisionValue::new(12.346, 2).unwrap();
    /// assert_eq!(value.integer(), 1235);
    /// assert!(PrecisionValue::new(1.0, 7).is_err());
    /// ```
    pub fn new(value: f64, precision: u8) -> Result<Self, ValidationError> {
        check_precision(precision)?;

        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "value".to_string(),
            });
        }

        let scaled = (value * scale(precision) as f64).round();
        if scaled >= i64::MAX as f64 || scaled < i64::MIN as f64 {
            return Err(ValidationError::Overflow {
                field: "value".to_string(),
                precision,
            });
        }

        Ok(PrecisionValue {
            integer: scaled as i64,
            precision,
        })
    }

    /// Creates a value from numeric text such as `"12.50"`.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::precision::PrecisionValue;
    ///
    /// let value = PrecisionValue::parse(" 12.50 ", 2).unwrap();
    /// assert_eq!(value.integer(), 1250);
    /// assert!(PrecisionValue::parse("twelve", 2).is_err());
    /// ```
    pub fn parse(text: &str, precision: u8) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        let value: f64 = trimmed.parse().map_err(|_| ValidationError::NotNumeric {
            field: "value".to_string(),
            value: trimmed.to_string(),
        })?;
        Self::new(value, precision)
    }

    /// Creates a value from an integer that is already scaled.
    ///
    /// `from_scaled(1099, 2)` is 10.99.
    pub fn from_scaled(integer: i64, precision: u8) -> Result<Self, ValidationError> {
        check_precision(precision)?;
        Ok(PrecisionValue { integer, precision })
    }

    /// Creates a precision 2 value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        PrecisionValue {
            integer: cents,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Zero at the given precision.
    pub fn zero(precision: u8) -> Result<Self, ValidationError> {
        Self::from_scaled(0, precision)
    }

    /// Returns the decimal value.
    ///
    /// For display use [`fmt::Display`] or a currency formatter instead,
    /// which work from the integer and never show float noise.
    pub fn get(&self) -> f64 {
        self.integer as f64 / scale(self.precision) as f64
    }

    /// Returns the scaled integer.
    #[inline]
    pub const fn integer(&self) -> i64 {
        self.integer
    }

    /// Returns the number of decimal places.
    #[inline]
    pub const fn precision(&self) -> u8 {
        self.precision
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.integer == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.integer > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.integer < 0
    }

    /// Adds two values.
    ///
    /// If the precisions differ, both operands are lifted to the larger one
    /// first, so no digits are dropped.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::precision::PrecisionValue;
    ///
    /// let a = PrecisionValue::new(1.5, 1).unwrap();
    /// let b = PrecisionValue::new(0.25, 2).unwrap();
    /// let sum = a.add(&b);
    /// assert_eq!((sum.integer(), sum.precision()), (175, 2));
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &PrecisionValue) -> PrecisionValue {
        let precision = self.precision.max(other.precision);
        let lhs = self.lift_to(precision);
        let rhs = other.lift_to(precision);

        PrecisionValue {
            integer: lhs.saturating_add(rhs),
            precision,
        }
    }

    /// Subtracts `other`, implemented as adding its negation.
    pub fn subtract(&self, other: &PrecisionValue) -> PrecisionValue {
        self.add(&other.negate())
    }

    /// Returns the value with its sign flipped.
    pub const fn negate(&self) -> PrecisionValue {
        PrecisionValue {
            integer: self.integer.saturating_neg(),
            precision: self.precision,
        }
    }

    /// Returns the absolute value.
    pub const fn abs(&self) -> PrecisionValue {
        PrecisionValue {
            integer: self.integer.saturating_abs(),
            precision: self.precision,
        }
    }

    /// Multiplies by an integer, keeping this value's precision.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::number::IntegerValue;
    /// use tickets_core::precision::PrecisionValue;
    ///
    /// let unit = PrecisionValue::from_cents(299);
    /// let line = unit.multiply_by_integer(&IntegerValue::new(3));
    /// assert_eq!(line.integer(), 897);
    /// ```
    pub fn multiply_by_integer(&self, factor: &IntegerValue) -> PrecisionValue {
        PrecisionValue {
            integer: self.integer.saturating_mul(factor.get()),
            precision: self.precision,
        }
    }

    /// Sums values by folding [`add`](Self::add) from zero at the default
    /// precision.
    ///
    /// The result precision is the largest of the inputs and
    /// `DEFAULT_PRECISION`.
    pub fn sum<'a, I>(values: I) -> PrecisionValue
    where
        I: IntoIterator<Item = &'a PrecisionValue>,
    {
        values
            .into_iter()
            .fold(PrecisionValue::from_cents(0), |acc, value| acc.add(value))
    }

    /// Re-expresses the value at another precision.
    ///
    /// Returns `self` unchanged if the precision is the same; otherwise the
    /// decimal value is rebuilt and re-rounded at the new precision. Going to
    /// a lower precision and back does not restore the dropped digits.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::precision::PrecisionValue;
    ///
    /// let value = PrecisionValue::new(1.2345, 4).unwrap();
    /// let cents = value.convert_to_precision(2).unwrap();
    /// assert_eq!(cents.integer(), 123);
    ///
    /// let back = cents.convert_to_precision(4).unwrap();
    /// assert_eq!(back.integer(), 12_300);
    /// ```
    pub fn convert_to_precision(&self, precision: u8) -> Result<PrecisionValue, ValidationError> {
        if precision == self.precision {
            return Ok(*self);
        }
        PrecisionValue::new(self.get(), precision)
    }

    /// Scales the integer up to a larger precision without leaving integer
    /// arithmetic.
    fn lift_to(&self, precision: u8) -> i64 {
        debug_assert!(precision >= self.precision);
        self.integer
            .saturating_mul(scale(precision - self.precision))
    }
}

/// Returns `10^precision`. Only called with precisions up to MAX_PRECISION.
#[inline]
pub(crate) const fn scale(precision: u8) -> i64 {
    10_i64.pow(precision as u32)
}

pub(crate) fn check_precision(precision: u8) -> Result<(), ValidationError> {
    if precision > MAX_PRECISION {
        return Err(ValidationError::PrecisionTooLarge {
            precision,
            max: MAX_PRECISION,
        });
    }
    Ok(())
}

// =============================================================================
// Trait Implementations
// =============================================================================
// Operator traits are implemented by path so that `value.add(&other)` always
// resolves to the inherent method.

/// Renders exactly `precision` decimals, e.g. `-12.50`.
impl fmt::Display for PrecisionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.integer < 0 { "-" } else { "" };
        let magnitude = self.integer.unsigned_abs();
        let divisor = scale(self.precision) as u64;
        let whole = magnitude / divisor;

        if self.precision == 0 {
            return write!(f, "{}{}", sign, whole);
        }

        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            whole,
            magnitude % divisor,
            width = self.precision as usize
        )
    }
}

impl Default for PrecisionValue {
    fn default() -> Self {
        PrecisionValue::from_cents(0)
    }
}

impl std::ops::Add for PrecisionValue {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        PrecisionValue::add(&self, &other)
    }
}

impl std::ops::Sub for PrecisionValue {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        self.subtract(&other)
    }
}

impl std::ops::Neg for PrecisionValue {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

impl std::ops::Mul<IntegerValue> for PrecisionValue {
    type Output = Self;

    #[inline]
    fn mul(self, factor: IntegerValue) -> Self {
        self.multiply_by_integer(&factor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_rounds_to_precision() {
        let value = PrecisionValue::new(10.99, 2).unwrap();
        assert_eq!(value.integer(), 1099);
        assert_eq!(value.precision(), 2);

        // Half away from zero
        assert_eq!(PrecisionValue::new(0.125, 2).unwrap().integer(), 13);
        assert_eq!(PrecisionValue::new(-0.125, 2).unwrap().integer(), -13);
        assert_eq!(PrecisionValue::new(7.6, 0).unwrap().integer(), 8);
    }

    #[test]
    fn test_new_rejects_invalid_input() {
        assert_eq!(
            PrecisionValue::new(1.0, 7),
            Err(ValidationError::PrecisionTooLarge { precision: 7, max: 6 })
        );
        assert!(PrecisionValue::new(f64::NAN, 2).is_err());
        assert!(PrecisionValue::new(f64::INFINITY, 2).is_err());
        assert!(matches!(
            PrecisionValue::new(1e18, 6),
            Err(ValidationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_parse() {
        assert_eq!(PrecisionValue::parse("12.5", 2).unwrap().integer(), 1250);
        assert_eq!(PrecisionValue::parse("-3", 1).unwrap().integer(), -30);
        assert!(matches!(
            PrecisionValue::parse("12,5", 2),
            Err(ValidationError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_get_reconstructs_decimal() {
        let value = PrecisionValue::from_scaled(123_456, 3).unwrap();
        assert!((value.get() - 123.456).abs() < 1e-9);
        assert!(PrecisionValue::from_scaled(1, 9).is_err());
    }

    #[test]
    fn test_add_same_precision() {
        let a = PrecisionValue::new(0.1, 2).unwrap();
        let b = PrecisionValue::new(0.2, 2).unwrap();
        let sum = a.add(&b);
        assert_eq!(sum.integer(), 30);
        assert_eq!(sum.to_string(), "0.30");
    }

    #[test]
    fn test_add_mixed_precision_lifts_to_larger() {
        let a = PrecisionValue::new(10.99, 2).unwrap();
        let b = PrecisionValue::new(0.125, 3).unwrap();

        let sum = a.add(&b);
        assert_eq!(sum.precision(), 3);
        assert_eq!(sum.integer(), 11_115);

        // Commutative
        assert_eq!(b.add(&a), sum);
    }

    #[test]
    fn test_subtract_and_negate() {
        let a = PrecisionValue::from_cents(1000);
        let b = PrecisionValue::from_cents(1500);

        assert_eq!(a.subtract(&b).integer(), -500);
        assert_eq!((a - b).integer(), -500);
        assert_eq!((-a).integer(), -1000);
        assert_eq!(a.negate().abs(), a);
    }

    #[test]
    fn test_multiply_by_integer_keeps_precision() {
        let unit = PrecisionValue::new(2.999, 3).unwrap();
        let line = unit * IntegerValue::new(3);
        assert_eq!(line.integer(), 8997);
        assert_eq!(line.precision(), 3);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = PrecisionValue::from_cents(i64::MAX);
        assert_eq!(max.add(&PrecisionValue::from_cents(1)).integer(), i64::MAX);
        assert_eq!(
            max.multiply_by_integer(&IntegerValue::new(2)).integer(),
            i64::MAX
        );
    }

    #[test]
    fn test_sum() {
        let values = [
            PrecisionValue::from_cents(100),
            PrecisionValue::new(0.005, 3).unwrap(),
            PrecisionValue::from_cents(-50),
        ];
        let total = PrecisionValue::sum(&values);
        assert_eq!(total.precision(), 3);
        assert_eq!(total.integer(), 505);

        let empty: [PrecisionValue; 0] = [];
        assert_eq!(PrecisionValue::sum(&empty), PrecisionValue::from_cents(0));
    }

    #[test]
    fn test_convert_to_precision() {
        let value = PrecisionValue::new(1.2345, 4).unwrap();
        assert_eq!(value.convert_to_precision(4).unwrap(), value);

        let lower = value.convert_to_precision(2).unwrap();
        assert_eq!(lower.integer(), 123);

        // Precision-losing round trips do not restore digits
        let back = lower.convert_to_precision(4).unwrap();
        assert_eq!(back.integer(), 12_300);
        assert_ne!(back, value);

        assert!(value.convert_to_precision(8).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(PrecisionValue::from_cents(1099).to_string(), "10.99");
        assert_eq!(PrecisionValue::from_cents(-550).to_string(), "-5.50");
        assert_eq!(PrecisionValue::from_cents(5).to_string(), "0.05");
        assert_eq!(PrecisionValue::from_scaled(-7, 0).unwrap().to_string(), "-7");
        assert_eq!(
            PrecisionValue::from_scaled(i64::MIN, 2).unwrap().to_string(),
            "-92233720368547758.08"
        );
    }

    #[test]
    fn test_serde_rejects_invalid_precision() {
        let json = serde_json::to_string(&PrecisionValue::from_cents(1250)).unwrap();
        assert_eq!(json, r#"{"integer":1250,"precision":2}"#);

        let bad = serde_json::from_str::<PrecisionValue>(r#"{"integer":1,"precision":12}"#);
        assert!(bad.is_err());
    }

    proptest! {
        /// Raising precision and coming back lands within one unit of the
        /// original precision.
        #[test]
        fn prop_round_trip_through_higher_precision(
            value in -1_000_000.0f64..1_000_000.0,
            precision in 0u8..=4,
            extra in 0u8..=2,
        ) {
            let higher = precision + extra;
            let original = PrecisionValue::new(value, precision).unwrap();
            let round_trip = original
                .convert_to_precision(higher)
                .unwrap()
                .convert_to_precision(precision)
                .unwrap();

            let tolerance = 1.0 / scale(precision) as f64;
            prop_assert!((round_trip.get() - value).abs() <= tolerance);
        }

        #[test]
        fn prop_subtract_inverts_add(a in -1_000_000_000i64..1_000_000_000, b in -1_000_000_000i64..1_000_000_000) {
            let lhs = PrecisionValue::from_cents(a);
            let rhs = PrecisionValue::from_cents(b);
            prop_assert_eq!(lhs.add(&rhs).subtract(&rhs), lhs);
        }
    }
}
