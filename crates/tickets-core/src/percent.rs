//! # Percent Module
//!
//! `PercentValue` stores a percentage as a decimal fraction at precision 4.
//!
//! ```text
//! Input (percent)   Stored fraction   Integer @ precision 4
//! ───────────────   ───────────────   ─────────────────────
//!      10             0.1000              1000
//!      8.25           0.0825               825
//!      0.01           0.0001                 1   ← smallest accepted
//!      0.004          rejected (below 0.01%)
//! ```
//!
//! One unit of the stored integer is a basis point, so percent-of-amount
//! math stays in integers: `cents × integer / 10_000`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::precision::PrecisionValue;

/// Fixed precision of every percent.
pub const PERCENT_PRECISION: u8 = 4;

/// Smallest accepted magnitude, as a decimal fraction (0.01%).
pub const MIN_PERCENT_DECIMAL: f64 = 0.0001;

/// A percentage such as 10% or -2.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PercentValue(PrecisionValue);

impl PercentValue {
    /// Creates a percent from a percent number (`10.0` for 10%).
    ///
    /// ## Errors
    /// - `NotFinite` for NaN or infinite input
    /// - `BelowMinimumPercent` if the magnitude is under 0.01%
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::percent::PercentValue;
    ///
    /// let ten = PercentValue::new(10.0).unwrap();
    /// assert_eq!(ten.get_as_decimal(), 0.1);
    /// assert_eq!(ten.to_string(), "10.00%");
    ///
    /// assert!(PercentValue::new(0.001).is_err());
    /// ```
    pub fn new(percent: f64) -> Result<Self, ValidationError> {
        if !percent.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "percent".to_string(),
            });
        }

        let decimal = percent / 100.0;
        let value = PrecisionValue::new(decimal, PERCENT_PRECISION)?;

        // Compare with a little slack so 0.01% itself is not lost to float noise
        if decimal.abs() < MIN_PERCENT_DECIMAL - f64::EPSILON || value.is_zero() {
            return Err(ValidationError::BelowMinimumPercent {
                percent,
                min: MIN_PERCENT_DECIMAL * 100.0,
            });
        }

        Ok(PercentValue(value))
    }

    /// Returns the percent number, e.g. `10.0` for 10%.
    pub fn get_as_percent(&self) -> f64 {
        self.0.integer() as f64 / 100.0
    }

    /// Returns the decimal fraction, e.g. `0.1` for 10%.
    pub fn get_as_decimal(&self) -> f64 {
        self.0.get()
    }

    /// Returns the underlying precision 4 value.
    #[inline]
    pub const fn as_precision_value(&self) -> &PrecisionValue {
        &self.0
    }

    /// Applies the percent to an amount in cents.
    ///
    /// Rounds half away from zero; saturates at the i64 boundary.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::percent::PercentValue;
    ///
    /// let fee = PercentValue::new(10.0).unwrap();
    /// assert_eq!(fee.apply_to(1000), 100);
    ///
    /// let tax = PercentValue::new(8.25).unwrap();
    /// assert_eq!(tax.apply_to(1000), 83); // 82.5 rounds up
    /// ```
    pub fn apply_to(&self, cents: i64) -> i64 {
        let product = i128::from(cents) * i128::from(self.0.integer());
        let rounded = (product.abs() + 5_000) / 10_000 * product.signum();

        i64::try_from(rounded).unwrap_or(if rounded > 0 { i64::MAX } else { i64::MIN })
    }
}

impl TryFrom<f64> for PercentValue {
    type Error = ValidationError;

    fn try_from(percent: f64) -> Result<Self, Self::Error> {
        PercentValue::new(percent)
    }
}

impl From<PercentValue> for f64 {
    fn from(value: PercentValue) -> Self {
        value.get_as_percent()
    }
}

impl From<PercentValue> for PrecisionValue {
    fn from(value: PercentValue) -> Self {
        value.0
    }
}

impl AsRef<PrecisionValue> for PercentValue {
    fn as_ref(&self) -> &PrecisionValue {
        &self.0
    }
}

/// Renders as `"NN.NN%"`.
impl fmt::Display for PercentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let integer = self.0.integer();
        let sign = if integer < 0 { "-" } else { "" };
        let basis_points = integer.unsigned_abs();
        write!(f, "{}{}.{:02}%", sign, basis_points / 100, basis_points % 100)
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
    fn test_stores_fraction_at_precision_four() {
        let percent = PercentValue::new(8.25).unwrap();
        assert_eq!(percent.as_precision_value().integer(), 825);
        assert_eq!(percent.as_precision_value().precision(), PERCENT_PRECISION);
        assert!((percent.get_as_decimal() - 0.0825).abs() < 1e-12);
        assert!((percent.get_as_percent() - 8.25).abs() < 1e-12);
    }

    #[test]
    fn test_minimum_threshold() {
        assert!(PercentValue::new(0.01).is_ok());
        assert!(PercentValue::new(-0.01).is_ok());
        assert!(matches!(
            PercentValue::new(0.009),
            Err(ValidationError::BelowMinimumPercent { .. })
        ));
        assert!(PercentValue::new(0.0).is_err());
        assert!(PercentValue::new(f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(PercentValue::new(10.0).unwrap().to_string(), "10.00%");
        assert_eq!(PercentValue::new(0.5).unwrap().to_string(), "0.50%");
        assert_eq!(PercentValue::new(-2.25).unwrap().to_string(), "-2.25%");
        assert_eq!(PercentValue::new(150.0).unwrap().to_string(), "150.00%");
    }

    #[test]
    fn test_apply_to_rounds_half_away_from_zero() {
        let ten = PercentValue::new(10.0).unwrap();
        assert_eq!(ten.apply_to(1000), 100);
        assert_eq!(ten.apply_to(-1000), -100);
        assert_eq!(ten.apply_to(5), 1); // 0.5 → 1
        assert_eq!(ten.apply_to(-5), -1);
        assert_eq!(ten.apply_to(0), 0);

        let hundred = PercentValue::new(100.0).unwrap();
        assert_eq!(hundred.apply_to(i64::MAX), i64::MAX);
        let big = PercentValue::new(200.0).unwrap();
        assert_eq!(big.apply_to(i64::MAX), i64::MAX);
    }

    #[test]
    fn test_serde_as_percent_number() {
        let percent: PercentValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(percent.to_string(), "12.50%");
        assert_eq!(serde_json::to_string(&percent).unwrap(), "12.5");
        assert!(serde_json::from_str::<PercentValue>("0.0").is_err());
    }

    proptest! {
        /// Percents with at most two decimals survive storage unchanged.
        #[test]
        fn prop_get_as_percent_round_trips(hundredths in 1i64..=1_000_000, negative in any::<bool>()) {
            let signed = if negative { -hundredths } else { hundredths };
            let percent = signed as f64 / 100.0;
            let value = PercentValue::new(percent).unwrap();
            prop_assert!((value.get_as_percent() - percent).abs() < 1e-9);
        }
    }
}
