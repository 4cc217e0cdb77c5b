//! # Currency Formatting
//!
//! Turns a `PrecisionValue` into a display string such as `$1,234.50` or
//! `1.234,50€`.
//!
//! ## Configuration Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout.toml / env ──► CurrencyFormat (immutable settings)           │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                        CurrencyFormatter::new(format)                   │
//! │                                 │  (validated once, passed by reference)│
//! │                                 ▼                                       │
//! │      formatter.create(total) ──► CurrencyValue ──► get() → "$11.00"    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There are no process-wide defaults: whoever renders money holds a
//! formatter.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::precision::{check_precision, scale, PrecisionValue};

// =============================================================================
// Settings
// =============================================================================

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    /// `$10.00`
    #[default]
    Before,
    /// `10.00€`
    After,
}

impl std::str::FromStr for SymbolPosition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "before" | "prefix" => Ok(SymbolPosition::Before),
            "after" | "postfix" | "suffix" => Ok(SymbolPosition::After),
            other => Err(ValidationError::InvalidFormat {
                field: "symbol position".to_string(),
                reason: format!("'{}' is not one of: before, after", other),
            }),
        }
    }
}

/// Locale settings for rendering money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default)]
    pub position: SymbolPosition,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    /// Decimal places shown; at most `MAX_PRECISION`.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u8,
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_thousands_separator() -> String {
    ",".to_string()
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

fn default_decimal_places() -> u8 {
    2
}

impl Default for CurrencyFormat {
    /// US dollars: `$1,234.56`.
    fn default() -> Self {
        CurrencyFormat {
            symbol: default_symbol(),
            position: SymbolPosition::Before,
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
            decimal_places: default_decimal_places(),
        }
    }
}

impl CurrencyFormat {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_precision(self.decimal_places)?;

        if self.decimal_places > 0 && self.decimal_separator.is_empty() {
            return Err(ValidationError::Required {
                field: "decimal separator".to_string(),
            });
        }

        Ok(())
    }
}

// =============================================================================
// Formatter
// =============================================================================

/// Renders values with one validated `CurrencyFormat`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyFormatter {
    format: CurrencyFormat,
}

impl CurrencyFormatter {
    /// ## Errors
    /// Fails if the format asks for more than `MAX_PRECISION` decimals or
    /// has decimals without a decimal separator.
    pub fn new(format: CurrencyFormat) -> Result<Self, ValidationError> {
        format.validate()?;
        Ok(CurrencyFormatter { format })
    }

    pub fn settings(&self) -> &CurrencyFormat {
        &self.format
    }

    /// Wraps a value for display with this formatter's settings.
    pub fn create(&self, value: PrecisionValue) -> CurrencyValue<'_> {
        CurrencyValue {
            value,
            formatter: self,
        }
    }

    /// Formats an amount in cents.
    pub fn format_cents(&self, cents: i64) -> String {
        self.format(&PrecisionValue::from_cents(cents))
    }

    /// Formats a value.
    ///
    /// The value is converted to the configured decimal places first, so
    /// `1234.567` with two places renders as `$1,234.57`.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::currency::CurrencyFormatter;
    /// use tickets_core::precision::PrecisionValue;
    ///
    /// let formatter = CurrencyFormatter::default();
    /// assert_eq!(formatter.format(&PrecisionValue::from_cents(123_456)), "$1,234.56");
    /// assert_eq!(formatter.format(&PrecisionValue::from_cents(-550)), "-$5.50");
    /// ```
    pub fn format(&self, value: &PrecisionValue) -> String {
        // decimal_places was validated in new(), so conversion only fails
        // on overflow; fall back to the value as given in that case.
        let value = value
            .convert_to_precision(self.format.decimal_places)
            .unwrap_or(*value);

        let precision = value.precision();
        let magnitude = value.integer().unsigned_abs();
        let divisor = scale(precision) as u64;

        let mut number = group_thousands(magnitude / divisor, &self.format.thousands_separator);
        if precision > 0 {
            number.push_str(&self.format.decimal_separator);
            number.push_str(&format!(
                "{:0width$}",
                magnitude % divisor,
                width = precision as usize
            ));
        }

        let sign = if value.is_negative() { "-" } else { "" };
        match self.format.position {
            SymbolPosition::Before => format!("{}{}{}", sign, self.format.symbol, number),
            SymbolPosition::After => format!("{}{}{}", sign, number, self.format.symbol),
        }
    }
}

/// Inserts `separator` between every group of three digits.
fn group_thousands(whole: u64, separator: &str) -> String {
    let digits = whole.to_string();
    if separator.is_empty() || digits.len() <= 3 {
        return digits;
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    grouped
}

// =============================================================================
// Currency Value
// =============================================================================

/// A value paired with the formatter that renders it.
///
/// Not a numeric type: do arithmetic on the raw value, not on this.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyValue<'a> {
    value: PrecisionValue,
    formatter: &'a CurrencyFormatter,
}

impl CurrencyValue<'_> {
    /// Returns the formatted string.
    pub fn get(&self) -> String {
        self.formatter.format(&self.value)
    }

    /// Returns a copy of the wrapped value.
    pub fn get_raw_value(&self) -> PrecisionValue {
        self.value
    }
}

impl fmt::Display for CurrencyValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn euro() -> CurrencyFormatter {
        CurrencyFormatter::new(CurrencyFormat {
            symbol: "€".to_string(),
            position: SymbolPosition::After,
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            decimal_places: 2,
        })
        .unwrap()
    }

    #[test]
    fn test_default_format() {
        let formatter = CurrencyFormatter::default();
        assert_eq!(formatter.format_cents(1100), "$11.00");
        assert_eq!(formatter.format_cents(0), "$0.00");
        assert_eq!(formatter.format_cents(5), "$0.05");
        assert_eq!(formatter.format_cents(123_456_789), "$1,234,567.89");
        assert_eq!(formatter.format_cents(-100_000), "-$1,000.00");
    }

    #[test]
    fn test_symbol_after_with_locale_separators() {
        let formatter = euro();
        assert_eq!(formatter.format_cents(123_456), "1.234,56€");
        assert_eq!(formatter.format_cents(-99), "-0,99€");
    }

    #[test]
    fn test_converts_to_configured_places() {
        let yen = CurrencyFormatter::new(CurrencyFormat {
            symbol: "¥".to_string(),
            decimal_places: 0,
            ..CurrencyFormat::default()
        })
        .unwrap();
        assert_eq!(yen.format_cents(123_456), "¥1,235");

        let precise = PrecisionValue::new(1234.567, 3).unwrap();
        assert_eq!(CurrencyFormatter::default().format(&precise), "$1,234.57");
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let too_precise = CurrencyFormat {
            decimal_places: 9,
            ..CurrencyFormat::default()
        };
        assert!(CurrencyFormatter::new(too_precise).is_err());

        let no_separator = CurrencyFormat {
            decimal_separator: String::new(),
            ..CurrencyFormat::default()
        };
        assert!(CurrencyFormatter::new(no_separator).is_err());
    }

    #[test]
    fn test_currency_value() {
        let formatter = euro();
        let raw = PrecisionValue::from_cents(1999);
        let value = formatter.create(raw);

        assert_eq!(value.get(), "19,99€");
        assert_eq!(value.to_string(), "19,99€");
        assert_eq!(value.get_raw_value(), raw);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, ","), "0");
        assert_eq!(group_thousands(999, ","), "999");
        assert_eq!(group_thousands(1000, ","), "1,000");
        assert_eq!(group_thousands(1_234_567, " "), "1 234 567");
        assert_eq!(group_thousands(1_234_567, ""), "1234567");
    }

    #[test]
    fn test_symbol_position_parsing() {
        assert_eq!("after".parse::<SymbolPosition>().unwrap(), SymbolPosition::After);
        assert_eq!("Before".parse::<SymbolPosition>().unwrap(), SymbolPosition::Before);
        assert!("middle".parse::<SymbolPosition>().is_err());
    }
}
