//! # Error Types
//!
//! Errors raised by the checkout layer and the error shape callers receive.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Checkout                               │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Bad selection? ─── ValidationError ─────────────┐                     │
//! │         │                                         │                     │
//! │         ▼                                         ▼                     │
//! │  Cart rule?  ────── CoreError::ItemNotFound ──► ApiError ──► caller    │
//! │         │                                         ▲                     │
//! │         ▼                                         │                     │
//! │  Config?  ───────── ConfigError ─────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers get a JSON object with a machine-readable `code` and a
//! human-readable `message`:
//! ```json
//! { "code": "NOT_FOUND", "message": "Cart item not found: ticket_42" }
//! ```

use serde::Serialize;
use thiserror::Error;
use tickets_core::{CoreError, ValidationError};
use ts_rs::TS;

// =============================================================================
// Config Error
// =============================================================================

/// Failures while loading, validating or saving `checkout.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    LoadFailed(String),

    #[error("Failed to parse config: {0}")]
    ParseFailed(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

// =============================================================================
// API Error
// =============================================================================

/// Error returned from checkout commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Item not in the cart (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Cart limit reached (422)
    CartError,

    /// Total cannot be represented (422)
    TotalOverflow,

    /// Checkout is misconfigured (500)
    ConfigError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(id) => ApiError::not_found("Cart item", &id),
            CoreError::TotalOverflow { max } => {
                tracing::warn!(max, "Order total overflowed");
                ApiError::new(
                    ErrorCode::TotalOverflow,
                    format!("Order total exceeds the maximum of {} cents", max),
                )
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Checkout configuration error: {}", err);
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::ItemNotFound("ticket_9".to_string()));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Cart item not found: ticket_9");

        let err = ApiError::from(CoreError::TotalOverflow { max: 2_147_483_647 });
        assert_eq!(err.code, ErrorCode::TotalOverflow);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::validation("quantity must not be negative");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "quantity must not be negative");
        assert_eq!(err.to_string(), "[ValidationError] quantity must not be negative");
    }

    #[test]
    fn test_config_error_mapping() {
        let err = ApiError::from(ConfigError::Invalid("max_items must be > 0".to_string()));
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert!(err.message.contains("max_items"));
    }
}
