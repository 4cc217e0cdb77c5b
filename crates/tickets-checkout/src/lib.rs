//! # tickets-checkout: Checkout Host Layer
//!
//! Builds priced orders from ticket, fee and coupon selections using
//! `tickets-core`, and owns everything the core leaves out: configuration,
//! logging, shared cart sessions and the error shape callers see.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      tickets-checkout                                   │
//! │                                                                         │
//! │  Startup:                                                               │
//! │  1. init_tracing()                                                      │
//! │  2. CheckoutConfig::load_or_default(path)                               │
//! │  3. ConfigState::new(config)    (builds the CurrencyFormatter)          │
//! │  4. CartState::new() per buyer session                                  │
//! │                                                                         │
//! │  Requests:                                                              │
//! │     JSON Selection ──► commands::add_to_cart ──► CartResponse           │
//! │     [Selection]    ──► commands::build_order_summary ──► OrderSummary   │
//! │                                                                         │
//! │  Failures: ApiError { code, message }                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`commands`] - Cart and order operations
//! - [`config`] - `checkout.toml` and environment overrides
//! - [`error`] - `ApiError`, `ConfigError`
//! - [`selection`] - Request payloads
//! - [`state`] - Cart sessions and read-only config

pub mod commands;
pub mod config;
pub mod error;
pub mod selection;
pub mod state;

pub use commands::{CartResponse, CartTotals, LineItemView, OrderSummary};
pub use config::{CartLimits, CheckoutConfig};
pub use error::{ApiError, ConfigError, ErrorCode};
pub use selection::Selection;
pub use state::{CartState, ConfigState};

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tickets=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tickets_core=trace` - Show trace for the pricing kernel only
/// - Default: `info,tickets=debug`
///
/// ## Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
}
