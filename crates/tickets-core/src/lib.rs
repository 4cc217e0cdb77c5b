//! # tickets-core: Cart Totals and Precision Values
//!
//! This crate holds the pricing kernel for ticket checkout: exact decimal
//! values, percents, currency formatting, line items and the cart that
//! totals them. It is pure computation with no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ticket Checkout                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                tickets-checkout (host layer)                    │   │
//! │  │   config.toml + env ─► CheckoutConfig    tracing subscriber     │   │
//! │  │   add_to_cart, update_cart_item, build_order_summary, ...      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tickets-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ precision │  │  percent  │  │   item    │  │   cart    │  │   │
//! │  │   │ number    │  │           │  │ Ticket    │  │ subtotal  │  │   │
//! │  │   │           │  │           │  │ Fee Coupon│  │ total     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │ currency  │  │ validation│  │   error   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • INTEGER ARITHMETIC                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`precision`] - `PrecisionValue`, a decimal stored as a scaled integer
//! - [`number`] - Validated integer and float wrappers
//! - [`percent`] - `PercentValue`, a percent at four decimal places
//! - [`currency`] - Locale-aware money rendering
//! - [`item`] - Tickets, fees, coupons and the extension trait
//! - [`cart`] - The cart and its totals
//! - [`validation`] - Input rules shared by constructors
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tickets_core::{Cart, CouponItem, CurrencyFormatter, FeeItem, TicketItem};
//!
//! let mut cart = Cart::new();
//! cart.add_item(TicketItem::new("ga", 2, 2500).unwrap()).unwrap();
//! cart.add_item(FeeItem::percent("service", 10.0).unwrap()).unwrap();
//! cart.add_item(CouponItem::flat("WELCOME", 500).unwrap()).unwrap();
//!
//! // 5000 + 500 fee - 500 coupon
//! assert_eq!(cart.get_subtotal(), 5000);
//! assert_eq!(cart.get_total().integer(), 5000);
//!
//! let formatter = CurrencyFormatter::default();
//! assert_eq!(formatter.create(cart.get_total()).get(), "$50.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod currency;
pub mod error;
pub mod item;
pub mod number;
pub mod percent;
pub mod precision;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, TOTAL_CAP_CENTS};
pub use currency::{CurrencyFormat, CurrencyFormatter, CurrencyValue, SymbolPosition};
pub use error::{CoreError, CoreResult, ValidationError};
pub use item::{
    Adjustment, CouponItem, FeeItem, Item, ItemExtension, ItemType, SubType, TicketItem,
};
pub use number::{FloatValue, IntegerValue, PositiveIntegerValue};
pub use percent::PercentValue;
pub use precision::{PrecisionValue, DEFAULT_PRECISION, MAX_PRECISION};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default ceiling on distinct items in one cart.
///
/// Hosts may override it through configuration.
pub const DEFAULT_MAX_CART_ITEMS: usize = 100;

/// Default ceiling on the quantity of a single item.
///
/// Catches typos such as 1000 instead of 10.
pub const DEFAULT_MAX_ITEM_QUANTITY: i64 = 999;
