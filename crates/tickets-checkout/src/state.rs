//! # Checkout State
//!
//! The shared cart session and the read-only configuration commands use.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Buyer Action             Command                 Cart State Change     │
//! │  ────────────             ───────                 ─────────────────     │
//! │                                                                         │
//! │  Pick tickets ───────────► add_to_cart() ───────► cart.add_item(item)  │
//! │                                                                         │
//! │  Change quantity ────────► update_cart_item() ──► cart.set_quantity()  │
//! │                                                                         │
//! │  Drop a coupon ──────────► remove_from_cart() ──► cart.remove_item()   │
//! │                                                                         │
//! │  Start over ─────────────► clear_cart() ────────► cart.clear()         │
//! │                                                                         │
//! │  View cart ──────────────► get_cart() ──────────► (read only)          │
//! │                                                                         │
//! │  Every operation holds the Mutex for its whole duration.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use tickets_core::{Cart, CurrencyFormatter};

use crate::config::{CartLimits, CheckoutConfig};
use crate::error::ConfigError;

// =============================================================================
// Cart State
// =============================================================================

/// One buyer's cart session.
///
/// Cloning shares the same cart.
#[derive(Debug, Clone)]
pub struct CartState {
    session_id: Uuid,
    created_at: DateTime<Utc>,
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new session with an empty cart.
    pub fn new() -> Self {
        CartState {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// use tickets_checkout::state::CartState;
    /// use tickets_core::TicketItem;
    ///
    /// let state = CartState::new();
    /// state
    ///     .with_cart_mut(|cart| cart.add_item(TicketItem::new("ga", 1, 2500)?))
    ///     .unwrap();
    /// assert_eq!(state.with_cart(|cart| cart.get_subtotal()), 2500);
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.lock();
        f(&mut cart)
    }

    /// Cart mutations never leave the two item maps out of step, so a
    /// poisoned lock still guards a usable cart.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!(session = %self.session_id, "Cart mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Config State
// =============================================================================

/// Validated configuration plus the formatter built from it.
///
/// Read-only after construction, so no mutex.
#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    config: CheckoutConfig,
    formatter: CurrencyFormatter,
}

impl ConfigState {
    /// ## Errors
    /// Fails if the configuration does not validate.
    pub fn new(config: CheckoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let formatter = config.formatter()?;
        Ok(ConfigState { config, formatter })
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn limits(&self) -> &CartLimits {
        &self.config.cart
    }

    pub fn formatter(&self) -> &CurrencyFormatter {
        &self.formatter
    }
}
