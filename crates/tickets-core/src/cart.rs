//! # Cart
//!
//! A transient, per-request collection of line items that produces a
//! subtotal and a clamped total.
//!
//! ## Two Views, One Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items:    "ticket_1" → Item::Ticket                                    │
//! │            "fee_svc"  → Item::Fee                                       │
//! │            "coupon_X" → Item::Coupon                                    │
//! │                                                                         │
//! │  by_type:  Ticket → {"ticket_1"}                                        │
//! │            Fee    → {"fee_svc"}                                         │
//! │            Coupon → {"coupon_X"}                                        │
//! │                                                                         │
//! │  add_item / remove_item / clear are the only writers of both maps.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Total Calculation
//! ```text
//! subtotal = Σ amount(None)            over tickets (saturating i64)
//! total    = Σ amount(Some(subtotal))  over every item
//!     │
//!     ├── overflow (> 2^31 - 1 cents) ──► 2^31 - 1 cents, warn
//!     ├── total ≤ 0 ──► "is free"? ──► 0
//!     │                    └── no ──► subtotal if > 0 (overflow past the cap), else 0
//!     └── otherwise ──► total
//! ```

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::item::{Item, ItemType};
use crate::precision::PrecisionValue;

/// Largest total the cart reports, in cents (`2^31 - 1`).
pub const TOTAL_CAP_CENTS: i64 = i32::MAX as i64;

/// Result of adding up every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TotalOutcome {
    Cents(i64),
    Overflow,
}

/// The cart.
///
/// ## Invariants
/// - Items are unique by prefixed id (adding the same id merges quantities)
/// - Every id in `items` appears in exactly one `by_type` bucket
/// - `get_total()` is never negative
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: BTreeMap<String, Item>,
    by_type: BTreeMap<ItemType, BTreeSet<String>>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Adds an item, or merges it into an existing item with the same
    /// prefixed id.
    ///
    /// Merging sums the quantities; the existing item's price and
    /// adjustment are kept. A new item's `added_to_cart` hook runs before it
    /// is inserted.
    ///
    /// ## Errors
    /// Fails if the item reports a negative quantity, or if an extension
    /// item claims one of the built-in kinds.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::cart::Cart;
    /// use tickets_core::item::TicketItem;
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item(TicketItem::new("1", 2, 500).unwrap()).unwrap();
    /// cart.add_item(TicketItem::new("1", 3, 500).unwrap()).unwrap();
    ///
    /// assert_eq!(cart.item_count(), 1);
    /// assert_eq!(cart.get_item("ticket_1").unwrap().quantity(), 5);
    /// ```
    pub fn add_item(&mut self, item: impl Into<Item>) -> CoreResult<()> {
        let mut item = item.into();
        item.validate()?;
        let key = item.prefixed_id();

        if let Some(existing) = self.items.get_mut(&key) {
            let merged = existing.quantity().saturating_add(item.quantity());
            existing.set_quantity(merged)?;
            debug!(id = %key, quantity = merged, "Merged cart item");
            return Ok(());
        }

        item.added_to_cart(self);

        debug!(id = %key, item_type = %item.item_type(), "Adding cart item");
        self.by_type
            .entry(item.item_type())
            .or_default()
            .insert(key.clone());
        self.items.insert(key, item);
        Ok(())
    }

    /// Removes the item with this prefixed id. Does nothing if it is absent.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        let item = self.items.remove(id)?;
        let item_type = item.item_type();

        if let Some(bucket) = self.by_type.get_mut(&item_type) {
            bucket.remove(id);
            if bucket.is_empty() {
                self.by_type.remove(&item_type);
            }
        }

        debug!(id = %id, "Removed cart item");
        Some(item)
    }

    /// Replaces an item's quantity.
    ///
    /// ## Errors
    /// - `Validation` if `quantity` is negative
    /// - `ItemNotFound` if no item has this prefixed id
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> CoreResult<()> {
        crate::validation::validate_quantity(quantity)?;

        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        item.set_quantity(quantity)?;

        debug!(id = %id, quantity, "Updated cart item quantity");
        Ok(())
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.by_type.clear();
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// All items, ordered by prefixed id.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Items of one type, ordered by prefixed id.
    pub fn items_of_type<'a>(&'a self, item_type: &ItemType) -> impl Iterator<Item = &'a Item> + 'a {
        self.by_type
            .get(item_type)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.items.get(id))
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .values()
            .fold(0_i64, |acc, item| acc.saturating_add(item.quantity()))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Sum of the items counted in the subtotal (tickets), in cents.
    ///
    /// Saturates at `i64::MAX`.
    pub fn get_subtotal(&self) -> i64 {
        self.items
            .values()
            .filter(|item| item.is_counted_in_subtotal())
            .fold(0_i64, |acc, item| acc.saturating_add(item.get_amount(None)))
    }

    /// The amount to charge, at precision 2.
    ///
    /// Never negative. A total past `2^31 - 1` cents is clamped to that
    /// value and logged; use [`checked_total`](Self::checked_total) to get
    /// an error instead.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::cart::Cart;
    /// use tickets_core::item::{FeeItem, TicketItem};
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item(TicketItem::new("1", 1, 1000).unwrap()).unwrap();
    /// cart.add_item(FeeItem::percent("service", 10.0).unwrap()).unwrap();
    ///
    /// assert_eq!(cart.get_total().integer(), 1100);
    /// ```
    pub fn get_total(&self) -> PrecisionValue {
        match self.evaluate_total() {
            TotalOutcome::Cents(cents) => PrecisionValue::from_cents(cents),
            TotalOutcome::Overflow => {
                warn!(
                    items = self.items.len(),
                    cap = TOTAL_CAP_CENTS,
                    "Cart total overflowed, clamping"
                );
                PrecisionValue::from_cents(TOTAL_CAP_CENTS)
            }
        }
    }

    /// Same as [`get_total`](Self::get_total) but reports overflow.
    ///
    /// ## Errors
    /// `TotalOverflow` if the total passes `2^31 - 1` cents.
    pub fn checked_total(&self) -> CoreResult<PrecisionValue> {
        match self.evaluate_total() {
            TotalOutcome::Cents(cents) => Ok(PrecisionValue::from_cents(cents)),
            TotalOutcome::Overflow => Err(CoreError::TotalOverflow {
                max: TOTAL_CAP_CENTS,
            }),
        }
    }

    /// Sum of one type's amounts, using the cart subtotal as the base for
    /// percent adjustments. Keeps its sign: coupons come back negative.
    pub fn get_total_by_type(&self, item_type: &ItemType) -> PrecisionValue {
        PrecisionValue::from_cents(self.type_total(item_type, self.get_subtotal()))
    }

    fn type_total(&self, item_type: &ItemType, subtotal: i64) -> i64 {
        self.items_of_type(item_type)
            .fold(0_i64, |acc, item| acc.saturating_add(item.get_amount(Some(subtotal))))
    }

    fn evaluate_total(&self) -> TotalOutcome {
        let subtotal = self.get_subtotal();

        let total = self
            .items
            .values()
            .try_fold(0_i64, |acc, item| acc.checked_add(item.get_amount(Some(subtotal))));

        let total = match total {
            Some(total) if total <= TOTAL_CAP_CENTS => total,
            _ => return TotalOutcome::Overflow,
        };

        if total <= 0 {
            if self.is_free_based_on_items(total, subtotal) {
                return TotalOutcome::Cents(0);
            }
            if subtotal > TOTAL_CAP_CENTS {
                return TotalOutcome::Overflow;
            }
            if subtotal > 0 {
                return TotalOutcome::Cents(subtotal);
            }
            return TotalOutcome::Cents(0);
        }

        TotalOutcome::Cents(total)
    }

    /// Decides whether a non-positive total means the order is free.
    ///
    /// True when the total is negative with no uncovered positive item, or
    /// when there is no uncovered positive item and the total is at most
    /// zero. The two arms overlap; both are kept as they stand.
    fn is_free_based_on_items(&self, total: i64, subtotal: i64) -> bool {
        let has_uncovered = self.has_uncovered_positive_item(subtotal);
        (total < 0 && !has_uncovered) || (!has_uncovered && total <= 0)
    }

    /// A positive subtotal-counted item is "uncovered" unless the coupons
    /// alone discount the whole subtotal.
    fn has_uncovered_positive_item(&self, subtotal: i64) -> bool {
        let any_positive = self
            .items
            .values()
            .any(|item| item.is_counted_in_subtotal() && item.get_amount(None) > 0);
        if !any_positive {
            return false;
        }

        let coupons = self.type_total(&ItemType::Coupon, subtotal);
        subtotal.saturating_add(coupons) > 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
