//! # Cart Items
//!
//! The line items a cart can hold.
//!
//! ## Item Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Item                                          │
//! │                                                                         │
//! │  ┌───────────────┐  ┌───────────────┐  ┌───────────────┐  ┌──────────┐ │
//! │  │  Ticket       │  │  Fee          │  │  Coupon       │  │Extension │ │
//! │  │  price × qty  │  │  flat | %     │  │  flat | %     │  │ (trait)  │ │
//! │  │  in subtotal  │  │  on subtotal  │  │  always ≤ 0   │  │          │ │
//! │  └───────────────┘  └───────────────┘  └───────────────┘  └──────────┘ │
//! │                                                                         │
//! │  Built-in kinds are enum variants; anything else implements            │
//! │  `ItemExtension` and rides in `Item::Extension`.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are integer cents. Fees and coupons are computed against the
//! subtotal but are not part of it.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::ValidationError;
use crate::percent::PercentValue;
use crate::validation::{validate_item_id, validate_price_cents, validate_quantity};

// =============================================================================
// Item Type
// =============================================================================

/// What kind of line item this is. Used as the cart's grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    Ticket,
    Fee,
    Coupon,
    /// A kind registered by an extension, e.g. `"donation"`.
    Custom(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            ItemType::Ticket => "ticket",
            ItemType::Fee => "fee",
            ItemType::Coupon => "coupon",
            ItemType::Custom(kind) => kind,
        }
    }
}

impl From<String> for ItemType {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "ticket" => ItemType::Ticket,
            "fee" => ItemType::Fee,
            "coupon" => ItemType::Coupon,
            _ => ItemType::Custom(kind),
        }
    }
}

impl From<&str> for ItemType {
    fn from(kind: &str) -> Self {
        ItemType::from(kind.to_string())
    }
}

impl From<ItemType> for String {
    fn from(item_type: ItemType) -> Self {
        item_type.as_str().to_string()
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sub Type & Adjustment
// =============================================================================

/// How a fee or coupon value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SubType {
    /// A fixed amount in cents.
    Flat,
    /// A percent of the cart subtotal.
    Percent,
}

/// The value of a fee or coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Cents per unit. May be negative.
    Flat(i64),
    Percent(PercentValue),
}

impl Adjustment {
    pub const fn sub_type(&self) -> SubType {
        match self {
            Adjustment::Flat(_) => SubType::Flat,
            Adjustment::Percent(_) => SubType::Percent,
        }
    }

    /// Amount for a single unit. A percent with no subtotal has no base and
    /// yields zero.
    pub fn unit_amount(&self, subtotal: Option<i64>) -> i64 {
        match self {
            Adjustment::Flat(cents) => *cents,
            Adjustment::Percent(percent) => subtotal.map_or(0, |base| percent.apply_to(base)),
        }
    }
}

// =============================================================================
// Ticket
// =============================================================================

/// A ticket: unit price × quantity, counted in the subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketItem {
    id: String,
    quantity: i64,
    price_cents: i64,
}

impl TicketItem {
    /// ## Errors
    /// Empty/malformed id, negative quantity or negative price.
    pub fn new(id: impl Into<String>, quantity: i64, price_cents: i64) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_item_id(&id)?;
        validate_quantity(quantity)?;
        validate_price_cents(price_cents)?;

        Ok(TicketItem {
            id,
            quantity,
            price_cents,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub fn get_amount(&self) -> i64 {
        self.price_cents.saturating_mul(self.quantity)
    }
}

// =============================================================================
// Fee
// =============================================================================

/// A fee added on top of the subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeItem {
    id: String,
    quantity: i64,
    adjustment: Adjustment,
}

impl FeeItem {
    /// A fixed fee of `cents` per unit, quantity 1.
    pub fn flat(id: impl Into<String>, cents: i64) -> Result<Self, ValidationError> {
        Self::with_adjustment(id, Adjustment::Flat(cents))
    }

    /// A fee of `percent`% of the subtotal, quantity 1.
    pub fn percent(id: impl Into<String>, percent: f64) -> Result<Self, ValidationError> {
        Self::with_adjustment(id, Adjustment::Percent(PercentValue::new(percent)?))
    }

    pub fn with_adjustment(id: impl Into<String>, adjustment: Adjustment) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_item_id(&id)?;
        Ok(FeeItem {
            id,
            quantity: 1,
            adjustment,
        })
    }

    /// Sets the starting quantity.
    pub fn with_quantity(mut self, quantity: i64) -> Result<Self, ValidationError> {
        validate_quantity(quantity)?;
        self.quantity = quantity;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn adjustment(&self) -> &Adjustment {
        &self.adjustment
    }

    pub fn get_amount(&self, subtotal: Option<i64>) -> i64 {
        self.adjustment
            .unit_amount(subtotal)
            .saturating_mul(self.quantity)
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A discount. Its amount is never positive, whatever sign the value has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponItem {
    id: String,
    quantity: i64,
    adjustment: Adjustment,
}

impl CouponItem {
    /// `cents` off per unit, quantity 1.
    pub fn flat(id: impl Into<String>, cents: i64) -> Result<Self, ValidationError> {
        Self::with_adjustment(id, Adjustment::Flat(cents))
    }

    /// `percent`% off the subtotal, quantity 1.
    pub fn percent(id: impl Into<String>, percent: f64) -> Result<Self, ValidationError> {
        Self::with_adjustment(id, Adjustment::Percent(PercentValue::new(percent)?))
    }

    pub fn with_adjustment(id: impl Into<String>, adjustment: Adjustment) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_item_id(&id)?;
        Ok(CouponItem {
            id,
            quantity: 1,
            adjustment,
        })
    }

    pub fn with_quantity(mut self, quantity: i64) -> Result<Self, ValidationError> {
        validate_quantity(quantity)?;
        self.quantity = quantity;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn adjustment(&self) -> &Adjustment {
        &self.adjustment
    }

    pub fn get_amount(&self, subtotal: Option<i64>) -> i64 {
        let amount = self
            .adjustment
            .unit_amount(subtotal)
            .saturating_mul(self.quantity);
        -amount.saturating_abs()
    }
}

// =============================================================================
// Extension Point
// =============================================================================

/// A line item kind defined outside this crate.
///
/// Implementors own their amount rules; the cart only validates quantity
/// changes and keeps the item grouped under its `kind()`.
pub trait ItemExtension: fmt::Debug + Send {
    fn id(&self) -> &str;

    /// Grouping key, e.g. `"donation"`. Must not be one of the built-in kinds.
    fn kind(&self) -> &str;

    fn quantity(&self) -> i64;

    /// Called with an already validated, non-negative quantity.
    fn set_quantity(&mut self, quantity: i64);

    fn sub_type(&self) -> SubType {
        SubType::Flat
    }

    fn get_amount(&self, subtotal: Option<i64>) -> i64;

    fn is_counted_in_subtotal(&self) -> bool {
        false
    }

    /// Runs once, when the item is first inserted into `cart`.
    fn added_to_cart(&mut self, _cart: &Cart) {}

    fn clone_box(&self) -> Box<dyn ItemExtension>;
}

impl Clone for Box<dyn ItemExtension> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

// =============================================================================
// Item
// =============================================================================

/// Any line item.
#[derive(Debug, Clone)]
pub enum Item {
    Ticket(TicketItem),
    Fee(FeeItem),
    Coupon(CouponItem),
    Extension(Box<dyn ItemExtension>),
}

impl Item {
    pub fn id(&self) -> &str {
        match self {
            Item::Ticket(ticket) => ticket.id(),
            Item::Fee(fee) => fee.id(),
            Item::Coupon(coupon) => coupon.id(),
            Item::Extension(ext) => ext.id(),
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            Item::Ticket(_) => ItemType::Ticket,
            Item::Fee(_) => ItemType::Fee,
            Item::Coupon(_) => ItemType::Coupon,
            Item::Extension(ext) => ItemType::from(ext.kind()),
        }
    }

    /// The cart key: `"<type>_<id>"`, so a ticket and a fee may share an id.
    ///
    /// ## Example
    /// ```rust
    /// use tickets_core::item::{Item, TicketItem};
    ///
    /// let item = Item::from(TicketItem::new("42", 1, 500).unwrap());
    /// assert_eq!(item.prefixed_id(), "ticket_42");
    /// ```
    pub fn prefixed_id(&self) -> String {
        prefixed_id(&self.item_type(), self.id())
    }

    pub fn quantity(&self) -> i64 {
        match self {
            Item::Ticket(ticket) => ticket.quantity,
            Item::Fee(fee) => fee.quantity,
            Item::Coupon(coupon) => coupon.quantity,
            Item::Extension(ext) => ext.quantity(),
        }
    }

    /// ## Errors
    /// Returns `MustNotBeNegative` for a negative quantity; the item is left
    /// unchanged.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<(), ValidationError> {
        validate_quantity(quantity)?;

        match self {
            Item::Ticket(ticket) => ticket.quantity = quantity,
            Item::Fee(fee) => fee.quantity = quantity,
            Item::Coupon(coupon) => coupon.quantity = quantity,
            Item::Extension(ext) => ext.set_quantity(quantity),
        }
        Ok(())
    }

    pub fn sub_type(&self) -> SubType {
        match self {
            Item::Ticket(_) => SubType::Flat,
            Item::Fee(fee) => fee.adjustment.sub_type(),
            Item::Coupon(coupon) => coupon.adjustment.sub_type(),
            Item::Extension(ext) => ext.sub_type(),
        }
    }

    /// The percent behind a percent fee or coupon.
    pub fn percent(&self) -> Option<PercentValue> {
        let adjustment = match self {
            Item::Fee(fee) => fee.adjustment,
            Item::Coupon(coupon) => coupon.adjustment,
            Item::Ticket(_) | Item::Extension(_) => return None,
        };
        match adjustment {
            Adjustment::Percent(percent) => Some(percent),
            Adjustment::Flat(_) => None,
        }
    }

    /// Amount in cents. `subtotal` is the base for percent adjustments and
    /// is ignored by tickets.
    pub fn get_amount(&self, subtotal: Option<i64>) -> i64 {
        match self {
            Item::Ticket(ticket) => ticket.get_amount(),
            Item::Fee(fee) => fee.get_amount(subtotal),
            Item::Coupon(coupon) => coupon.get_amount(subtotal),
            Item::Extension(ext) => ext.get_amount(subtotal),
        }
    }

    pub fn is_counted_in_subtotal(&self) -> bool {
        match self {
            Item::Ticket(_) => true,
            Item::Fee(_) | Item::Coupon(_) => false,
            Item::Extension(ext) => ext.is_counted_in_subtotal(),
        }
    }

    /// Checks what the item's constructor could not: extension items report
    /// their own quantity and kind.
    ///
    /// ## Errors
    /// - `MustNotBeNegative` for a negative quantity
    /// - `InvalidFormat` for an extension claiming `ticket`, `fee` or `coupon`
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quantity(self.quantity())?;

        if let Item::Extension(ext) = self {
            if !matches!(self.item_type(), ItemType::Custom(_)) {
                return Err(ValidationError::InvalidFormat {
                    field: "item kind".to_string(),
                    reason: format!("'{}' is reserved for built-in items", ext.kind()),
                });
            }
        }

        Ok(())
    }

    pub(crate) fn added_to_cart(&mut self, cart: &Cart) {
        if let Item::Extension(ext) = self {
            ext.added_to_cart(cart);
        }
    }
}

/// Builds the cart key for an item of `item_type` with raw `id`.
pub fn prefixed_id(item_type: &ItemType, id: &str) -> String {
    format!("{}_{}", item_type.as_str(), id)
}

impl From<TicketItem> for Item {
    fn from(ticket: TicketItem) -> Self {
        Item::Ticket(ticket)
    }
}

impl From<FeeItem> for Item {
    fn from(fee: FeeItem) -> Self {
        Item::Fee(fee)
    }
}

impl From<CouponItem> for Item {
    fn from(coupon: CouponItem) -> Self {
        Item::Coupon(coupon)
    }
}

impl From<Box<dyn ItemExtension>> for Item {
    fn from(ext: Box<dyn ItemExtension>) -> Self {
        Item::Extension(ext)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
