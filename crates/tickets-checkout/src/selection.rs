//! # Selections
//!
//! What a buyer submits: tickets with their price, plus the fees and coupons
//! that apply. Each selection becomes one core [`Item`].
//!
//! ```json
//! [
//!   { "type": "ticket", "id": "ga", "quantity": 2, "priceCents": 2500 },
//!   { "type": "fee", "id": "service", "subType": "percent", "value": 10 },
//!   { "type": "coupon", "id": "WELCOME", "subType": "flat", "value": 500 }
//! ]
//! ```
//!
//! Flat values are cents and must be whole numbers; percent values are
//! percents (`10` means 10%).

use serde::{Deserialize, Serialize};

use tickets_core::item::prefixed_id;
use tickets_core::validation::validate_quantity_limit;
use tickets_core::{
    Adjustment, CouponItem, FeeItem, Item, ItemType, PercentValue, SubType, TicketItem,
    ValidationError,
};

use crate::config::CartLimits;

/// `2^53`: from here up, f64 skips whole numbers.
const MAX_EXACT_CENTS: f64 = 9_007_199_254_740_992.0;

fn default_quantity() -> i64 {
    1
}

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Selection {
    Ticket {
        id: String,
        #[serde(default = "default_quantity")]
        quantity: i64,
        price_cents: i64,
    },
    Fee {
        id: String,
        #[serde(default = "default_quantity")]
        quantity: i64,
        sub_type: SubType,
        value: f64,
    },
    Coupon {
        id: String,
        #[serde(default = "default_quantity")]
        quantity: i64,
        sub_type: SubType,
        value: f64,
    },
}

impl Selection {
    pub fn item_type(&self) -> ItemType {
        match self {
            Selection::Ticket { .. } => ItemType::Ticket,
            Selection::Fee { .. } => ItemType::Fee,
            Selection::Coupon { .. } => ItemType::Coupon,
        }
    }

    pub fn quantity(&self) -> i64 {
        match self {
            Selection::Ticket { quantity, .. }
            | Selection::Fee { quantity, .. }
            | Selection::Coupon { quantity, .. } => *quantity,
        }
    }

    /// The cart key this selection will land under.
    pub fn prefixed_id(&self) -> String {
        let id = match self {
            Selection::Ticket { id, .. } | Selection::Fee { id, .. } | Selection::Coupon { id, .. } => id,
        };
        prefixed_id(&self.item_type(), id)
    }

    /// Validates the selection and builds the core item.
    ///
    /// ## Errors
    /// Quantity outside `0..=limits.max_quantity`, malformed id, negative
    /// ticket price, fractional, non-finite or past-2^53 flat cents, or a
    /// percent below 0.01%.
    pub fn into_item(self, limits: &CartLimits) -> Result<Item, ValidationError> {
        validate_quantity_limit(self.quantity(), limits.max_quantity)?;

        let item = match self {
            Selection::Ticket {
                id,
                quantity,
                price_cents,
            } => Item::from(TicketItem::new(id, quantity, price_cents)?),
            Selection::Fee {
                id,
                quantity,
                sub_type,
                value,
            } => Item::from(FeeItem::with_adjustment(id, adjustment(sub_type, value)?)?.with_quantity(quantity)?),
            Selection::Coupon {
                id,
                quantity,
                sub_type,
                value,
            } => Item::from(
                CouponItem::with_adjustment(id, adjustment(sub_type, value)?)?.with_quantity(quantity)?,
            ),
        };

        Ok(item)
    }
}

/// Reads a fee or coupon value according to its sub type.
fn adjustment(sub_type: SubType, value: f64) -> Result<Adjustment, ValidationError> {
    match sub_type {
        SubType::Percent => Ok(Adjustment::Percent(PercentValue::new(value)?)),
        SubType::Flat => {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite {
                    field: "value".to_string(),
                });
            }
            if value.fract() != 0.0 {
                return Err(ValidationError::InvalidFormat {
                    field: "value".to_string(),
                    reason: "flat amounts are whole cents".to_string(),
                });
            }
            // From 2^53 up, f64 no longer holds every whole number, so the
            // submitted cents may already have been rounded
            if value.abs() >= MAX_EXACT_CENTS {
                return Err(ValidationError::Overflow {
                    field: "value".to_string(),
                    precision: 0,
                });
            }
            Ok(Adjustment::Flat(value as i64))
        }
    }
}
