//! # Checkout Commands
//!
//! The operations a checkout front end calls.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────┐     ┌──────────┐   │
//! │  │  Empty   │────►│ In Cart  │────►│ Order        │────►│  Order   │   │
//! │  │  Cart    │     │          │     │ Summary      │     │ Created  │   │
//! │  └──────────┘     └──────────┘     └──────────────┘     └──────────┘   │
//! │                        │                                  (outside)    │
//! │                   add_to_cart                                           │
//! │                   update_cart_item                                      │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►  (back to empty)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `build_order_summary` prices a whole list of selections in a throwaway
//! cart; it does not touch any session.

use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use tickets_core::validation::{validate_cart_size, validate_quantity_limit};
use tickets_core::{Cart, CurrencyFormatter, Item, ItemType, PrecisionValue, SubType};

use crate::config::CartLimits;
use crate::error::ApiError;
use crate::selection::Selection;
use crate::state::{CartState, ConfigState};

// =============================================================================
// Response DTOs
// =============================================================================

/// One line of the cart as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    /// Cart key, e.g. `ticket_ga`
    pub key: String,

    /// Id as submitted, e.g. `ga`
    pub id: String,

    pub item_type: String,

    pub sub_type: SubType,

    pub quantity: i64,

    /// `"10.00%"` for percent fees and coupons
    pub percent: Option<String>,

    /// Line amount against the current subtotal; negative for coupons
    pub amount_cents: i64,

    /// `amount_cents` rendered with the configured currency
    pub amount: String,
}

impl LineItemView {
    fn build(item: &Item, subtotal: i64, formatter: &CurrencyFormatter) -> Self {
        let amount_cents = item.get_amount(Some(subtotal));
        LineItemView {
            key: item.prefixed_id(),
            id: item.id().to_string(),
            item_type: item.item_type().to_string(),
            sub_type: item.sub_type(),
            quantity: item.quantity(),
            percent: item.percent().map(|p| p.to_string()),
            amount_cents,
            amount: formatter.format_cents(amount_cents),
        }
    }
}

/// Cart totals, raw and formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub fees_cents: i64,
    /// Zero or negative
    pub discounts_cents: i64,
    pub total_cents: i64,
    pub subtotal: String,
    pub fees: String,
    pub discounts: String,
    pub total: String,
}

impl CartTotals {
    fn build(cart: &Cart, total: PrecisionValue, formatter: &CurrencyFormatter) -> Self {
        let subtotal = cart.get_subtotal();
        let fees = cart.get_total_by_type(&ItemType::Fee);
        let discounts = cart.get_total_by_type(&ItemType::Coupon);

        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: subtotal,
            fees_cents: fees.integer(),
            discounts_cents: discounts.integer(),
            total_cents: total.integer(),
            subtotal: formatter.format_cents(subtotal),
            fees: formatter.format(&fees),
            discounts: formatter.format(&discounts),
            total: formatter.create(total).get(),
        }
    }
}

/// A cart session's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub session_id: String,
    pub items: Vec<LineItemView>,
    pub totals: CartTotals,
}

impl CartResponse {
    fn build(state: &CartState, cart: &Cart, formatter: &CurrencyFormatter) -> Self {
        CartResponse {
            session_id: state.session_id().to_string(),
            items: line_items(cart, formatter),
            totals: CartTotals::build(cart, cart.get_total(), formatter),
        }
    }
}

/// The priced order handed to order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub items: Vec<LineItemView>,
    pub totals: CartTotals,
}

fn line_items(cart: &Cart, formatter: &CurrencyFormatter) -> Vec<LineItemView> {
    let subtotal = cart.get_subtotal();
    cart.items()
        .map(|item| LineItemView::build(item, subtotal, formatter))
        .collect()
}

// =============================================================================
// Commands
// =============================================================================

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState, config: &ConfigState) -> CartResponse {
    debug!(session = %cart.session_id(), "get_cart command");
    cart.with_cart(|c| CartResponse::build(cart, c, config.formatter()))
}

/// Adds a selection to the cart.
///
/// ## Behavior
/// - Same type and id already in cart: quantities are summed
/// - Otherwise: added as a new line, if the cart has room
///
/// ## Errors
/// `VALIDATION_ERROR` for a bad selection, `CART_ERROR` when a limit would
/// be exceeded.
pub fn add_to_cart(
    cart: &CartState,
    config: &ConfigState,
    selection: Selection,
) -> Result<CartResponse, ApiError> {
    debug!(
        session = %cart.session_id(),
        item = %selection.prefixed_id(),
        quantity = selection.quantity(),
        "add_to_cart command"
    );

    cart.with_cart_mut(|c| {
        add_selection(c, selection, config.limits())?;
        Ok(CartResponse::build(cart, c, config.formatter()))
    })
}

/// Sets the quantity of a cart line.
///
/// ## Behavior
/// - Quantity 0: removes the line
/// - Quantity over the configured maximum: error
///
/// ## Arguments
/// * `item_id` - Cart key, e.g. `ticket_ga`
pub fn update_cart_item(
    cart: &CartState,
    config: &ConfigState,
    item_id: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(session = %cart.session_id(), item = %item_id, quantity, "update_cart_item command");

    validate_quantity_limit(quantity, config.limits().max_quantity)?;

    cart.with_cart_mut(|c| {
        if quantity == 0 {
            c.remove_item(item_id)
                .ok_or_else(|| ApiError::not_found("Cart item", item_id))?;
        } else {
            c.set_quantity(item_id, quantity)?;
        }
        Ok(CartResponse::build(cart, c, config.formatter()))
    })
}

/// Removes a line from the cart.
///
/// ## Errors
/// `NOT_FOUND` if the key is not in the cart.
pub fn remove_from_cart(
    cart: &CartState,
    config: &ConfigState,
    item_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(session = %cart.session_id(), item = %item_id, "remove_from_cart command");

    cart.with_cart_mut(|c| {
        c.remove_item(item_id)
            .ok_or_else(|| ApiError::not_found("Cart item", item_id))?;
        Ok(CartResponse::build(cart, c, config.formatter()))
    })
}

/// Empties the cart.
pub fn clear_cart(cart: &CartState, config: &ConfigState) -> CartResponse {
    debug!(session = %cart.session_id(), "clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::build(cart, c, config.formatter())
    })
}

/// Prices a full set of selections for order creation.
///
/// Selections are added in order, so repeated ids merge exactly as they
/// would in a session cart.
///
/// ## Errors
/// Any selection or limit error, or `TOTAL_OVERFLOW` when the total does
/// not fit in 32-bit cents. Orders are never created from a clamped total.
///
/// ## Example
/// ```rust
/// use tickets_checkout::commands::build_order_summary;
/// use tickets_checkout::selection::Selection;
/// use tickets_checkout::state::ConfigState;
///
/// let selections: Vec<Selection> = serde_json::from_str(r#"[
///     { "type": "ticket", "id": "1", "quantity": 1, "priceCents": 1000 },
///     { "type": "fee", "id": "service", "subType": "percent", "value": 10 }
/// ]"#).unwrap();
///
/// let summary = build_order_summary(&ConfigState::default(), selections).unwrap();
/// assert_eq!(summary.totals.total, "$11.00");
/// ```
pub fn build_order_summary(
    config: &ConfigState,
    selections: Vec<Selection>,
) -> Result<OrderSummary, ApiError> {
    debug!(selections = selections.len(), "build_order_summary command");

    let mut cart = Cart::new();
    for selection in selections {
        add_selection(&mut cart, selection, config.limits())?;
    }

    let total = cart.checked_total()?;
    let formatter = config.formatter();
    let summary = OrderSummary {
        items: line_items(&cart, formatter),
        totals: CartTotals::build(&cart, total, formatter),
    };

    info!(
        items = summary.totals.item_count,
        total_cents = summary.totals.total_cents,
        "Order summary built"
    );
    Ok(summary)
}

/// Validates a selection against the limits and adds it to `cart`.
fn add_selection(cart: &mut Cart, selection: Selection, limits: &CartLimits) -> Result<(), ApiError> {
    let key = selection.prefixed_id();
    let item = selection.into_item(limits)?;

    match cart.get_item(&key) {
        Some(existing) => {
            let merged = existing.quantity().saturating_add(item.quantity());
            if merged > limits.max_quantity {
                return Err(ApiError::cart(format!(
                    "Quantity would exceed maximum of {}",
                    limits.max_quantity
                )));
            }
        }
        None => {
            validate_cart_size(cart.item_count(), limits.max_items).map_err(|_| {
                ApiError::cart(format!(
                    "Cart cannot have more than {} items",
                    limits.max_items
                ))
            })?;
        }
    }

    cart.add_item(item)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckoutConfig;
    use crate::error::ErrorCode;

    fn ticket(id: &str, quantity: i64, price_cents: i64) -> Selection {
        Selection::Ticket {
            id: id.to_string(),
            quantity,
            price_cents,
        }
    }

    fn limited(max_items: usize, max_quantity: i64) -> ConfigState {
        let mut config = CheckoutConfig::default();
        config.cart = CartLimits {
            max_items,
            max_quantity,
        };
        ConfigState::new(config).unwrap()
    }

    #[test]
    fn test_add_and_get_cart() {
        let cart = CartState::new();
        let config = ConfigState::default();

        let response = add_to_cart(&cart, &config, ticket("1", 2, 500)).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].key, "ticket_1");
        assert_eq!(response.items[0].amount, "$10.00");
        assert_eq!(response.totals.total, "$10.00");
        assert_eq!(response.session_id, cart.session_id().to_string());

        assert_eq!(get_cart(&cart, &config), response);
    }

    #[test]
    fn test_merge_respects_quantity_limit() {
        let cart = CartState::new();
        let config = limited(10, 5);

        add_to_cart(&cart, &config, ticket("1", 3, 500)).unwrap();
        let err = add_to_cart(&cart, &config, ticket("1", 3, 500)).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        let response = add_to_cart(&cart, &config, ticket("1", 2, 500)).unwrap();
        assert_eq!(response.totals.total_quantity, 5);
    }

    #[test]
    fn test_cart_size_limit() {
        let cart = CartState::new();
        let config = limited(2, 10);

        add_to_cart(&cart, &config, ticket("1", 1, 500)).unwrap();
        add_to_cart(&cart, &config, ticket("2", 1, 500)).unwrap();
        let err = add_to_cart(&cart, &config, ticket("3", 1, 500)).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        // Merging into an existing line is still allowed
        assert!(add_to_cart(&cart, &config, ticket("2", 1, 500)).is_ok());
    }

    #[test]
    fn test_update_and_remove() {
        let cart = CartState::new();
        let config = ConfigState::default();
        add_to_cart(&cart, &config, ticket("1", 1, 500)).unwrap();

        let response = update_cart_item(&cart, &config, "ticket_1", 4).unwrap();
        assert_eq!(response.totals.subtotal_cents, 2000);

        let response = update_cart_item(&cart, &config, "ticket_1", 0).unwrap();
        assert!(response.items.is_empty());

        let err = remove_from_cart(&cart, &config, "ticket_1").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = update_cart_item(&cart, &config, "ticket_1", 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = update_cart_item(&cart, &config, "ticket_1", -2).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_clear_cart() {
        let cart = CartState::new();
        let config = ConfigState::default();
        add_to_cart(&cart, &config, ticket("1", 1, 500)).unwrap();

        let response = clear_cart(&cart, &config);
        assert!(response.items.is_empty());
        assert_eq!(response.totals.total, "$0.00");
    }

    #[test]
    fn test_order_summary_breakdown() {
        let selections = vec![
            ticket("ga", 2, 2500),
            Selection::Fee {
                id: "service".to_string(),
                quantity: 1,
                sub_type: SubType::Percent,
                value: 10.0,
            },
            Selection::Coupon {
                id: "WELCOME".to_string(),
                quantity: 1,
                sub_type: SubType::Flat,
                value: 500.0,
            },
        ];

        let summary = build_order_summary(&ConfigState::default(), selections).unwrap();
        assert_eq!(summary.totals.subtotal, "$50.00");
        assert_eq!(summary.totals.fees, "$5.00");
        assert_eq!(summary.totals.discounts, "-$5.00");
        assert_eq!(summary.totals.total, "$50.00");

        let fee = summary.items.iter().find(|i| i.key == "fee_service").unwrap();
        assert_eq!(fee.percent.as_deref(), Some("10.00%"));
        assert_eq!(fee.amount_cents, 500);
    }

    #[test]
    fn test_order_summary_rejects_overflow() {
        let selections = vec![ticket("1", 1, i64::from(i32::MAX)), ticket("2", 1, 1)];

        let err = build_order_summary(&ConfigState::default(), selections).unwrap_err();
        assert_eq!(err.code, ErrorCode::TotalOverflow);
    }
}
