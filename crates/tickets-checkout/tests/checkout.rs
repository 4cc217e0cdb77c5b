//! End-to-end checkout flows driven by JSON selections.

use serde_json::json;
use tickets_checkout::commands::{
    add_to_cart, build_order_summary, clear_cart, get_cart, remove_from_cart, update_cart_item,
};
use tickets_checkout::{CartState, CheckoutConfig, ConfigState, ErrorCode, Selection};

fn selection(value: serde_json::Value) -> Selection {
    serde_json::from_value(value).unwrap()
}

fn selections(value: serde_json::Value) -> Vec<Selection> {
    serde_json::from_value(value).unwrap()
}

fn euro_config() -> ConfigState {
    let config = CheckoutConfig::from_toml_str(
        r#"
        [currency]
        symbol = "€"
        position = "after"
        thousands_separator = "."
        decimal_separator = ","

        [cart]
        max_items = 5
        max_quantity = 20
        "#,
    )
    .unwrap();
    ConfigState::new(config).unwrap()
}

#[test]
fn ticket_with_covering_coupon_is_free() {
    let summary = build_order_summary(
        &ConfigState::default(),
        selections(json!([
            { "type": "ticket", "id": "1", "quantity": 2, "priceCents": 500 },
            { "type": "coupon", "id": "2", "subType": "flat", "value": 1500 }
        ])),
    )
    .unwrap();

    assert_eq!(summary.totals.subtotal_cents, 1000);
    assert_eq!(summary.totals.discounts_cents, -1500);
    assert_eq!(summary.totals.total_cents, 0);
    assert_eq!(summary.totals.total, "$0.00");
}

#[test]
fn percent_fee_is_charged_on_subtotal() {
    let summary = build_order_summary(
        &ConfigState::default(),
        selections(json!([
            { "type": "ticket", "id": "1", "priceCents": 1000 },
            { "type": "fee", "id": "service", "subType": "percent", "value": 10 }
        ])),
    )
    .unwrap();

    assert_eq!(summary.totals.fees_cents, 100);
    assert_eq!(summary.totals.total_cents, 1100);
    assert_eq!(summary.totals.total, "$11.00");
}

#[test]
fn repeated_selections_merge() {
    let summary = build_order_summary(
        &ConfigState::default(),
        selections(json!([
            { "type": "ticket", "id": "ga", "quantity": 2, "priceCents": 500 },
            { "type": "ticket", "id": "ga", "quantity": 3, "priceCents": 500 }
        ])),
    )
    .unwrap();

    assert_eq!(summary.items.len(), 1);
    assert_eq!(summary.items[0].quantity, 5);
    assert_eq!(summary.totals.total_cents, 2500);
}

#[test]
fn invalid_selection_is_a_validation_error() {
    let err = build_order_summary(
        &ConfigState::default(),
        selections(json!([
            { "type": "ticket", "id": "bad id", "priceCents": 500 }
        ])),
    )
    .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationError);
    let body = serde_json::to_value(&err).unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[test]
fn session_flow_with_locale_formatting() {
    let cart = CartState::new();
    let config = euro_config();

    add_to_cart(
        &cart,
        &config,
        selection(json!({ "type": "ticket", "id": "vip", "quantity": 10, "priceCents": 12500 })),
    )
    .unwrap();
    add_to_cart(
        &cart,
        &config,
        selection(json!({ "type": "fee", "id": "booking", "subType": "flat", "value": 250 })),
    )
    .unwrap();
    let response = add_to_cart(
        &cart,
        &config,
        selection(json!({ "type": "coupon", "id": "EARLY", "subType": "percent", "value": 15 })),
    )
    .unwrap();

    // 125000 + 250 - 18750
    assert_eq!(response.totals.total_cents, 106_500);
    assert_eq!(response.totals.subtotal, "1.250,00€");
    assert_eq!(response.totals.discounts, "-187,50€");
    assert_eq!(response.totals.total, "1.065,00€");

    let response = update_cart_item(&cart, &config, "ticket_vip", 2).unwrap();
    assert_eq!(response.totals.total, "215,00€");

    let response = remove_from_cart(&cart, &config, "coupon_EARLY").unwrap();
    assert_eq!(response.totals.total, "252,50€");
    assert_eq!(get_cart(&cart, &config), response);

    let err = update_cart_item(&cart, &config, "ticket_vip", 21).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let response = clear_cart(&cart, &config);
    assert_eq!(response.totals.item_count, 0);
    assert_eq!(response.totals.total, "0,00€");
}

#[test]
fn response_json_is_camel_case() {
    let cart = CartState::new();
    let config = ConfigState::default();
    let response = add_to_cart(
        &cart,
        &config,
        selection(json!({ "type": "ticket", "id": "1", "priceCents": 999 })),
    )
    .unwrap();

    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["totals"]["totalCents"], 999);
    assert_eq!(body["totals"]["total"], "$9.99");
    assert_eq!(body["items"][0]["itemType"], "ticket");
    assert_eq!(body["items"][0]["subType"], "flat");
    assert!(body["sessionId"].is_string());
}
