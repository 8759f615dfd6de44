//! End-to-end pricing scenarios: cart + catalog + promotions → result,
//! display model and order payload.

use std::num::NonZeroU32;

use canteen_core::checkout::{build_order_payload, ensure_available, project, BadgeKind, OrderDetail};
use canteen_core::pricing::price_cart;
use canteen_core::promotion::{BuyGiveFree, BuyXPayY, PercentageOff, PromotionRule, Threshold};
use canteen_core::{CartLine, CatalogEntry, CatalogSnapshot, CoreError, GiftEntry, ItemKey, Money, Percentage};

const COFFEE: ItemKey = ItemKey::product(1);
const MEDIALUNA: ItemKey = ItemKey::product(2);
const JUICE: ItemKey = ItemKey::product(3);
const BREAKFAST: ItemKey = ItemKey::combo(1);
// Shares id 2 with MEDIALUNA.
const LUNCH: ItemKey = ItemKey::combo(2);

fn catalog() -> CatalogSnapshot {
    CatalogSnapshot::from_entries([
        CatalogEntry::new(COFFEE, "Coffee", Money::from_cents(1000)),
        CatalogEntry::new(MEDIALUNA, "Medialuna", Money::from_cents(500)),
        CatalogEntry::new(JUICE, "Orange juice", Money::from_cents(300)),
        CatalogEntry::new(BREAKFAST, "Breakfast combo", Money::from_cents(1500)),
        CatalogEntry::new(LUNCH, "Lunch combo", Money::from_cents(2500)),
    ])
}

fn buy_x_pay_y(buy: u32, pay: u32, items: &[ItemKey]) -> PromotionRule {
    PromotionRule::BuyXPayY(BuyXPayY {
        buy_quantity: NonZeroU32::new(buy).unwrap(),
        pay_quantity: pay,
        applies_to: items.to_vec(),
    })
}

fn percent_off(pct: f64, items: &[ItemKey]) -> PromotionRule {
    PromotionRule::Percentage(PercentageOff {
        percentage: Percentage::from_percent(pct).unwrap(),
        applies_to: items.to_vec(),
    })
}

fn give_free(triggers: &[ItemKey], free: &[ItemKey], per_unit: bool) -> PromotionRule {
    PromotionRule::BuyGiveFree(BuyGiveFree {
        applies_to: triggers.to_vec(),
        free_items: free.to_vec(),
        one_free_per_trigger_unit: per_unit,
    })
}

fn threshold(threshold: i64, discount: i64) -> PromotionRule {
    PromotionRule::Threshold(Threshold {
        threshold: Money::from_cents(threshold),
        discount_amount: Money::from_cents(discount),
    })
}

#[test]
fn test_thirteen_coffees_three_for_two_then_ten_percent() {
    let rules = [buy_x_pay_y(3, 2, &[COFFEE]), percent_off(10.0, &[COFFEE])];
    let result = price_cart(&[CartLine::new(COFFEE, 13)], &catalog(), &rules);

    assert_eq!(result.lines[0].payable_quantity, 9);
    assert_eq!(result.total_price, Money::from_cents(8100));
}

#[test]
fn test_gift_compensates_units_already_in_cart() {
    let rules = [give_free(&[BREAKFAST], &[MEDIALUNA], true)];
    let cart = [CartLine::new(BREAKFAST, 3), CartLine::new(MEDIALUNA, 2)];
    let result = price_cart(&cart, &catalog(), &rules);

    assert_eq!(result.compensated_gifts, vec![GiftEntry::new(MEDIALUNA, 2)]);
    assert_eq!(result.uncompensated_gifts, vec![GiftEntry::new(MEDIALUNA, 1)]);
    assert!(result.lines.iter().all(|line| line.item != MEDIALUNA));
    assert_eq!(result.total_price, Money::from_cents(4500));
}

#[test]
fn test_flat_gift_grants_one_unit_per_free_item() {
    let rules = [give_free(&[BREAKFAST], &[JUICE, MEDIALUNA], false)];
    for qty in [1, 100] {
        let result = price_cart(&[CartLine::new(BREAKFAST, qty)], &catalog(), &rules);
        assert_eq!(
            result.uncompensated_gifts,
            vec![GiftEntry::new(MEDIALUNA, 1), GiftEntry::new(JUICE, 1)]
        );
    }
}

#[test]
fn test_per_unit_gift_scales_with_trigger_quantity() {
    let rules = [give_free(&[BREAKFAST], &[JUICE], true)];
    let result = price_cart(&[CartLine::new(BREAKFAST, 4)], &catalog(), &rules);
    assert_eq!(result.uncompensated_gifts, vec![GiftEntry::new(JUICE, 4)]);
}

#[test]
fn test_threshold_applies_and_clamps() {
    let rules = [threshold(5000, 1000)];

    let result = price_cart(&[CartLine::new(COFFEE, 5)], &catalog(), &rules);
    assert_eq!(result.total_price, Money::from_cents(4000));

    let empty = price_cart(&[], &catalog(), &rules);
    assert_eq!(empty.total_price, Money::zero());
}

#[test]
fn test_kinds_with_same_id_do_not_collide() {
    let rules = [percent_off(50.0, &[LUNCH])];
    let cart = [CartLine::new(COFFEE, 1), CartLine::new(ItemKey::product(2), 1), CartLine::new(LUNCH, 1)];
    let result = price_cart(&cart, &catalog(), &rules);

    // Coffee 1000 + Medialuna 500 + Lunch 2500 at half price
    assert_eq!(result.total_price, Money::from_cents(2750));
    assert_eq!(result.lines[2].applied_labels, vec!["-50%"]);
    assert!(result.lines[1].applied_labels.is_empty());
}

#[test]
fn test_conservation_and_no_over_compensation() {
    let rules = [
        give_free(&[BREAKFAST], &[COFFEE, JUICE], true),
        give_free(&[LUNCH], &[COFFEE], false),
        buy_x_pay_y(2, 1, &[COFFEE]),
    ];
    let cart = [
        CartLine::new(BREAKFAST, 2),
        CartLine::new(LUNCH, 5),
        CartLine::new(COFFEE, 7),
        CartLine::new(JUICE, 1),
    ];
    let result = price_cart(&cart, &catalog(), &rules);

    // Granted: COFFEE 2 + 1 = 3, JUICE 2
    for (item, granted) in [(COFFEE, 3), (JUICE, 2)] {
        let compensated: u32 = result
            .compensated_gifts
            .iter()
            .filter(|g| g.item == item)
            .map(|g| g.quantity)
            .sum();
        let remaining: u32 = result
            .uncompensated_gifts
            .iter()
            .filter(|g| g.item == item)
            .map(|g| g.quantity)
            .sum();
        assert!(compensated <= granted);
        assert_eq!(compensated + remaining, granted);
    }

    // COFFEE: 7 in cart, 3 compensated, 4 payable → buy 2 pay 1 → 2
    let coffee = result.lines.iter().find(|l| l.item == COFFEE).unwrap();
    assert_eq!(coffee.payable_quantity, 2);
    assert!(result.lines.iter().all(|l| l.item != JUICE));
    assert_eq!(result.uncompensated_gifts, vec![GiftEntry::new(JUICE, 1)]);
}

#[test]
fn test_total_never_negative() {
    let rules = [percent_off(100.0, &[COFFEE]), threshold(0, 99_999), threshold(0, 1)];
    let result = price_cart(&[CartLine::new(COFFEE, 3), CartLine::new(JUICE, 1)], &catalog(), &rules);
    assert_eq!(result.total_price, Money::zero());
}

#[test]
fn test_unknown_items_are_dropped() {
    let ghost = ItemKey::product(404);
    let rules = [give_free(&[ghost], &[JUICE], true)];
    let result = price_cart(&[CartLine::new(ghost, 2), CartLine::new(COFFEE, 1)], &catalog(), &rules);

    assert_eq!(result.lines.len(), 1);
    assert!(result.uncompensated_gifts.is_empty());
    assert_eq!(result.total_price, Money::from_cents(1000));
}

#[test]
fn test_pipeline_is_idempotent() {
    let rules = [
        give_free(&[BREAKFAST], &[JUICE, MEDIALUNA], true),
        buy_x_pay_y(3, 2, &[COFFEE, LUNCH]),
        percent_off(12.5, &[COFFEE]),
        threshold(2000, 250),
    ];
    let cart = [
        CartLine::new(LUNCH, 4),
        CartLine::new(BREAKFAST, 2),
        CartLine::new(COFFEE, 8),
        CartLine::new(JUICE, 1),
    ];

    let first = price_cart(&cart, &catalog(), &rules);
    let second = price_cart(&cart, &catalog(), &rules);

    assert_eq!(first, second);
    assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
}

#[test]
fn test_display_and_payload_from_one_pass() {
    let rules = [
        give_free(&[BREAKFAST], &[JUICE], true),
        buy_x_pay_y(3, 2, &[COFFEE]),
    ];
    let cart = [CartLine::new(BREAKFAST, 2), CartLine::new(COFFEE, 3)];
    let catalog = catalog();
    let result = price_cart(&cart, &catalog, &rules);
    let model = project(&result, &catalog);

    assert_eq!(model.lines.len(), 2);
    assert!(!model.lines[0].strikethrough);
    assert!(model.lines[1].strikethrough);
    assert_eq!(model.lines[1].original_price, Money::from_cents(3000));
    assert_eq!(model.lines[1].final_price, Money::from_cents(2000));
    assert_eq!(model.gifts.len(), 1);
    assert_eq!(model.gifts[0].badge, BadgeKind::Free);
    assert_eq!(model.total_price, Money::from_cents(5000));

    assert!(ensure_available(&cart, &catalog).is_ok());
    let payload = build_order_payload(&cart, &result.uncompensated_gifts);
    assert_eq!(
        payload,
        vec![
            OrderDetail::new(BREAKFAST, 2),
            OrderDetail::new(COFFEE, 3),
            OrderDetail::new(JUICE, 2),
        ]
    );
}

#[test]
fn test_unavailable_item_blocks_checkout() {
    let catalog = CatalogSnapshot::from_entries([
        CatalogEntry::new(COFFEE, "Coffee", Money::from_cents(1000)).unavailable(),
    ]);
    let err = ensure_available(&[CartLine::new(COFFEE, 1)], &catalog).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientStock { .. }));
    assert_eq!(err.to_string(), "Insufficient stock for Coffee (PRODUCT#1)");
}

#[test]
fn test_menu_json_prices_in_decimal_amounts() {
    let catalog: Vec<CatalogEntry> = serde_json::from_str(
        r#"[{ "id": 1, "kind": "PRODUCT", "name": "Coffee", "unitPrice": 10.5 },
            { "id": 3, "kind": "PRODUCT", "name": "Orange juice", "unitPrice": 3 }]"#,
    )
    .unwrap();
    let rules: Vec<PromotionRule> =
        serde_json::from_str(r#"[{ "type": "THRESHOLD", "threshold": 50, "discountAmount": 10 }]"#).unwrap();
    let catalog = CatalogSnapshot::from_entries(catalog);

    // 4 × $10.50 + 3 × $3 = $51, less $10
    let cart = [CartLine::new(COFFEE, 4), CartLine::new(JUICE, 3)];
    let result = price_cart(&cart, &catalog, &rules);
    assert_eq!(result.total_price, Money::from_cents(4100));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["totalPrice"], serde_json::json!(41.0));
}

#[test]
fn test_huge_line_saturates_instead_of_panicking() {
    let catalog = CatalogSnapshot::from_entries([CatalogEntry::new(COFFEE, "Coffee", Money::from_cents(3_000_000_000))]);
    let result = price_cart(&[CartLine::new(COFFEE, u32::MAX)], &catalog, &[threshold(0, 100)]);
    assert_eq!(result.total_price, Money::from_cents(i64::MAX - 100));
}
