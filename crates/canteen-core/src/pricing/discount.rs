//! # Discount Stage
//!
//! Prices the payable lines and stacks the discounts, in this order:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. BUY_X_PAY_Y   per line, on quantity     q = ⌊q/buy⌋·pay + q mod buy │
//! │                   rule-list order, q carried from one rule to the next  │
//! │  2. subtotal      per line                  q · unit_price              │
//! │  3. PERCENTAGE    per line, on subtotal     compounding, rule order     │
//! │  4. Σ lines       running total                                         │
//! │  5. THRESHOLD     cart level                subtract each, as given     │
//! │  6. clamp         running total             max(0, total)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Example: 13 coffees at $10 with "buy 3 pay 2" and "-10%":
//! `13 → 4·2 + 1 = 9`, `9 · $10 = $90`, `$90 - 10% = $81`.

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::catalog::CatalogLookup;
use crate::money::Money;
use crate::promotion::PromotionRule;
use crate::types::{CartLine, ItemKey};

/// A payable line after discounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub item: ItemKey,
    pub name: String,
    pub unit_price: Money,
    /// Units charged after BUY_X_PAY_Y rules.
    pub payable_quantity: u32,
    /// Payable units at stage entry × unit price.
    pub original_subtotal: Money,
    /// Subtotal after every line-level discount.
    pub final_subtotal: Money,
    /// Labels of the discounts applied, in application order.
    pub applied_labels: Vec<String>,
}

impl PricedLine {
    pub fn is_discounted(&self) -> bool {
        !self.applied_labels.is_empty()
    }
}

/// Output of [`price_lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountOutcome {
    pub lines: Vec<PricedLine>,
    /// Σ final subtotals minus THRESHOLD discounts, clamped at zero.
    pub running_total: Money,
}

/// Applies line-level and cart-level discounts to the payable lines.
///
/// Every THRESHOLD rule in `promotions` is applied: the caller decides which
/// threshold promotions are applicable before pricing, and the rule's own
/// `threshold` is not compared against the running total here.
pub fn price_lines(
    payable: &[CartLine],
    catalog: &impl CatalogLookup,
    promotions: &[PromotionRule],
) -> DiscountOutcome {
    let mut lines = Vec::with_capacity(payable.len());

    for line in payable {
        let Some(entry) = catalog.lookup(&line.item) else {
            trace!(item = %line.item, "payable line has no catalog entry, skipping");
            continue;
        };
        lines.push(price_line(line, entry.name.clone(), entry.unit_price, promotions));
    }

    let mut running_total: Money = lines.iter().map(|line| line.final_subtotal).sum();

    for rule in promotions {
        match rule {
            PromotionRule::Threshold(threshold) => {
                running_total -= threshold.discount_amount;
            }
            PromotionRule::BuyXPayY(_) | PromotionRule::Percentage(_) | PromotionRule::BuyGiveFree(_) => {}
        }
    }

    DiscountOutcome {
        lines,
        running_total: running_total.clamp_non_negative(),
    }
}

fn price_line(line: &CartLine, name: String, unit_price: Money, promotions: &[PromotionRule]) -> PricedLine {
    let entry_quantity = line.quantity;
    let mut quantity = entry_quantity;
    let mut labels = Vec::new();

    for rule in promotions {
        if let PromotionRule::BuyXPayY(rule) = rule {
            if !rule.applies_to.contains(&line.item) {
                continue;
            }
            quantity = rule.payable_quantity(quantity);
            if entry_quantity >= rule.buy_quantity.get() {
                labels.push(rule.label());
            }
        }
    }

    let original_subtotal = unit_price.multiply_quantity(entry_quantity);
    let mut subtotal = unit_price.multiply_quantity(quantity);

    for rule in promotions {
        if let PromotionRule::Percentage(rule) = rule {
            if !rule.applies_to.contains(&line.item) {
                continue;
            }
            subtotal = subtotal.apply_percentage_discount(rule.percentage);
            labels.push(rule.label());
        }
    }

    PricedLine {
        item: line.item,
        name,
        unit_price,
        payable_quantity: quantity,
        original_subtotal,
        final_subtotal: subtotal,
        applied_labels: labels,
    }
}
