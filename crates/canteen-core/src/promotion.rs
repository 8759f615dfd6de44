//! # Promotion Rules
//!
//! The four promotion kinds the cafeteria runs, as one closed enum.
//!
//! ## Rule Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Promotion Kinds                                  │
//! │                                                                         │
//! │  BUY_X_PAY_Y      "3x2 on coffee"        item scope, quantity stage    │
//! │  PERCENTAGE       "-10% on combos"       item scope, subtotal stage    │
//! │  THRESHOLD        "$10 off over $50"     cart level, total stage       │
//! │  BUY_GIVE_FREE    "combo → free juice"   item scope, gift stage        │
//! │                                                                         │
//! │  Wire format: { "type": "BUY_X_PAY_Y", "buyQuantity": 3, ... }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every stage matches on [`PromotionRule`] exhaustively, so adding a kind is
//! a compile error everywhere it has to be handled.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{ItemKey, Percentage};

/// A promotion rule, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionRule {
    BuyXPayY(BuyXPayY),
    Percentage(PercentageOff),
    Threshold(Threshold),
    BuyGiveFree(BuyGiveFree),
}

impl PromotionRule {
    /// Wire name of the rule kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PromotionRule::BuyXPayY(_) => "BUY_X_PAY_Y",
            PromotionRule::Percentage(_) => "PERCENTAGE",
            PromotionRule::Threshold(_) => "THRESHOLD",
            PromotionRule::BuyGiveFree(_) => "BUY_GIVE_FREE",
        }
    }

    /// Items the rule is scoped to. Empty for cart-level rules.
    pub fn applies_to(&self) -> &[ItemKey] {
        match self {
            PromotionRule::BuyXPayY(rule) => &rule.applies_to,
            PromotionRule::Percentage(rule) => &rule.applies_to,
            PromotionRule::BuyGiveFree(rule) => &rule.applies_to,
            PromotionRule::Threshold(_) => &[],
        }
    }

    /// True when the rule is item-scoped and lists `item`.
    pub fn matches(&self, item: &ItemKey) -> bool {
        self.applies_to().contains(item)
    }
}

// =============================================================================
// BUY_X_PAY_Y
// =============================================================================

/// Buy `buy_quantity` units, pay only `pay_quantity` of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BuyXPayY {
    #[ts(type = "number")]
    pub buy_quantity: NonZeroU32,
    pub pay_quantity: u32,
    pub applies_to: Vec<ItemKey>,
}

impl BuyXPayY {
    /// Quantity left to pay after grouping `qty` units.
    ///
    /// ```rust
    /// use canteen_core::promotion::BuyXPayY;
    /// use std::num::NonZeroU32;
    ///
    /// let three_for_two = BuyXPayY {
    ///     buy_quantity: NonZeroU32::new(3).unwrap(),
    ///     pay_quantity: 2,
    ///     applies_to: vec![],
    /// };
    /// // 13 = 4 groups of 3 + 1 → 4 * 2 + 1
    /// assert_eq!(three_for_two.payable_quantity(13), 9);
    /// assert_eq!(three_for_two.payable_quantity(2), 2);
    /// ```
    pub fn payable_quantity(&self, qty: u32) -> u32 {
        let buy = self.buy_quantity.get();
        let groups = qty / buy;
        let remainder = qty % buy;
        groups.saturating_mul(self.pay_quantity).saturating_add(remainder)
    }

    /// Label shown next to the line, e.g. `Buy 3 pay 2`.
    pub fn label(&self) -> String {
        format!("Buy {} pay {}", self.buy_quantity, self.pay_quantity)
    }
}

// =============================================================================
// PERCENTAGE
// =============================================================================

/// Percentage off the line subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PercentageOff {
    #[ts(type = "number")]
    pub percentage: Percentage,
    pub applies_to: Vec<ItemKey>,
}

impl PercentageOff {
    /// Label shown next to the line, e.g. `-10%`.
    pub fn label(&self) -> String {
        format!("-{}%", self.percentage)
    }
}

// =============================================================================
// THRESHOLD
// =============================================================================

/// Flat amount off the cart total.
///
/// `threshold` is informational for the pricing stage; callers decide which
/// threshold rules are applicable before pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    pub threshold: Money,
    pub discount_amount: Money,
}

// =============================================================================
// BUY_GIVE_FREE
// =============================================================================

/// Buying a trigger item earns free units of every item in `free_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BuyGiveFree {
    pub applies_to: Vec<ItemKey>,
    pub free_items: Vec<ItemKey>,
    /// One free unit per trigger unit bought, instead of one per line.
    pub one_free_per_trigger_unit: bool,
}

impl BuyGiveFree {
    /// Free units granted per free item for a trigger line of `qty` units.
    #[inline]
    pub fn granted_quantity(&self, qty: u32) -> u32 {
        if self.one_free_per_trigger_unit {
            qty
        } else {
            1
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
