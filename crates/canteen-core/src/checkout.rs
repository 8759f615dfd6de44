//! # Presentation & Checkout Projector
//!
//! Turns a [`PricingResult`] into what the cart screen shows, and a cart into
//! what the order service receives.
//!
//! ## Two Projections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PricingResult ──► project() ──► DisplayModel                           │
//! │                                  ├── lines   (strikethrough if labels)  │
//! │                                  ├── gifts   COMPENSATED / FREE, $0.00  │
//! │                                  └── total                              │
//! │                                                                         │
//! │  Cart lines ─────┐                                                      │
//! │                  ├─► build_order_payload() ──► [OrderDetail]            │
//! │  Remaining gifts ┘    original quantities, not discounted ones          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order payload carries quantities only. The order service recomputes
//! prices and discounts on its side, so the payable quantities from the
//! discount stage are display data and never flow into the order.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::catalog::CatalogLookup;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{GiftEntry, PricingResult};
use crate::types::{CartLine, ItemKey, ItemKind};

// =============================================================================
// Display Model
// =============================================================================

/// Cart screen model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DisplayModel {
    pub lines: Vec<DisplayLine>,
    pub gifts: Vec<GiftBadge>,
    pub total_price: Money,
}

/// One paid line on the cart screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLine {
    pub item: ItemKey,
    pub name: String,
    pub quantity: u32,
    pub original_price: Money,
    pub final_price: Money,
    /// Show `original_price` struck through next to `final_price`.
    pub strikethrough: bool,
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
}

/// Why a gift is shown at zero price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BadgeKind {
    /// Units the customer had in the cart that a gift now covers.
    Compensated,
    /// Bonus units the customer never added.
    Free,
}

/// A gift shown on the cart screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GiftBadge {
    pub item: ItemKey,
    pub name: String,
    pub quantity: u32,
    pub badge: BadgeKind,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
}

/// Builds the cart screen model.
///
/// Compensated badges come first, then free ones. Gifts whose item has no
/// catalog entry have nothing to render and are left out of the model.
pub fn project(result: &PricingResult, catalog: &impl CatalogLookup) -> DisplayModel {
    let lines = result
        .lines
        .iter()
        .map(|line| DisplayLine {
            item: line.item,
            name: line.name.clone(),
            quantity: line.payable_quantity,
            original_price: line.original_subtotal,
            final_price: line.final_subtotal,
            strikethrough: line.is_discounted(),
            labels: line.applied_labels.clone(),
            image: catalog.lookup(&line.item).and_then(|entry| entry.image.clone()),
        })
        .collect();

    let compensated = result
        .compensated_gifts
        .iter()
        .map(|gift| (gift, BadgeKind::Compensated));
    let free = result
        .uncompensated_gifts
        .iter()
        .map(|gift| (gift, BadgeKind::Free));

    let gifts = compensated
        .chain(free)
        .filter_map(|(gift, badge)| {
            let Some(entry) = catalog.lookup(&gift.item) else {
                debug!(item = %gift.item, "gift has no catalog entry, not displayed");
                return None;
            };
            Some(GiftBadge {
                item: gift.item,
                name: entry.name.clone(),
                quantity: gift.quantity,
                badge,
                price: Money::zero(),
                image: entry.image.clone(),
            })
        })
        .collect();

    DisplayModel {
        lines,
        gifts,
        total_price: result.total_price,
    }
}

// =============================================================================
// Order Payload
// =============================================================================

/// One line of the order submission.
///
/// Serializes as `{ "productId": 3, "comboId": null, "quantity": 2 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub product_id: Option<i64>,
    pub combo_id: Option<i64>,
    pub quantity: u32,
}

impl OrderDetail {
    pub fn new(item: ItemKey, quantity: u32) -> Self {
        let (product_id, combo_id) = match item.kind {
            ItemKind::Product => (Some(item.id), None),
            ItemKind::Combo => (None, Some(item.id)),
        };
        OrderDetail {
            product_id,
            combo_id,
            quantity,
        }
    }
}

/// Builds the order submission from the cart.
///
/// Every cart line is sent at its original quantity. Each remaining gift whose
/// item is not already in the cart is appended at the gift quantity. Repeated
/// items are merged by summing, keeping first-seen order.
///
/// Run [`ensure_available`] first; this function does not check stock.
pub fn build_order_payload(cart: &[CartLine], remaining_gifts: &[GiftEntry]) -> Vec<OrderDetail> {
    let mut merged: Vec<(ItemKey, u32)> = Vec::with_capacity(cart.len() + remaining_gifts.len());

    let gifts_not_in_cart = remaining_gifts
        .iter()
        .filter(|gift| !cart.iter().any(|line| line.item == gift.item))
        .map(|gift| (gift.item, gift.quantity));

    for (item, quantity) in cart.iter().map(|line| (line.item, line.quantity)).chain(gifts_not_in_cart) {
        match merged.iter_mut().find(|(key, _)| *key == item) {
            Some((_, total)) => *total = total.saturating_add(quantity),
            None => merged.push((item, quantity)),
        }
    }

    merged
        .into_iter()
        .filter(|(_, quantity)| *quantity > 0)
        .map(|(item, quantity)| OrderDetail::new(item, quantity))
        .collect()
}

// =============================================================================
// Availability Precondition
// =============================================================================

/// Blocks checkout when any cart item is flagged unavailable.
///
/// Items missing from the catalog are ignored, as in pricing.
pub fn ensure_available(cart: &[CartLine], catalog: &impl CatalogLookup) -> CoreResult<()> {
    for line in cart {
        if let Some(entry) = catalog.lookup(&line.item) {
            if !entry.available {
                return Err(CoreError::InsufficientStock {
                    item: line.item,
                    name: entry.name.clone(),
                });
            }
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
