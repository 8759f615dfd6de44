//! # Gift Accumulator
//!
//! Scans cart lines against BUY_GIVE_FREE rules and collects the free
//! quantities they earn.
//!
//! ```text
//! Cart: 2 × Breakfast combo           Rule: combo → 1 juice + 1 cookie
//!                                           one per trigger unit
//!         │                                        │
//!         └──────────────► accumulate_gifts ◄──────┘
//!                                 │
//!                                 ▼
//!               GiftLedger { PRODUCT#9 (juice): 2, PRODUCT#12 (cookie): 2 }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::promotion::PromotionRule;
use crate::types::{CartLine, ItemKey};

/// A free quantity of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GiftEntry {
    #[serde(flatten)]
    pub item: ItemKey,
    pub quantity: u32,
}

impl GiftEntry {
    #[inline]
    pub const fn new(item: ItemKey, quantity: u32) -> Self {
        GiftEntry { item, quantity }
    }
}

/// Earned free quantities keyed by item.
///
/// Backed by an ordered map so that iterating the leftovers is deterministic.
/// Buckets never hold zero: taking the last unit removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GiftLedger {
    buckets: BTreeMap<ItemKey, u32>,
}

impl GiftLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` free units of `item`.
    pub fn grant(&mut self, item: ItemKey, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let bucket = self.buckets.entry(item).or_insert(0);
        *bucket = bucket.saturating_add(quantity);
    }

    /// Free units currently held for `item`.
    pub fn available(&self, item: &ItemKey) -> u32 {
        self.buckets.get(item).copied().unwrap_or(0)
    }

    /// Takes up to `wanted` units of `item`, returning how many were taken.
    pub fn take(&mut self, item: &ItemKey, wanted: u32) -> u32 {
        let Some(bucket) = self.buckets.get_mut(item) else {
            return 0;
        };
        let taken = wanted.min(*bucket);
        *bucket -= taken;
        if *bucket == 0 {
            self.buckets.remove(item);
        }
        taken
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Remaining buckets, ordered by item.
    pub fn into_entries(self) -> Vec<GiftEntry> {
        self.buckets
            .into_iter()
            .map(|(item, quantity)| GiftEntry::new(item, quantity))
            .collect()
    }
}

/// Collects the free quantities earned by the cart.
///
/// For each line and each BUY_GIVE_FREE rule whose trigger scope lists the
/// line's item, every item in `free_items` is granted
/// `line.quantity` (per-unit rules) or `1` (flat rules). Contributions from
/// several lines or rules for the same free item add up.
pub fn accumulate_gifts(lines: &[CartLine], promotions: &[PromotionRule]) -> GiftLedger {
    let mut ledger = GiftLedger::new();

    for line in lines {
        for rule in promotions {
            let gift = match rule {
                PromotionRule::BuyGiveFree(gift) => gift,
                PromotionRule::BuyXPayY(_) | PromotionRule::Percentage(_) | PromotionRule::Threshold(_) => continue,
            };
            if !gift.applies_to.contains(&line.item) {
                continue;
            }

            let granted = gift.granted_quantity(line.quantity);
            for free_item in &gift.free_items {
                ledger.grant(*free_item, granted);
            }
        }
    }

    ledger
}
