//! # Pricing Pipeline
//!
//! Runs the pricing stages over one snapshot of cart, catalog and promotions.
//!
//! ## Stage Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart lines ──► drop lines unknown to the catalog                       │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │               gifts::accumulate_gifts ──► GiftLedger                    │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │               reconcile::reconcile ──► payable / compensated / remaining│
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │               discount::price_lines ──► priced lines, running total     │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │                 PricingResult                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline keeps no state between calls. Any cart change means a fresh
//! [`price_cart`] run; partial results are never patched.

pub mod discount;
pub mod gifts;
pub mod reconcile;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use ts_rs::TS;

use crate::catalog::CatalogLookup;
use crate::money::Money;
use crate::promotion::PromotionRule;
use crate::types::CartLine;

pub use discount::{price_lines, DiscountOutcome, PricedLine};
pub use gifts::{accumulate_gifts, GiftEntry, GiftLedger};
pub use reconcile::{reconcile, Reconciliation};

/// Result of one pricing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    /// Payable lines, in cart order.
    pub lines: Vec<PricedLine>,
    /// Free units drawn from quantities already in the cart.
    pub compensated_gifts: Vec<GiftEntry>,
    /// Free units not matched against any cart line.
    pub uncompensated_gifts: Vec<GiftEntry>,
    /// Amount to pay, never negative.
    pub total_price: Money,
}

/// Prices a cart.
///
/// Cart lines whose item is missing from `catalog` are treated as if they
/// were not in the cart: they trigger no gifts and produce no output.
/// `promotions` must already be the set the caller considers active; rule
/// order matters wherever discounts stack.
pub fn price_cart(
    cart: &[CartLine],
    catalog: &impl CatalogLookup,
    promotions: &[PromotionRule],
) -> PricingResult {
    let known: Vec<CartLine> = cart
        .iter()
        .filter(|line| {
            let found = catalog.lookup(&line.item).is_some();
            if !found {
                trace!(item = %line.item, "cart line not in catalog, dropped from pricing");
            }
            found
        })
        .copied()
        .collect();

    let gifts = accumulate_gifts(&known, promotions);
    let reconciliation = reconcile(&known, gifts);
    let discounted = price_lines(&reconciliation.payable, catalog, promotions);

    debug!(
        lines = discounted.lines.len(),
        compensated = reconciliation.compensated.len(),
        remaining = reconciliation.remaining.len(),
        total = %discounted.running_total,
        "cart priced"
    );

    PricingResult {
        lines: discounted.lines,
        compensated_gifts: reconciliation.compensated,
        uncompensated_gifts: reconciliation.remaining,
        total_price: discounted.running_total,
    }
}
