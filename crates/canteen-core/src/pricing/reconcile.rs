//! # Reconciliation Stage
//!
//! Nets earned gifts against what the customer already put in the cart.
//!
//! ## Splitting a Line
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart line: 2 × Juice          Ledger: Juice → 3 free                   │
//! │                                                                         │
//! │    compensated = min(2, 3) = 2   ──► CompensatedGift { Juice, 2 }       │
//! │    payable     = 2 - 2     = 0   ──► (no payable line)                  │
//! │    ledger      = 3 - 2     = 1   ──► remaining gift { Juice, 1 }        │
//! │                                                                         │
//! │  compensated + payable == quantity, always                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::pricing::gifts::{GiftEntry, GiftLedger};
use crate::types::CartLine;

/// Output of [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Lines still to be paid for, in cart order.
    pub payable: Vec<CartLine>,
    /// Free units drawn from quantities already in the cart, in cart order.
    pub compensated: Vec<GiftEntry>,
    /// Gifts not matched by any cart line, ordered by item.
    pub remaining: Vec<GiftEntry>,
}

/// Splits every cart line into a compensated (free) and a payable portion.
///
/// Lines are visited in cart order and each one draws from the ledger bucket
/// of its own item, so the split for one item never affects another.
pub fn reconcile(lines: &[CartLine], mut gifts: GiftLedger) -> Reconciliation {
    let mut out = Reconciliation::default();

    for line in lines {
        let compensated = gifts.take(&line.item, line.quantity);
        let payable = line.quantity - compensated;

        if compensated > 0 {
            out.compensated.push(GiftEntry::new(line.item, compensated));
        }
        if payable > 0 {
            out.payable.push(CartLine::new(line.item, payable));
        }
    }

    out.remaining = gifts.into_entries();
    out
}
