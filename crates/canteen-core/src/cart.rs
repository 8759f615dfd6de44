//! # Cart
//!
//! A normalized cart: one line per [`ItemKey`], every quantity positive.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action              Method                  Effect                │
//! │  ───────────              ──────                  ──────                │
//! │  Tap item ───────────────► add_item() ──────────► merge or push line   │
//! │  Change quantity ────────► update_quantity() ───► set qty (0 removes)  │
//! │  Tap remove ─────────────► remove_item() ───────► drop line            │
//! │  Order placed ───────────► clear() ─────────────► empty cart           │
//! │                                                                         │
//! │  Every change is followed by a full price_cart() run over lines().     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::types::{CartLine, ItemKey};
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Size limits applied while editing a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLimits {
    pub max_items: usize,
    pub max_item_quantity: u32,
}

impl Default for CartLimits {
    fn default() -> Self {
        CartLimits {
            max_items: MAX_CART_ITEMS,
            max_item_quantity: MAX_ITEM_QUANTITY,
        }
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by item (adding the same item increases quantity)
/// - Quantity is always > 0 (setting it to 0 removes the line)
/// - Line order is insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    limits: CartLimits,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: CartLimits) -> Self {
        Cart {
            lines: Vec::new(),
            limits,
        }
    }

    /// Builds a normalized cart from raw lines: duplicate keys are merged,
    /// zero quantities dropped, and merged quantities capped at the limit.
    ///
    /// Once `max_items` distinct lines are held, lines for further items are
    /// dropped with a warning.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>, limits: CartLimits) -> Self {
        let mut cart = Cart::with_limits(limits);
        let mut dropped = 0usize;
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            match cart.position(&line.item) {
                Some(idx) => {
                    let merged = cart.lines[idx].quantity.saturating_add(line.quantity);
                    cart.lines[idx].quantity = merged.min(limits.max_item_quantity);
                }
                None if cart.lines.len() >= limits.max_items => dropped += 1,
                None => cart.lines.push(CartLine::new(line.item, line.quantity.min(limits.max_item_quantity))),
            }
        }
        if dropped > 0 {
            warn!(dropped, max_items = limits.max_items, "cart lines over the item limit dropped");
        }
        cart
    }

    /// Adds `quantity` units of `item`, merging with an existing line.
    pub fn add_item(&mut self, item: ItemKey, quantity: u32) -> CoreResult<()> {
        validate_quantity(quantity, self.limits.max_item_quantity)?;

        if let Some(idx) = self.position(&item) {
            let new_qty = self.lines[idx].quantity.saturating_add(quantity);
            if new_qty > self.limits.max_item_quantity {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: self.limits.max_item_quantity,
                });
            }
            self.lines[idx].quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= self.limits.max_items {
            return Err(CoreError::CartTooLarge {
                max: self.limits.max_items,
            });
        }

        self.lines.push(CartLine::new(item, quantity));
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes it.
    pub fn update_quantity(&mut self, item: ItemKey, quantity: u32) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(item);
        }

        if quantity > self.limits.max_item_quantity {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: self.limits.max_item_quantity,
            });
        }

        let idx = self.position(&item).ok_or(CoreError::ItemNotInCart(item))?;
        self.lines[idx].quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, item: ItemKey) -> CoreResult<()> {
        let idx = self.position(&item).ok_or(CoreError::ItemNotInCart(item))?;
        self.lines.remove(idx);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn limits(&self) -> CartLimits {
        self.limits
    }

    pub fn quantity_of(&self, item: &ItemKey) -> u32 {
        self.position(item).map_or(0, |idx| self.lines[idx].quantity)
    }

    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| line.quantity as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, item: &ItemKey) -> Option<usize> {
        self.lines.iter().position(|line| line.item == *item)
    }
}
