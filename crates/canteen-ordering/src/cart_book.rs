//! # Cart Book
//!
//! One cart per authenticated identity.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add / update / remove ──► with_cart_mut(identity) ──► lock, edit,      │
//! │                                                         unlock          │
//! │                                                                         │
//! │  quote / checkout ───────► snapshot(identity) ───────► lock, clone,     │
//! │                                                         unlock          │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                        pricing runs on the clone, lock not held         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored Format
//! A cart is persisted as its line list, one JSON array per identity:
//! ```json
//! [{ "id": 3, "kind": "PRODUCT", "quantity": 2 }, { "id": 1, "kind": "COMBO", "quantity": 1 }]
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use canteen_core::{Cart, CartLimits, CartLine};
use tracing::debug;

use crate::error::OrderingResult;

/// One persisted cart line.
pub type StoredCartEntry = CartLine;

/// Carts keyed by identity, shareable across tasks.
#[derive(Debug, Clone, Default)]
pub struct CartBook {
    carts: Arc<Mutex<HashMap<String, Cart>>>,
    limits: CartLimits,
}

impl CartBook {
    /// Creates an empty book whose carts use `limits`.
    pub fn new(limits: CartLimits) -> Self {
        CartBook {
            carts: Arc::new(Mutex::new(HashMap::new())),
            limits,
        }
    }

    pub fn limits(&self) -> CartLimits {
        self.limits
    }

    // Poisoned locks are recovered; closures never leave a cart half-edited.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Cart>> {
        self.carts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to an identity's cart.
    ///
    /// Identities without a cart see an empty one.
    pub fn with_cart<F, R>(&self, identity: &str, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let carts = self.lock();
        match carts.get(identity) {
            Some(cart) => f(cart),
            None => f(&Cart::with_limits(self.limits)),
        }
    }

    /// Executes a function with write access to an identity's cart.
    ///
    /// The cart is created on first use and dropped again once it is empty.
    pub fn with_cart_mut<F, R>(&self, identity: &str, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut carts = self.lock();
        let cart = carts
            .entry(identity.to_string())
            .or_insert_with(|| Cart::with_limits(self.limits));
        let out = f(cart);
        if cart.is_empty() {
            carts.remove(identity);
        }
        out
    }

    /// Copy of the identity's cart lines, in cart order.
    pub fn snapshot(&self, identity: &str) -> Vec<StoredCartEntry> {
        self.with_cart(identity, |cart| cart.lines().to_vec())
    }

    /// Replaces the identity's cart with `entries`, normalizing them.
    pub fn restore(&self, identity: &str, entries: Vec<StoredCartEntry>) {
        let cart = Cart::from_lines(entries, self.limits);
        let mut carts = self.lock();
        if cart.is_empty() {
            carts.remove(identity);
        } else {
            debug!(identity, lines = cart.lines().len(), "Cart restored");
            carts.insert(identity.to_string(), cart);
        }
    }

    pub fn clear(&self, identity: &str) {
        self.lock().remove(identity);
    }

    /// Identities holding a non-empty cart, sorted.
    pub fn identities(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Serializes the identity's cart in the stored format.
    pub fn export_json(&self, identity: &str) -> OrderingResult<String> {
        Ok(serde_json::to_string(&self.snapshot(identity))?)
    }

    /// Restores the identity's cart from the stored format.
    pub fn import_json(&self, identity: &str, json: &str) -> OrderingResult<()> {
        let entries: Vec<StoredCartEntry> = serde_json::from_str(json)?;
        self.restore(identity, entries);
        Ok(())
    }
}
