//! # canteen-core: Pure Pricing Engine for Canteen Ordering
//!
//! This crate holds the cart pricing and promotion-application engine. Every
//! function is a pure function of its inputs: cart lines, a catalog snapshot
//! and the list of promotions the caller considers active.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pricing Pipeline                                 │
//! │                                                                         │
//! │   Cart lines ──┐                                                        │
//! │   Catalog ─────┼──► accumulate_gifts ──► reconcile ──► price_lines ──┐  │
//! │   Promotions ──┘     (BUY_GIVE_FREE)     (free vs     (BUY_X_PAY_Y,  │  │
//! │                                           payable)     PERCENTAGE,    │  │
//! │                                                        THRESHOLD)     │  │
//! │                                                                       │  │
//! │   ┌───────────────────────────────────────────────────────────────────┘  │
//! │   ▼                                                                      │
//! │   PricingResult ──► project() ──────────► DisplayModel (cart screen)     │
//! │   Cart lines ─────► build_order_payload ► Vec<OrderDetail> (checkout)    │
//! │                                                                         │
//! │   NO I/O • NO CLOCK • NO SHARED STATE • SAME INPUT = SAME OUTPUT        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Item identity, cart lines, catalog entries, percentages
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`promotion`] - Promotion rule kinds
//! - [`catalog`] - Catalog lookup seam and snapshot
//! - [`cart`] - Normalized cart
//! - [`pricing`] - Gift accumulation, reconciliation, discount stages
//! - [`checkout`] - Display projection, order payload, availability check
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use canteen_core::catalog::CatalogSnapshot;
//! use canteen_core::pricing::price_cart;
//! use canteen_core::promotion::{BuyXPayY, PromotionRule};
//! use canteen_core::{CartLine, CatalogEntry, ItemKey, Money};
//! use std::num::NonZeroU32;
//!
//! let coffee = ItemKey::product(1);
//! let catalog = CatalogSnapshot::from_entries([CatalogEntry::new(coffee, "Coffee", Money::from_cents(150))]);
//! let rules = [PromotionRule::BuyXPayY(BuyXPayY {
//!     buy_quantity: NonZeroU32::new(3).unwrap(),
//!     pay_quantity: 2,
//!     applies_to: vec![coffee],
//! })];
//!
//! let result = price_cart(&[CartLine::new(coffee, 3)], &catalog, &rules);
//! assert_eq!(result.total_price.cents(), 300);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod promotion;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLimits};
pub use catalog::{CatalogLookup, CatalogSnapshot};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{price_cart, GiftEntry, PricedLine, PricingResult};
pub use promotion::PromotionRule;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// Guards against typing 100 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: u32 = 999;
