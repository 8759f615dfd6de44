//! # Domain Types
//!
//! Core domain types used throughout the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    ItemKey      │   │    CartLine     │   │  CatalogEntry   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄──│  item           │   │  item           │       │
//! │  │  kind           │   │  quantity (u32) │   │  name           │       │
//! │  └─────────────────┘   └─────────────────┘   │  unit_price     │       │
//! │                                              │  available      │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  image          │       │
//! │  │    ItemKind     │   │   Percentage    │   └─────────────────┘       │
//! │  │  PRODUCT        │   │  bps (u32)      │                             │
//! │  │  COMBO          │   │  1000 = 10%     │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Composite Keys
//! Products and combos live in separate id spaces, so product 3 and combo 3
//! are different items. Every map in the engine is keyed by [`ItemKey`],
//! never by a formatted string.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Item Identity
// =============================================================================

/// Whether an item is a single product or a combo of products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Product,
    Combo,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Product => write!(f, "PRODUCT"),
            ItemKind::Combo => write!(f, "COMBO"),
        }
    }
}

/// Identity of a sellable item: `(id, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemKey {
    pub id: i64,
    pub kind: ItemKind,
}

impl ItemKey {
    #[inline]
    pub const fn new(id: i64, kind: ItemKind) -> Self {
        ItemKey { id, kind }
    }

    #[inline]
    pub const fn product(id: i64) -> Self {
        ItemKey::new(id, ItemKind::Product)
    }

    #[inline]
    pub const fn combo(id: i64) -> Self {
        ItemKey::new(id, ItemKind::Combo)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One line of the cart: an item and how many of it were ordered.
///
/// Serializes flat as `{ "id": 4, "kind": "COMBO", "quantity": 2 }`, which is
/// also the shape the cart storage keeps per identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: ItemKey,
    pub quantity: u32,
}

impl CartLine {
    #[inline]
    pub const fn new(item: ItemKey, quantity: u32) -> Self {
        CartLine { item, quantity }
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// Read-only catalog data for one item, as supplied by the menu service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub item: ItemKey,

    /// Display name shown on the cart screen.
    pub name: String,

    /// Price of one unit. A decimal amount on the wire.
    pub unit_price: Money,

    /// False when the kitchen has run out of this item.
    #[serde(default = "default_available")]
    pub available: bool,

    /// Raw image bytes for the cart thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
}

fn default_available() -> bool {
    true
}

impl CatalogEntry {
    /// Creates an available entry without an image.
    pub fn new(item: ItemKey, name: impl Into<String>, unit_price: Money) -> Self {
        CatalogEntry {
            item,
            name: name.into(),
            unit_price,
            available: true,
            image: None,
        }
    }

    /// Marks the entry as unavailable.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

// =============================================================================
// Percentage
// =============================================================================

/// A percentage in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10% and 10000 bps = 100%.
/// Promotions arrive as decimal numbers (`12.5`) and are converted once on
/// the way in; arithmetic stays integer from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(u32);

impl Percentage {
    /// 100% in basis points.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a percentage from basis points, capped at 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::MAX_BPS {
            Percentage(Self::MAX_BPS)
        } else {
            Percentage(bps)
        }
    }

    /// Creates a percentage from a decimal value in `[0, 100]`.
    pub fn from_percent(pct: f64) -> Option<Self> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return None;
        }
        Some(Percentage((pct * 100.0).round() as u32))
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the value as a decimal percentage (display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl TryFrom<f64> for Percentage {
    type Error = String;

    fn try_from(pct: f64) -> Result<Self, Self::Error> {
        Percentage::from_percent(pct).ok_or_else(|| format!("percentage must be within 0..=100, got {pct}"))
    }
}

impl From<Percentage> for f64 {
    fn from(pct: Percentage) -> f64 {
        pct.percent()
    }
}

/// Shows whole percentages without decimals: `10`, `12.5`, `0.25`.
impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{whole}")
        } else if frac % 10 == 0 {
            write!(f, "{whole}.{}", frac / 10)
        } else {
            write!(f, "{whole}.{frac:02}")
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
