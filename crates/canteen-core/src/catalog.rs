//! # Catalog Lookup
//!
//! The pricing engine reads catalog data through [`CatalogLookup`]. The menu
//! service is fetched once per pricing pass and frozen into a
//! [`CatalogSnapshot`]; the engine never sees a partially loaded catalog.

use std::collections::{BTreeMap, HashMap};

use crate::money::Money;
use crate::types::{CartLine, CatalogEntry, ItemKey};

/// Maps an item to its catalog entry.
///
/// A missing entry means the item does not exist as far as pricing is
/// concerned: cart lines pointing at it are dropped from the output.
pub trait CatalogLookup {
    fn lookup(&self, item: &ItemKey) -> Option<&CatalogEntry>;
}

/// Immutable catalog snapshot keyed by [`ItemKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    entries: BTreeMap<ItemKey, CatalogEntry>,
}

impl CatalogSnapshot {
    /// Builds a snapshot; a later entry for the same key replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        CatalogSnapshot {
            entries: entries.into_iter().map(|entry| (entry.item, entry)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

impl CatalogLookup for CatalogSnapshot {
    fn lookup(&self, item: &ItemKey) -> Option<&CatalogEntry> {
        self.entries.get(item)
    }
}

impl CatalogLookup for HashMap<ItemKey, CatalogEntry> {
    fn lookup(&self, item: &ItemKey) -> Option<&CatalogEntry> {
        self.get(item)
    }
}

impl CatalogLookup for BTreeMap<ItemKey, CatalogEntry> {
    fn lookup(&self, item: &ItemKey) -> Option<&CatalogEntry> {
        self.get(item)
    }
}

/// Undiscounted cart value: `Σ unit_price × quantity` over known items.
///
/// Used by callers deciding which THRESHOLD promotions are applicable.
pub fn gross_subtotal(lines: &[CartLine], catalog: &impl CatalogLookup) -> Money {
    lines
        .iter()
        .filter_map(|line| {
            catalog
                .lookup(&line.item)
                .map(|entry| entry.unit_price.multiply_quantity(line.quantity))
        })
        .sum()
}
