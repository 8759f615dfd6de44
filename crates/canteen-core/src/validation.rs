//! # Validation Module
//!
//! Input validation for carts and promotion rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Known rule kinds only ("type" tag)                                │
//! │  ├── buyQuantity >= 1 (NonZeroU32)                                     │
//! │  └── percentage within 0..=100                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Item scopes not empty, no duplicates                              │
//! │  ├── BUY_GIVE_FREE lists free items                                    │
//! │  └── THRESHOLD amounts not negative                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing engine                                               │
//! │  └── Assumes structurally valid input, never fails                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use canteen_core::validation::validate_quantity;
//!
//! assert!(validate_quantity(5, 999).is_ok());
//! assert!(validate_quantity(0, 999).is_err());
//! ```

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::promotion::PromotionRule;
use crate::types::ItemKey;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `max`
pub fn validate_quantity(qty: u32, max: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > max {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: max as i64,
        });
    }

    Ok(())
}

/// Validates a money amount that must not be negative (prices, discounts).
///
/// ```rust
/// use canteen_core::money::Money;
/// use canteen_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("unit_price", Money::from_cents(0)).is_ok());
/// assert!(validate_non_negative("unit_price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that an item list is non-empty and has no repeated keys.
pub fn validate_item_scope(field: &str, items: &[ItemKey]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(*item) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: item.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Promotion Validators
// =============================================================================

/// Validates the shape of a promotion rule.
///
/// ## Rules
/// - Item-scoped kinds list at least one item, without duplicates
/// - BUY_X_PAY_Y accepts any `pay`, including `pay > buy`
/// - BUY_GIVE_FREE lists at least one free item
/// - THRESHOLD amounts are non-negative
pub fn validate_promotion(rule: &PromotionRule) -> CoreResult<()> {
    let invalid = |reason: String| CoreError::InvalidPromotion {
        kind: rule.kind(),
        reason,
    };

    match rule {
        PromotionRule::BuyXPayY(r) => {
            validate_item_scope("appliesTo", &r.applies_to).map_err(|e| invalid(e.to_string()))?;
        }
        PromotionRule::Percentage(r) => {
            validate_item_scope("appliesTo", &r.applies_to).map_err(|e| invalid(e.to_string()))?;
        }
        PromotionRule::Threshold(r) => {
            validate_non_negative("threshold", r.threshold).map_err(|e| invalid(e.to_string()))?;
            validate_non_negative("discountAmount", r.discount_amount)
                .map_err(|e| invalid(e.to_string()))?;
        }
        PromotionRule::BuyGiveFree(r) => {
            validate_item_scope("appliesTo", &r.applies_to).map_err(|e| invalid(e.to_string()))?;
            validate_item_scope("freeItems", &r.free_items).map_err(|e| invalid(e.to_string()))?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
