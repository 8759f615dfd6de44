//! # Error Types
//!
//! Domain-specific error types for canteen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  canteen-core errors (this file)                                       │
//! │  ├── CoreError        - Cart and checkout rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  canteen-ordering errors (separate crate)                              │
//! │  └── OrderingError    - Config, collaborator and checkout failures     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → OrderingError → caller            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing stages themselves never fail. Errors only come from cart
//! editing, promotion validation and the checkout availability precondition.

use thiserror::Error;

use crate::types::ItemKey;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item in the cart is flagged unavailable by the catalog.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout pressed
    ///      │
    ///      ▼
    /// ensure_available(cart, catalog)
    ///      │
    ///      ▼
    /// InsufficientStock { item: PRODUCT#7, name: "Empanada" }
    ///      │
    ///      ▼
    /// UI blocks submission: "Insufficient stock for Empanada"
    /// ```
    #[error("Insufficient stock for {name} ({item})")]
    InsufficientStock { item: ItemKey, name: String },

    /// Item is not present in the cart.
    #[error("Item {0} not in cart")]
    ItemNotInCart(ItemKey),

    /// Cart has reached the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// A promotion rule is structurally invalid.
    #[error("Invalid {kind} promotion: {reason}")]
    InvalidPromotion { kind: &'static str, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same item listed twice).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
