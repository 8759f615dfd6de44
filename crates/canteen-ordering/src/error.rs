//! # Ordering Error Types
//!
//! Error types for the ordering layer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Ordering Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Domain         │  │  Configuration  │  │  Collaborators          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core(..)       │  │  InvalidConfig  │  │  CatalogUnavailable     │ │
//! │  │  EmptyCart      │  │  ConfigLoad..   │  │  OrderRejected          │ │
//! │  │                 │  │  ConfigSave..   │  │  Serialization          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Every variant maps to a stable code() for the frontend.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use canteen_core::CoreError;
use thiserror::Error;

/// Result type alias for ordering operations.
pub type OrderingResult<T> = Result<T, OrderingError>;

#[derive(Debug, Error)]
pub enum OrderingError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Cart editing or checkout precondition failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Checkout was requested for an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid ordering configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    /// The menu service could not provide the catalog or promotions.
    #[error("Menu unavailable: {0}")]
    CatalogUnavailable(String),

    /// The order service refused the submission.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Stored cart data could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for OrderingError {
    fn from(err: std::io::Error) -> Self {
        OrderingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for OrderingError {
    fn from(err: toml::de::Error) -> Self {
        OrderingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for OrderingError {
    fn from(err: toml::ser::Error) -> Self {
        OrderingError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for OrderingError {
    fn from(err: serde_json::Error) -> Self {
        OrderingError::Serialization(err.to_string())
    }
}

// =============================================================================
// Error Codes
// =============================================================================

impl OrderingError {
    /// Machine-readable code for the frontend.
    pub fn code(&self) -> &'static str {
        match self {
            OrderingError::Core(err) => match err {
                CoreError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
                CoreError::ItemNotInCart(_) => "NOT_FOUND",
                CoreError::CartTooLarge { .. } | CoreError::QuantityTooLarge { .. } => "CART_ERROR",
                CoreError::InvalidPromotion { .. } | CoreError::Validation(_) => "VALIDATION_ERROR",
            },
            OrderingError::EmptyCart => "CART_ERROR",
            OrderingError::InvalidConfig(_)
            | OrderingError::ConfigLoadFailed(_)
            | OrderingError::ConfigSaveFailed(_) => "CONFIG_ERROR",
            OrderingError::CatalogUnavailable(_) => "MENU_UNAVAILABLE",
            OrderingError::OrderRejected(_) => "ORDER_REJECTED",
            OrderingError::Serialization(_) => "INTERNAL",
        }
    }

    /// Returns true if retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderingError::CatalogUnavailable(_))
    }
}
