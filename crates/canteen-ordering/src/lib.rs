//! # canteen-ordering: Ordering Layer for Canteen Ordering
//!
//! Wraps the pure pricing engine in `canteen-core` with what a running
//! ordering backend needs: configuration, a cart per authenticated user,
//! promotion scheduling and the checkout flow.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                OrderingService<MenuSource, OrderService>         │  │
//! │  │   add_item / update_item / remove_item / quote / checkout        │  │
//! │  └───────────┬───────────────────────┬───────────────────┬──────────┘  │
//! │              ▼                       ▼                   ▼             │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌─────────────────┐  │
//! │  │ CartBook           │  │ promotions         │  │ canteen-core    │  │
//! │  │ identity → Cart    │  │ weekday schedule,  │  │ price_cart,     │  │
//! │  │ Arc<Mutex<..>>     │  │ threshold policy   │  │ project, payload│  │
//! │  └────────────────────┘  └────────────────────┘  └─────────────────┘  │
//! │                                                                         │
//! │  OrderingConfig (ordering.toml + CANTEEN_* env) feeds limits & policy  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Configuration (threshold policy, cart limits, log filter)
//! - [`cart_book`] - Per-identity carts and their stored format
//! - [`promotions`] - Weekday schedules and the threshold policy
//! - [`service`] - `OrderingService` and its collaborator traits
//! - [`error`] - Ordering error types

pub mod cart_book;
pub mod config;
pub mod error;
pub mod promotions;
pub mod service;

pub use cart_book::{CartBook, StoredCartEntry};
pub use config::OrderingConfig;
pub use error::{OrderingError, OrderingResult};
pub use promotions::{active_rules, ScheduledPromotion, ThresholdPolicy};
pub use service::{MenuSource, OrderReceipt, OrderService, OrderingService, Quote};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=canteen_core=trace` - Show dropped catalog lines and stage detail
/// - Default: `default_filter`, usually `OrderingConfig::log.filter`
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
