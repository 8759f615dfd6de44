//! # Ordering Service
//!
//! Cart editing, quoting and checkout for authenticated users.
//!
//! ## Checkout Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  checkout(identity, weekday)                                            │
//! │     │                                                                   │
//! │     ├─► snapshot cart (lock released)                                   │
//! │     ├─► MenuSource: catalog + promotions (both fully fetched)           │
//! │     ├─► active_rules ─► threshold policy ─► price_cart                  │
//! │     ├─► ensure_available ──────────────────► InsufficientStock? stop    │
//! │     ├─► build_order_payload(cart, remaining gifts)                      │
//! │     ├─► OrderService::create_order ────────► rejected? cart kept        │
//! │     └─► clear cart                                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;

use canteen_core::catalog::gross_subtotal;
use canteen_core::checkout::{build_order_payload, ensure_available, project, DisplayModel, OrderDetail};
use canteen_core::{price_cart, CartLine, CatalogSnapshot, ItemKey, Money, PricingResult};
use chrono::Weekday;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cart_book::CartBook;
use crate::config::OrderingConfig;
use crate::error::{OrderingError, OrderingResult};
use crate::promotions::{active_rules, apply_threshold_policy, ScheduledPromotion, ThresholdPolicy};

// =============================================================================
// Collaborators
// =============================================================================

/// Read side of the menu service.
pub trait MenuSource: Send + Sync {
    fn fetch_catalog(&self) -> impl Future<Output = OrderingResult<CatalogSnapshot>> + Send;

    fn fetch_promotions(&self) -> impl Future<Output = OrderingResult<Vec<ScheduledPromotion>>> + Send;
}

/// Write side of the order service.
pub trait OrderService: Send + Sync {
    /// Submits an order and returns its id.
    fn create_order(
        &self,
        identity: &str,
        details: Vec<OrderDetail>,
    ) -> impl Future<Output = OrderingResult<String>> + Send;
}

// =============================================================================
// Responses
// =============================================================================

/// Priced cart plus the screen model built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub result: PricingResult,
    pub display: DisplayModel,
}

/// A submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    pub details: Vec<OrderDetail>,
    /// Total shown to the customer at submission. The order service prices
    /// the order again on its side.
    pub quoted_total: Money,
}

// =============================================================================
// Service
// =============================================================================

pub struct OrderingService<M, O> {
    menu: M,
    orders: O,
    carts: CartBook,
    threshold_policy: ThresholdPolicy,
}

impl<M: MenuSource, O: OrderService> OrderingService<M, O> {
    pub fn new(menu: M, orders: O, config: &OrderingConfig) -> Self {
        OrderingService {
            menu,
            orders,
            carts: CartBook::new(config.cart_limits()),
            threshold_policy: config.threshold_policy(),
        }
    }

    /// Uses an existing cart book, e.g. one restored from storage.
    pub fn with_cart_book(mut self, carts: CartBook) -> Self {
        self.carts = carts;
        self
    }

    pub fn carts(&self) -> &CartBook {
        &self.carts
    }

    // =========================================================================
    // Cart Editing
    // =========================================================================

    /// Adds units of an item and returns the updated cart lines.
    pub fn add_item(&self, identity: &str, item: ItemKey, quantity: u32) -> OrderingResult<Vec<CartLine>> {
        self.carts.with_cart_mut(identity, |cart| cart.add_item(item, quantity))?;
        debug!(identity, item_id = item.id, kind = %item.kind, quantity, "Item added to cart");
        Ok(self.carts.snapshot(identity))
    }

    /// Sets an item's quantity; zero removes it.
    pub fn update_item(&self, identity: &str, item: ItemKey, quantity: u32) -> OrderingResult<Vec<CartLine>> {
        self.carts
            .with_cart_mut(identity, |cart| cart.update_quantity(item, quantity))?;
        debug!(identity, item_id = item.id, kind = %item.kind, quantity, "Cart item updated");
        Ok(self.carts.snapshot(identity))
    }

    pub fn remove_item(&self, identity: &str, item: ItemKey) -> OrderingResult<Vec<CartLine>> {
        self.carts.with_cart_mut(identity, |cart| cart.remove_item(item))?;
        debug!(identity, item_id = item.id, kind = %item.kind, "Item removed from cart");
        Ok(self.carts.snapshot(identity))
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Prices the identity's current cart.
    pub async fn quote(&self, identity: &str, weekday: Weekday) -> OrderingResult<Quote> {
        let lines = self.carts.snapshot(identity);
        let (catalog, result) = self.price(&lines, weekday).await?;
        let display = project(&result, &catalog);

        let gift_count = display.gifts.len();
        debug!(identity, total = %result.total_price, gifts = gift_count, "Cart quoted");
        Ok(Quote { result, display })
    }

    /// Submits the identity's cart as an order and clears it.
    ///
    /// The cart is left untouched when any step fails. If the cart changed
    /// while the order was being submitted, the newer cart is kept.
    pub async fn checkout(&self, identity: &str, weekday: Weekday) -> OrderingResult<OrderReceipt> {
        let lines = self.carts.snapshot(identity);
        if lines.is_empty() {
            return Err(OrderingError::EmptyCart);
        }

        let (catalog, result) = self.price(&lines, weekday).await?;
        ensure_available(&lines, &catalog)?;

        let details = build_order_payload(&lines, &result.uncompensated_gifts);
        let order_id = self.orders.create_order(identity, details.clone()).await?;

        let cleared = self.carts.with_cart_mut(identity, |cart| {
            if cart.lines() == lines.as_slice() {
                cart.clear();
                true
            } else {
                false
            }
        });
        if !cleared {
            warn!(identity, order_id = %order_id, "Cart changed during checkout, keeping newer cart");
        }

        info!(
            identity,
            order_id = %order_id,
            lines = details.len(),
            total = %result.total_price,
            "Order placed"
        );

        Ok(OrderReceipt {
            order_id,
            details,
            quoted_total: result.total_price,
        })
    }

    async fn price(&self, lines: &[CartLine], weekday: Weekday) -> OrderingResult<(CatalogSnapshot, PricingResult)> {
        let catalog = self.menu.fetch_catalog().await?;
        let promotions = self.menu.fetch_promotions().await?;

        let rules = apply_threshold_policy(
            active_rules(&promotions, weekday),
            self.threshold_policy,
            gross_subtotal(lines, &catalog),
        );
        let result = price_cart(lines, &catalog, &rules);
        Ok((catalog, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canteen_core::checkout::BadgeKind;
    use canteen_core::promotion::{BuyGiveFree, BuyXPayY, PromotionRule, Threshold};
    use canteen_core::{CatalogEntry, CoreError, GiftEntry};
    use std::num::NonZeroU32;
    use std::sync::{Arc, Mutex};

    const COFFEE: ItemKey = ItemKey::product(1);
    const JUICE: ItemKey = ItemKey::product(2);
    const BREAKFAST: ItemKey = ItemKey::combo(1);

    // =========================================================================
    // Fakes
    // =========================================================================

    struct FakeMenu {
        catalog: CatalogSnapshot,
        promotions: Vec<ScheduledPromotion>,
        offline: bool,
    }

    impl MenuSource for FakeMenu {
        async fn fetch_catalog(&self) -> OrderingResult<CatalogSnapshot> {
            if self.offline {
                return Err(OrderingError::CatalogUnavailable("menu service offline".into()));
            }
            Ok(self.catalog.clone())
        }

        async fn fetch_promotions(&self) -> OrderingResult<Vec<ScheduledPromotion>> {
            Ok(self.promotions.clone())
        }
    }

    #[derive(Clone, Default)]
    struct FakeOrders {
        submitted: Arc<Mutex<Vec<(String, Vec<OrderDetail>)>>>,
        reject: bool,
    }

    impl OrderService for FakeOrders {
        async fn create_order(&self, identity: &str, details: Vec<OrderDetail>) -> OrderingResult<String> {
            if self.reject {
                return Err(OrderingError::OrderRejected("kitchen closed".into()));
            }
            let mut submitted = self.submitted.lock().unwrap();
            submitted.push((identity.to_string(), details));
            Ok(format!("order-{}", submitted.len()))
        }
    }

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::from_entries([
            CatalogEntry::new(COFFEE, "Coffee", Money::from_cents(1000)),
            CatalogEntry::new(JUICE, "Orange juice", Money::from_cents(300)),
            CatalogEntry::new(BREAKFAST, "Breakfast combo", Money::from_cents(1500)),
        ])
    }

    fn promotions() -> Vec<ScheduledPromotion> {
        vec![
            ScheduledPromotion::always(
                "breakfast juice",
                PromotionRule::BuyGiveFree(BuyGiveFree {
                    applies_to: vec![BREAKFAST],
                    free_items: vec![JUICE],
                    one_free_per_trigger_unit: true,
                }),
            ),
            ScheduledPromotion::always(
                "monday coffee",
                PromotionRule::BuyXPayY(BuyXPayY {
                    buy_quantity: NonZeroU32::new(3).unwrap(),
                    pay_quantity: 2,
                    applies_to: vec![COFFEE],
                }),
            )
            .on_days([Weekday::Mon]),
            ScheduledPromotion::always(
                "big order",
                PromotionRule::Threshold(Threshold {
                    threshold: Money::from_cents(10_000),
                    discount_amount: Money::from_cents(500),
                }),
            ),
        ]
    }

    fn service(config: &OrderingConfig) -> (OrderingService<FakeMenu, FakeOrders>, FakeOrders) {
        let orders = FakeOrders::default();
        let menu = FakeMenu {
            catalog: catalog(),
            promotions: promotions(),
            offline: false,
        };
        (OrderingService::new(menu, orders.clone(), config), orders)
    }

    // =========================================================================
    // Tests
    // =========================================================================

    #[test]
    fn test_cart_editing() {
        let (svc, _) = service(&OrderingConfig::default());

        svc.add_item("ana", COFFEE, 2).unwrap();
        let lines = svc.add_item("ana", COFFEE, 1).unwrap();
        assert_eq!(lines, vec![CartLine::new(COFFEE, 3)]);

        let lines = svc.update_item("ana", COFFEE, 5).unwrap();
        assert_eq!(lines, vec![CartLine::new(COFFEE, 5)]);

        assert!(svc.remove_item("ana", COFFEE).unwrap().is_empty());

        let err = svc.remove_item("ana", COFFEE).unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_quote_applies_day_schedule() {
        let (svc, _) = service(&OrderingConfig::default());
        svc.add_item("ana", COFFEE, 3).unwrap();

        // 3 × 1000 with 3x2, minus unconditional threshold 500
        let monday = svc.quote("ana", Weekday::Mon).await.unwrap();
        assert_eq!(monday.result.total_price, Money::from_cents(1500));
        assert!(monday.display.lines[0].strikethrough);

        let tuesday = svc.quote("ana", Weekday::Tue).await.unwrap();
        assert_eq!(tuesday.result.total_price, Money::from_cents(2500));
        assert!(!tuesday.display.lines[0].strikethrough);
    }

    #[tokio::test]
    async fn test_gross_subtotal_policy_skips_unreached_threshold() {
        let mut config = OrderingConfig::default();
        config.pricing.threshold_policy = ThresholdPolicy::GrossSubtotal;
        let (svc, _) = service(&config);

        svc.add_item("ana", COFFEE, 3).unwrap();
        let quote = svc.quote("ana", Weekday::Tue).await.unwrap();
        assert_eq!(quote.result.total_price, Money::from_cents(3000));

        svc.update_item("ana", COFFEE, 10).unwrap();
        let quote = svc.quote("ana", Weekday::Tue).await.unwrap();
        assert_eq!(quote.result.total_price, Money::from_cents(9500));
    }

    #[tokio::test]
    async fn test_quote_shows_gift_badges() {
        let (svc, _) = service(&OrderingConfig::default());
        svc.add_item("ana", BREAKFAST, 2).unwrap();
        svc.add_item("ana", JUICE, 1).unwrap();

        let quote = svc.quote("ana", Weekday::Wed).await.unwrap();
        assert_eq!(quote.result.compensated_gifts, vec![GiftEntry::new(JUICE, 1)]);
        assert_eq!(quote.result.uncompensated_gifts, vec![GiftEntry::new(JUICE, 1)]);

        let badges: Vec<BadgeKind> = quote.display.gifts.iter().map(|g| g.badge).collect();
        assert_eq!(badges, vec![BadgeKind::Compensated, BadgeKind::Free]);
    }

    #[tokio::test]
    async fn test_checkout_submits_and_clears() {
        let (svc, orders) = service(&OrderingConfig::default());
        svc.add_item("ana", BREAKFAST, 2).unwrap();
        svc.add_item("ana", COFFEE, 3).unwrap();

        let receipt = svc.checkout("ana", Weekday::Mon).await.unwrap();

        assert_eq!(receipt.order_id, "order-1");
        assert_eq!(
            receipt.details,
            vec![
                OrderDetail::new(BREAKFAST, 2),
                OrderDetail::new(COFFEE, 3),
                OrderDetail::new(JUICE, 2),
            ]
        );
        // 2 × 1500 + 2 × 1000 - 500
        assert_eq!(receipt.quoted_total, Money::from_cents(4500));
        assert!(svc.carts().snapshot("ana").is_empty());

        let submitted = orders.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].0, "ana");
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let (svc, orders) = service(&OrderingConfig::default());
        let err = svc.checkout("ana", Weekday::Mon).await.unwrap_err();
        assert!(matches!(err, OrderingError::EmptyCart));
        assert!(orders.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_blocked_by_unavailable_item() {
        let menu = FakeMenu {
            catalog: CatalogSnapshot::from_entries([
                CatalogEntry::new(COFFEE, "Coffee", Money::from_cents(1000)).unavailable(),
            ]),
            promotions: vec![],
            offline: false,
        };
        let orders = FakeOrders::default();
        let svc = OrderingService::new(menu, orders.clone(), &OrderingConfig::default());
        svc.add_item("ana", COFFEE, 1).unwrap();

        let err = svc.checkout("ana", Weekday::Mon).await.unwrap_err();
        assert!(matches!(err, OrderingError::Core(CoreError::InsufficientStock { .. })));
        assert_eq!(err.code(), "INSUFFICIENT_STOCK");
        assert!(orders.submitted.lock().unwrap().is_empty());
        assert_eq!(svc.carts().snapshot("ana"), vec![CartLine::new(COFFEE, 1)]);
    }

    #[tokio::test]
    async fn test_rejected_order_keeps_cart() {
        let menu = FakeMenu {
            catalog: catalog(),
            promotions: vec![],
            offline: false,
        };
        let orders = FakeOrders {
            reject: true,
            ..Default::default()
        };
        let svc = OrderingService::new(menu, orders, &OrderingConfig::default());
        svc.add_item("ana", COFFEE, 1).unwrap();

        let err = svc.checkout("ana", Weekday::Mon).await.unwrap_err();
        assert_eq!(err.code(), "ORDER_REJECTED");
        assert_eq!(svc.carts().snapshot("ana"), vec![CartLine::new(COFFEE, 1)]);
    }

    #[tokio::test]
    async fn test_menu_outage_is_retryable() {
        let menu = FakeMenu {
            catalog: catalog(),
            promotions: vec![],
            offline: true,
        };
        let svc = OrderingService::new(menu, FakeOrders::default(), &OrderingConfig::default());
        svc.add_item("ana", COFFEE, 1).unwrap();

        let err = svc.quote("ana", Weekday::Mon).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
