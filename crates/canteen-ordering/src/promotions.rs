//! # Promotion Scheduling
//!
//! Decides which promotions the pricing engine sees. The engine applies
//! whatever it is given, so day-of-week schedules, disabled rules and the
//! THRESHOLD policy are all resolved here, before pricing.
//!
//! ## Filtering Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  [ScheduledPromotion] ──► active_rules(weekday)                         │
//! │                            • enabled                                    │
//! │                            • days empty, or contains weekday            │
//! │                            • passes validate_promotion (else warn!)     │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                        apply_threshold_policy(policy, gross subtotal)   │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                        [PromotionRule] in original order ──► price_cart │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use canteen_core::validation::validate_promotion;
use canteen_core::{Money, PromotionRule};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::OrderingError;

// =============================================================================
// Scheduled Promotion
// =============================================================================

/// A promotion as stored by the menu service.
///
/// ```json
/// {
///   "name": "Coffee 3x2",
///   "enabled": true,
///   "days": ["Mon", "Tue"],
///   "rule": { "type": "BUY_X_PAY_Y", "buyQuantity": 3, "payQuantity": 2, "appliesTo": [...] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPromotion {
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Weekdays the promotion runs on. Empty means every day.
    #[serde(default)]
    pub days: Vec<Weekday>,

    pub rule: PromotionRule,
}

fn default_enabled() -> bool {
    true
}

impl ScheduledPromotion {
    /// An enabled promotion running every day.
    pub fn always(name: impl Into<String>, rule: PromotionRule) -> Self {
        ScheduledPromotion {
            name: name.into(),
            enabled: true,
            days: Vec::new(),
            rule,
        }
    }

    pub fn on_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.days = days.into_iter().collect();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn runs_on(&self, weekday: Weekday) -> bool {
        self.days.is_empty() || self.days.contains(&weekday)
    }
}

/// Rules active on `weekday`, in their stored order.
///
/// Rules that fail validation are dropped with a warning.
pub fn active_rules(promotions: &[ScheduledPromotion], weekday: Weekday) -> Vec<PromotionRule> {
    promotions
        .iter()
        .filter(|promo| promo.enabled && promo.runs_on(weekday))
        .filter(|promo| match validate_promotion(&promo.rule) {
            Ok(()) => true,
            Err(e) => {
                warn!(promotion = %promo.name, error = %e, "Skipping invalid promotion");
                false
            }
        })
        .map(|promo| promo.rule.clone())
        .collect()
}

// =============================================================================
// Threshold Policy
// =============================================================================

/// How THRESHOLD promotions are filtered before pricing.
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  UNCONDITIONAL (Default)           │  GROSS_SUBTOTAL                    │
/// │  ───────────────────────           │  ──────────────                    │
/// │  Every active THRESHOLD rule is    │  A THRESHOLD rule is kept only if  │
/// │  passed to the engine, which       │  the undiscounted cart value is at │
/// │  subtracts its discount.           │  least its `threshold`.            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    #[default]
    Unconditional,
    GrossSubtotal,
}

impl std::fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdPolicy::Unconditional => write!(f, "unconditional"),
            ThresholdPolicy::GrossSubtotal => write!(f, "gross_subtotal"),
        }
    }
}

impl std::str::FromStr for ThresholdPolicy {
    type Err = OrderingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unconditional" | "always" => Ok(ThresholdPolicy::Unconditional),
            "gross_subtotal" | "gross-subtotal" | "subtotal" => Ok(ThresholdPolicy::GrossSubtotal),
            other => Err(OrderingError::InvalidConfig(format!(
                "Unknown threshold policy: '{}'. Valid options: unconditional, gross_subtotal",
                other
            ))),
        }
    }
}

/// Drops THRESHOLD rules the policy rules out. Other kinds pass untouched.
pub fn apply_threshold_policy(
    rules: Vec<PromotionRule>,
    policy: ThresholdPolicy,
    gross_subtotal: Money,
) -> Vec<PromotionRule> {
    match policy {
        ThresholdPolicy::Unconditional => rules,
        ThresholdPolicy::GrossSubtotal => rules
            .into_iter()
            .filter(|rule| match rule {
                PromotionRule::Threshold(t) => {
                    let reached = gross_subtotal >= t.threshold;
                    if !reached {
                        debug!(threshold = %t.threshold, subtotal = %gross_subtotal, "Threshold not reached");
                    }
                    reached
                }
                PromotionRule::BuyXPayY(_) | PromotionRule::Percentage(_) | PromotionRule::BuyGiveFree(_) => true,
            })
            .collect(),
    }
}
