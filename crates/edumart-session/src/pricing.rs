//! # Pricing Summary
//!
//! The derived numbers the cart page renders: subtotals, discount, points
//! to earn, and the total due.
//!
//! Recomputed from scratch on every read - cart contents, voucher, and
//! referral are re-read and pushed through [`compute_discount`] each time,
//! so a stale discount can never survive a cart edit.

use serde::{Deserialize, Serialize};

use edumart_core::{compute_discount, Money, Points};

use crate::cart_store::CartStore;
use crate::codes::CodeStore;

/// Everything the cart page needs to render the totals box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSummary {
    /// Sum of money prices over the cart.
    pub subtotal: Money,

    /// Sum of points prices over the cart.
    pub points_subtotal: Points,

    /// Total money discount from the active codes.
    pub discount_amount: Money,

    /// Points this purchase would earn (base accrual + code bonuses).
    pub points_to_earn: Points,

    /// `subtotal - discount_amount`, deliberately unclamped.
    ///
    /// Stacked percentage codes may push this negative; the discount
    /// aggregate is not capped at the subtotal, and what to show for a
    /// negative total is a presentation decision.
    pub total_due: Money,
}

impl PricingSummary {
    /// Derives the current summary from the cart and code stores.
    pub async fn derive(cart: &CartStore, codes: &CodeStore) -> Self {
        let totals = cart.totals().await;
        let voucher = codes.active_voucher().await;
        let referral = codes.active_referral_reward().await;

        let result = compute_discount(totals.total_price, voucher.as_ref(), referral.as_ref());

        PricingSummary {
            subtotal: totals.total_price,
            points_subtotal: totals.total_points_price,
            discount_amount: result.discount_amount,
            points_to_earn: result.points_to_earn,
            total_due: totals.total_price - result.discount_amount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
