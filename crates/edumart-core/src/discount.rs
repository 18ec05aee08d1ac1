//! # Discount Engine
//!
//! Voucher and referral instruments, their static registries, and the pure
//! stacking computation.
//!
//! ## Stacking Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Discount Accumulation Order                           │
//! │                                                                         │
//! │  1. VOUCHER (single active slot)                                        │
//! │     percentage  → discount += subtotal × percent/100                   │
//! │     fixed       → discount += min(amount, subtotal)   ← only cap       │
//! │     points      → points_to_earn += points  (no money discount)        │
//! │                                                                         │
//! │  2. REFERRAL (single active slot, independent of voucher)              │
//! │     discount       += subtotal × discount_percent/100                  │
//! │     points_to_earn += bonus_points                                     │
//! │                                                                         │
//! │  3. BASE ACCRUAL (always, independent of codes)                        │
//! │     points_to_earn += floor(subtotal × 10%)                            │
//! │                                                                         │
//! │  Voucher and referral discounts are ADDITIVE, not multiplicative,      │
//! │  and the aggregate is NOT capped at the subtotal. Only the fixed       │
//! │  voucher branch is individually capped. Downstream code may assume     │
//! │  non-negative, monotonically accumulated intermediates, so the order   │
//! │  above is load-bearing.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Always Recomputed
//! [`DiscountResult`] is derived, never stored. Whenever the cart, the
//! voucher, or the referral changes, callers rerun [`compute_discount`]
//! from scratch - there is no incremental update path for a stale discount
//! to survive a cart edit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Points};
use crate::validation::normalize_code;

// =============================================================================
// Voucher Instruments
// =============================================================================

/// What a voucher grants when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum VoucherBenefit {
    /// Percentage off the money subtotal (20 = 20%).
    Percentage { percent: u32 },

    /// Fixed money amount off, individually capped at the subtotal.
    Fixed { amount: Money },

    /// No money discount; bonus points earned instead.
    BonusPoints { points: Points },
}

/// A single active voucher.
///
/// At most one voucher is active at a time; applying a new one replaces
/// the old. `valid` is carried with the instrument so a voucher hydrated
/// from storage after a registry change computes as inert rather than
/// silently discounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VoucherCode {
    /// Normalized code string ("DISCOUNT20").
    pub code: String,

    /// What the voucher grants.
    pub benefit: VoucherBenefit,

    /// Validity flag checked by the discount computation.
    pub valid: bool,
}

impl VoucherCode {
    /// Creates a valid voucher instrument.
    pub fn new(code: impl Into<String>, benefit: VoucherBenefit) -> Self {
        VoucherCode {
            code: code.into(),
            benefit,
            valid: true,
        }
    }
}

// =============================================================================
// Referral Instruments
// =============================================================================

/// A referral code tied to a referring party.
///
/// The bare code string; its reward is looked up in the registry, never
/// stored on the instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReferralCode {
    pub code: String,
}

/// What a referral grants: a percentage discount plus bonus points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReferralReward {
    /// Percentage off the money subtotal (10 = 10%).
    pub discount_percent: u32,

    /// Bonus points added to the earn total.
    pub bonus_points: Points,
}

// =============================================================================
// Registries
// =============================================================================

/// Static table of valid voucher codes.
///
/// Configuration, not runtime-mutable within the engine: built once at
/// session start (builtin table or custom entries) and only read after.
#[derive(Debug, Clone)]
pub struct VoucherRegistry {
    entries: HashMap<String, VoucherBenefit>,
}

impl VoucherRegistry {
    /// The platform's builtin voucher table.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "DISCOUNT20".to_string(),
            VoucherBenefit::Percentage { percent: 20 },
        );
        entries.insert(
            "SAVE15".to_string(),
            VoucherBenefit::Fixed {
                amount: Money::from_cents(1500),
            },
        );
        entries.insert(
            "EXTRA100".to_string(),
            VoucherBenefit::BonusPoints {
                points: Points::new(100),
            },
        );
        VoucherRegistry { entries }
    }

    /// Builds a registry from custom entries (codes are normalized).
    pub fn from_entries<I, S>(entries: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, VoucherBenefit)>,
        S: AsRef<str>,
    {
        let mut table = HashMap::new();
        for (code, benefit) in entries {
            table.insert(normalize_code(code.as_ref())?, benefit);
        }
        Ok(VoucherRegistry { entries: table })
    }

    /// Resolves a user-entered code to a voucher instrument.
    ///
    /// Normalizes first, so `" discount20 "` resolves. Unknown codes are
    /// an error carrying the normalized form for the rejection message.
    pub fn resolve(&self, raw_code: &str) -> CoreResult<VoucherCode> {
        let code = normalize_code(raw_code)?;
        match self.entries.get(&code) {
            Some(benefit) => Ok(VoucherCode::new(code, *benefit)),
            None => Err(CoreError::UnknownVoucherCode(code)),
        }
    }
}

/// Static table of valid referral codes.
#[derive(Debug, Clone)]
pub struct ReferralRegistry {
    entries: HashMap<String, ReferralReward>,
}

impl ReferralRegistry {
    /// The platform's builtin referral table.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "FRIEND10".to_string(),
            ReferralReward {
                discount_percent: 10,
                bonus_points: Points::new(50),
            },
        );
        entries.insert(
            "STUDY5".to_string(),
            ReferralReward {
                discount_percent: 5,
                bonus_points: Points::new(25),
            },
        );
        ReferralRegistry { entries }
    }

    /// Builds a registry from custom entries (codes are normalized).
    pub fn from_entries<I, S>(entries: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, ReferralReward)>,
        S: AsRef<str>,
    {
        let mut table = HashMap::new();
        for (code, reward) in entries {
            table.insert(normalize_code(code.as_ref())?, reward);
        }
        Ok(ReferralRegistry { entries: table })
    }

    /// Resolves a user-entered code to a referral instrument.
    pub fn resolve(&self, raw_code: &str) -> CoreResult<ReferralCode> {
        let code = normalize_code(raw_code)?;
        if self.entries.contains_key(&code) {
            Ok(ReferralCode { code })
        } else {
            Err(CoreError::UnknownReferralCode(code))
        }
    }

    /// The reward for an already-resolved referral code.
    ///
    /// `None` if the code no longer resolves (registry changed since the
    /// code was persisted); the discount computation then treats the
    /// referral as absent.
    pub fn reward_for(&self, referral: &ReferralCode) -> Option<ReferralReward> {
        self.entries.get(&referral.code).copied()
    }
}

// =============================================================================
// Discount Computation
// =============================================================================

/// The derived result of the discount stacking computation.
///
/// Never persisted; always rederived from `(subtotal, voucher, referral)`
/// so it cannot drift out of sync with any of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountResult {
    /// Total money discount. May exceed the subtotal under stacked codes.
    pub discount_amount: Money,

    /// Total points the purchase will earn.
    pub points_to_earn: Points,
}

/// Computes the discount and points-to-earn for a cart subtotal.
///
/// Pure and deterministic: same inputs, same result. See the module docs
/// for the accumulation order; it must not be reordered.
pub fn compute_discount(
    subtotal: Money,
    voucher: Option<&VoucherCode>,
    referral: Option<&ReferralReward>,
) -> DiscountResult {
    let mut discount_amount = Money::zero();
    let mut points_to_earn = Points::zero();

    // 1. Voucher
    if let Some(voucher) = voucher {
        if voucher.valid {
            match voucher.benefit {
                VoucherBenefit::Percentage { percent } => {
                    discount_amount += subtotal.percentage(percent * 100);
                }
                VoucherBenefit::Fixed { amount } => {
                    // Individually capped: a fixed voucher can never discount
                    // more than the subtotal it applies to.
                    discount_amount += amount.min(subtotal);
                }
                VoucherBenefit::BonusPoints { points } => {
                    points_to_earn += points;
                }
            }
        }
    }

    // 2. Referral
    if let Some(reward) = referral {
        discount_amount += subtotal.percentage(reward.discount_percent * 100);
        points_to_earn += reward.bonus_points;
    }

    // 3. Base accrual, independent of codes: floor(subtotal × 10%)
    points_to_earn += subtotal.earn_base_points();

    DiscountResult {
        discount_amount,
        points_to_earn,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
