//! # Code Store
//!
//! The session's discount-code state: one voucher slot and one referral
//! slot, each independently applied, replaced, and removed.
//!
//! ## Slot Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Single-Slot Replace/Clear                            │
//! │                                                                         │
//! │  apply_voucher("discount20")                                            │
//! │       │                                                                 │
//! │       ├── normalize ──► registry lookup                                │
//! │       │                     │                                           │
//! │       │        unknown ─────┴──► failure notification, NO state change │
//! │       │                                                                 │
//! │       └── valid ──► REPLACES any existing voucher ──► persist ──►      │
//! │                     success notification                                │
//! │                                                                         │
//! │  The referral slot is fully independent: applying a voucher never      │
//! │  touches the referral and vice versa.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use edumart_core::{
    ReferralCode, ReferralRegistry, ReferralReward, VoucherCode, VoucherRegistry,
};
use edumart_store::SessionCodec;

use crate::error::SessionError;
use crate::notify::{Notification, NotificationSink};

/// The session's voucher and referral state.
pub struct CodeStore {
    voucher: Mutex<Option<VoucherCode>>,
    referral: Mutex<Option<ReferralCode>>,
    vouchers: VoucherRegistry,
    referrals: ReferralRegistry,
    codec: SessionCodec,
    sink: Arc<dyn NotificationSink>,
}

impl CodeStore {
    /// Hydrates the store from durable storage with the builtin registries.
    pub async fn hydrate(codec: SessionCodec, sink: Arc<dyn NotificationSink>) -> Self {
        Self::hydrate_with_registries(
            codec,
            sink,
            VoucherRegistry::builtin(),
            ReferralRegistry::builtin(),
        )
        .await
    }

    /// Hydrates the store with custom registries.
    ///
    /// A persisted voucher whose code no longer resolves (the registry
    /// changed since it was applied) is kept but marked invalid, so it
    /// computes as inert instead of silently discounting.
    pub async fn hydrate_with_registries(
        codec: SessionCodec,
        sink: Arc<dyn NotificationSink>,
        vouchers: VoucherRegistry,
        referrals: ReferralRegistry,
    ) -> Self {
        let voucher = codec.load_voucher().await.map(|mut v| {
            let still_known = vouchers.resolve(&v.code).is_ok();
            if v.valid && !still_known {
                warn!(code = %v.code, "Persisted voucher no longer in registry, marking invalid");
                v.valid = false;
            }
            v
        });
        let referral = codec.load_referral().await;

        if voucher.is_some() || referral.is_some() {
            info!("Discount codes restored from storage");
        }

        CodeStore {
            voucher: Mutex::new(voucher),
            referral: Mutex::new(referral),
            vouchers,
            referrals,
            codec,
            sink,
        }
    }

    // -------------------------------------------------------------------------
    // Voucher Slot
    // -------------------------------------------------------------------------

    /// Applies a voucher code, replacing any existing voucher.
    ///
    /// Unknown codes are rejected with a failure notification and no
    /// state change.
    pub async fn apply_voucher(&self, raw_code: &str) -> Result<VoucherCode, SessionError> {
        debug!(code = %raw_code, "apply_voucher");

        let voucher = match self.vouchers.resolve(raw_code) {
            Ok(voucher) => voucher,
            Err(err) => {
                self.sink.publish(Notification::error(
                    "Invalid voucher code",
                    "That voucher code is not recognized.",
                ));
                return Err(err.into());
            }
        };

        {
            let mut slot = self.voucher.lock().await;
            *slot = Some(voucher.clone());
            if let Err(err) = self.codec.save_voucher(&voucher).await {
                warn!(error = %err, "Failed to persist voucher");
            }
        }

        info!(code = %voucher.code, "Voucher applied");
        self.sink.publish(Notification::success(
            "Voucher applied",
            format!("Code {} is active on your cart.", voucher.code),
        ));

        Ok(voucher)
    }

    /// Clears the voucher slot.
    ///
    /// Removing when no voucher is active is a no-op.
    pub async fn remove_voucher(&self) {
        let mut slot = self.voucher.lock().await;
        if slot.take().is_none() {
            return;
        }
        if let Err(err) = self.codec.clear_voucher().await {
            warn!(error = %err, "Failed to clear persisted voucher");
        }
        drop(slot);

        self.sink.publish(Notification::info(
            "Voucher removed",
            "The voucher was removed from your cart.",
        ));
    }

    /// The currently active voucher, if any.
    pub async fn active_voucher(&self) -> Option<VoucherCode> {
        self.voucher.lock().await.clone()
    }

    // -------------------------------------------------------------------------
    // Referral Slot
    // -------------------------------------------------------------------------

    /// Applies a referral code, replacing any existing referral.
    pub async fn apply_referral(&self, raw_code: &str) -> Result<ReferralCode, SessionError> {
        debug!(code = %raw_code, "apply_referral");

        let referral = match self.referrals.resolve(raw_code) {
            Ok(referral) => referral,
            Err(err) => {
                self.sink.publish(Notification::error(
                    "Invalid referral code",
                    "That referral code is not recognized.",
                ));
                return Err(err.into());
            }
        };

        {
            let mut slot = self.referral.lock().await;
            *slot = Some(referral.clone());
            if let Err(err) = self.codec.save_referral(&referral).await {
                warn!(error = %err, "Failed to persist referral code");
            }
        }

        info!(code = %referral.code, "Referral code applied");
        self.sink.publish(Notification::success(
            "Referral applied",
            format!("Referral code {} is active on your cart.", referral.code),
        ));

        Ok(referral)
    }

    /// Clears the referral slot.
    pub async fn remove_referral(&self) {
        let mut slot = self.referral.lock().await;
        if slot.take().is_none() {
            return;
        }
        if let Err(err) = self.codec.clear_referral().await {
            warn!(error = %err, "Failed to clear persisted referral code");
        }
        drop(slot);

        self.sink.publish(Notification::info(
            "Referral removed",
            "The referral code was removed from your cart.",
        ));
    }

    /// The currently active referral code, if any.
    pub async fn active_referral(&self) -> Option<ReferralCode> {
        self.referral.lock().await.clone()
    }

    /// The reward of the active referral, resolved against the registry.
    ///
    /// `None` when no referral is active or the code no longer resolves.
    pub async fn active_referral_reward(&self) -> Option<ReferralReward> {
        let slot = self.referral.lock().await;
        slot.as_ref().and_then(|r| self.referrals.reward_for(r))
    }

    // -------------------------------------------------------------------------
    // Settlement
    // -------------------------------------------------------------------------

    /// Clears both slots without notifying or persisting.
    ///
    /// Used by checkout settlement, which wipes all persisted keys in
    /// one sweep.
    pub(crate) async fn clear_silently(&self) {
        *self.voucher.lock().await = None;
        *self.referral.lock().await = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
