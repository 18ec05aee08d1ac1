//! # Session Bootstrap
//!
//! Wires storage, codec, and stores into one ready-to-use context.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Startup                                   │
//! │                                                                         │
//! │  1. Open Storage ─────────────────────────────────────────────────────► │
//! │     • SQLite with WAL mode at config.storage_path                       │
//! │     • Run pending migrations                                            │
//! │                                                                         │
//! │  2. Hydrate Stores ───────────────────────────────────────────────────► │
//! │     • CartStore: last persisted cart (fail-soft to empty)               │
//! │     • CodeStore: last persisted voucher/referral (fail-soft to none)    │
//! │                                                                         │
//! │  3. Hand the context to the UI layer ─────────────────────────────────► │
//! │     • UI holds the store references and subscribes its notification    │
//! │       sink; checkout is wired per-collaborator via orchestrator()      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::info;

use edumart_store::{SessionCodec, Storage, StorageConfig};

use crate::cart_store::CartStore;
use crate::checkout::CheckoutOrchestrator;
use crate::codes::CodeStore;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::ledger::{PointsLedger, PurchaseService};
use crate::notify::NotificationSink;
use crate::pricing::PricingSummary;

/// A fully hydrated session: the stores the UI layer holds for its
/// lifetime.
pub struct SessionContext {
    /// Cart state and mutations.
    pub cart: Arc<CartStore>,

    /// Voucher / referral state and mutations.
    pub codes: Arc<CodeStore>,

    codec: SessionCodec,
    sink: Arc<dyn NotificationSink>,
    config: SessionConfig,
}

impl SessionContext {
    /// Opens storage at `config.storage_path` and hydrates the stores.
    ///
    /// Corrupt or missing persisted state never fails the bootstrap; only
    /// an unusable storage backend does.
    pub async fn bootstrap(
        config: SessionConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, SessionError> {
        info!(path = %config.storage_path, "Bootstrapping session");

        let storage = Storage::new(StorageConfig::new(&config.storage_path)).await?;
        Self::with_storage(storage, config, sink).await
    }

    /// Bootstraps over in-memory storage (tests, previews).
    pub async fn bootstrap_in_memory(
        config: SessionConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, SessionError> {
        let storage = Storage::new(StorageConfig::in_memory()).await?;
        Self::with_storage(storage, config, sink).await
    }

    async fn with_storage(
        storage: Storage,
        config: SessionConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, SessionError> {
        let codec = SessionCodec::new(storage);
        let cart = Arc::new(CartStore::hydrate(codec.clone(), sink.clone()).await);
        let codes = Arc::new(CodeStore::hydrate(codec.clone(), sink.clone()).await);

        info!("Session state hydrated");

        Ok(SessionContext {
            cart,
            codes,
            codec,
            sink,
            config,
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Derives the current pricing summary for the cart page.
    pub async fn pricing_summary(&self) -> PricingSummary {
        PricingSummary::derive(&self.cart, &self.codes).await
    }

    /// Builds the checkout orchestrator over the given collaborators.
    ///
    /// The ledger and purchase service are per-user remote adapters, so
    /// they arrive here rather than at bootstrap.
    pub fn orchestrator<L, P>(&self, ledger: L, purchase: P) -> CheckoutOrchestrator<L, P>
    where
        L: PointsLedger,
        P: PurchaseService,
    {
        CheckoutOrchestrator::new(
            self.cart.clone(),
            self.codes.clone(),
            self.codec.clone(),
            ledger,
            purchase,
            self.sink.clone(),
            self.config.clone(),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutOutcome;
    use crate::ledger::{PurchaseCallError, PurchaseReceipt, PurchaseRequest};
    use crate::notify::NullSink;
    use crate::testing::test_course;
    use edumart_core::{Money, Points};

    struct FixedLedger(Points);

    impl PointsLedger for FixedLedger {
        fn available_points(&self) -> Points {
            self.0
        }
    }

    struct AlwaysAccept;

    impl PurchaseService for AlwaysAccept {
        async fn purchase_courses_with_points(
            &self,
            _request: PurchaseRequest,
        ) -> Result<PurchaseReceipt, PurchaseCallError> {
            Ok(PurchaseReceipt { success: true })
        }
    }

    /// Full session walk-through: browse → cart → codes → checkout.
    #[tokio::test]
    async fn test_end_to_end_points_purchase() {
        let session = SessionContext::bootstrap_in_memory(
            SessionConfig::default(),
            Arc::new(NullSink),
        )
        .await
        .unwrap();

        session
            .cart
            .add_to_cart(&test_course("algebra", 20000, 100))
            .await;
        session
            .cart
            .add_to_cart(&test_course("guitar", 10000, 50))
            .await;
        assert!(session.cart.is_in_cart("algebra").await);

        session.codes.apply_voucher("DISCOUNT20").await.unwrap();
        session.codes.apply_referral("FRIEND10").await.unwrap();

        let summary = session.pricing_summary().await;
        assert_eq!(summary.subtotal, Money::from_cents(30000));
        assert_eq!(summary.discount_amount, Money::from_cents(9000));
        assert_eq!(summary.points_to_earn, Points::new(80));

        // Balance 100 < cost 150: guard refuses, state intact
        let broke = session.orchestrator(FixedLedger(Points::new(100)), AlwaysAccept);
        assert_eq!(
            broke.checkout_with_points().await,
            CheckoutOutcome::InsufficientPoints {
                required: Points::new(150),
                available: Points::new(100),
            }
        );
        assert_eq!(session.cart.totals().await.item_count, 2);

        // Balance 200: purchase settles, session is clean
        let funded = session.orchestrator(FixedLedger(Points::new(200)), AlwaysAccept);
        assert!(funded.checkout_with_points().await.succeeded());
        assert!(session.cart.is_empty().await);
        assert_eq!(session.codes.active_voucher().await, None);
        assert_eq!(session.codes.active_referral().await, None);
    }

    #[tokio::test]
    async fn test_bootstrap_starts_empty_on_fresh_storage() {
        let session = SessionContext::bootstrap_in_memory(
            SessionConfig::default(),
            Arc::new(NullSink),
        )
        .await
        .unwrap();

        assert!(session.cart.is_empty().await);
        assert_eq!(session.codes.active_voucher().await, None);
        assert!(session.pricing_summary().await.subtotal.is_zero());
    }
}
