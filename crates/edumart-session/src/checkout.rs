//! # Checkout Orchestration
//!
//! Coordinates a single points-based purchase.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 checkout_with_points()                                  │
//! │                                                                         │
//! │  Idle ──► Validating ──────────► Submitting ──────────► Settled        │
//! │              │                       │                                  │
//! │              │ empty cart            │ network error                    │
//! │              │ insufficient points   │ server rejection                 │
//! │              ▼                       ▼                                  │
//! │         fail BEFORE any         fail with state                         │
//! │         external call           COMPLETELY untouched                    │
//! │                                                                         │
//! │  On success (and only then):                                           │
//! │    1. clear cart + both codes, in memory and in storage                │
//! │    2. emit success notification                                         │
//! │    3. return a FollowUp the caller may navigate on                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Re-entrancy
//! The guard-then-submit sequence is not atomic with respect to the
//! external ledger, so a second click during `Validating → Settled` would
//! race a double spend. An atomic in-flight flag rejects re-entrant
//! attempts with [`CheckoutOutcome::AlreadyInProgress`]; the UI should
//! also disable the trigger for the duration.
//!
//! ## Error Boundary
//! This flow never propagates an error past itself. Remote failures are
//! logged and converted into the `Failed` outcome; the user may retry
//! without re-entering anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use edumart_core::Points;
use edumart_store::SessionCodec;

use crate::cart_store::CartStore;
use crate::codes::CodeStore;
use crate::config::SessionConfig;
use crate::ledger::{PointsLedger, PurchaseRequest, PurchaseService};
use crate::notify::{Notification, NotificationSink};

// =============================================================================
// Outcomes
// =============================================================================

/// What the calling layer should do after a completed checkout.
///
/// An explicit event, not an embedded redirect: the UI decides whether to
/// navigate, stay, or show a modal. The delay exists so the success
/// notification can be seen first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    /// Route of the purchased-courses view.
    pub destination: String,

    /// Suggested delay before navigating, in milliseconds.
    pub delay_ms: u64,
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CheckoutOutcome {
    /// Purchase accepted; cart and codes are cleared.
    Completed { follow_up: FollowUp },

    /// Guard: the cart has no items. No external call was made.
    EmptyCart,

    /// Guard: the points balance does not cover the cart.
    /// No external call was made.
    InsufficientPoints { required: Points, available: Points },

    /// The purchase call failed or was rejected. State is untouched.
    Failed,

    /// Another checkout attempt is still in flight.
    AlreadyInProgress,
}

impl CheckoutOutcome {
    /// Boolean success indicator for callers that only care about that.
    pub fn succeeded(&self) -> bool {
        matches!(self, CheckoutOutcome::Completed { .. })
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Coordinates the points checkout against the external collaborators.
pub struct CheckoutOrchestrator<L, P> {
    cart: Arc<CartStore>,
    codes: Arc<CodeStore>,
    codec: SessionCodec,
    ledger: L,
    purchase: P,
    sink: Arc<dyn NotificationSink>,
    config: SessionConfig,
    in_flight: AtomicBool,
}

impl<L, P> CheckoutOrchestrator<L, P>
where
    L: PointsLedger,
    P: PurchaseService,
{
    /// Creates an orchestrator over the session's stores and collaborators.
    pub fn new(
        cart: Arc<CartStore>,
        codes: Arc<CodeStore>,
        codec: SessionCodec,
        ledger: L,
        purchase: P,
        sink: Arc<dyn NotificationSink>,
        config: SessionConfig,
    ) -> Self {
        CheckoutOrchestrator {
            cart,
            codes,
            codec,
            ledger,
            purchase,
            sink,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Runs one points-based purchase attempt.
    ///
    /// See the module docs for the state machine. Returns an outcome,
    /// never an error.
    pub async fn checkout_with_points(&self) -> CheckoutOutcome {
        // Reject re-entrant attempts for the whole Validating→Settled span
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Checkout attempt rejected: another attempt is in flight");
            return CheckoutOutcome::AlreadyInProgress;
        }

        let outcome = self.run_attempt().await;
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_attempt(&self) -> CheckoutOutcome {
        let attempt_id = Uuid::new_v4();
        debug!(attempt_id = %attempt_id, "checkout_with_points");

        let snapshot = self.cart.snapshot().await;

        // Guard: empty cart
        if snapshot.is_empty() {
            self.sink.publish(Notification::error(
                "Your cart is empty",
                "Add a course before checking out.",
            ));
            return CheckoutOutcome::EmptyCart;
        }

        // Guard: balance, against the latest known balance and BEFORE any
        // network interaction - no round-trip for a purchase that cannot
        // succeed
        let required = snapshot.total_points_price;
        let available = self.ledger.available_points();
        if !self.ledger.can_afford(required) {
            self.sink.publish(Notification::error(
                "Not enough points",
                format!(
                    "This purchase costs {} but you have {}.",
                    required, available
                ),
            ));
            return CheckoutOutcome::InsufficientPoints {
                required,
                available,
            };
        }

        // Submit: the single network call of the flow
        let request = PurchaseRequest {
            course_ids: snapshot.course_ids(),
            points_cost: required,
            description: snapshot.summary_line(),
        };
        info!(
            attempt_id = %attempt_id,
            courses = request.course_ids.len(),
            points = %required,
            "Submitting points purchase"
        );

        match self.purchase.purchase_courses_with_points(request).await {
            Ok(receipt) if receipt.success => {
                self.settle().await;
                info!(attempt_id = %attempt_id, "Checkout completed");
                self.sink.publish(Notification::success(
                    "Purchase complete",
                    "Your new courses are ready in My Courses.",
                ));
                CheckoutOutcome::Completed {
                    follow_up: FollowUp {
                        destination: self.config.purchased_courses_route.clone(),
                        delay_ms: self.config.redirect_delay_ms,
                    },
                }
            }
            Ok(_) => {
                // The server said no; treated exactly like a transport error
                warn!(attempt_id = %attempt_id, "Purchase rejected by server");
                self.publish_failure();
                CheckoutOutcome::Failed
            }
            Err(err) => {
                error!(attempt_id = %attempt_id, error = %err, "Purchase call failed");
                self.publish_failure();
                CheckoutOutcome::Failed
            }
        }
    }

    /// Terminal step of a successful purchase: clear cart and both codes,
    /// in memory and in durable storage, so a refresh mid-redirect cannot
    /// resurrect stale state.
    async fn settle(&self) {
        self.cart.clear_silently().await;
        self.codes.clear_silently().await;
        if let Err(err) = self.codec.clear_all().await {
            warn!(error = %err, "Failed to clear persisted session state after purchase");
        }
    }

    fn publish_failure(&self) {
        self.sink.publish(Notification::error(
            "Purchase failed",
            "Your cart was not charged. Please try again.",
        ));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{PurchaseCallError, PurchaseReceipt};
    use crate::notify::NotificationKind;
    use crate::testing::{test_course, RecordingSink};
    use edumart_store::codec::{CART_KEY, REFERRAL_KEY, VOUCHER_KEY};
    use edumart_store::{Storage, StorageConfig};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    // -------------------------------------------------------------------------
    // Fakes
    // -------------------------------------------------------------------------

    struct FixedLedger(Points);

    impl PointsLedger for FixedLedger {
        fn available_points(&self) -> Points {
            self.0
        }
    }

    #[derive(Clone, Copy)]
    enum PurchaseBehavior {
        Accept,
        Reject,
        Explode,
    }

    /// Call-counting purchase spy.
    struct SpyPurchase {
        behavior: PurchaseBehavior,
        calls: Arc<AtomicUsize>,
        last_request: Arc<StdMutex<Option<PurchaseRequest>>>,
    }

    impl SpyPurchase {
        fn new(behavior: PurchaseBehavior) -> Self {
            SpyPurchase {
                behavior,
                calls: Arc::new(AtomicUsize::new(0)),
                last_request: Arc::new(StdMutex::new(None)),
            }
        }
    }

    impl PurchaseService for SpyPurchase {
        async fn purchase_courses_with_points(
            &self,
            request: PurchaseRequest,
        ) -> Result<PurchaseReceipt, PurchaseCallError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            match self.behavior {
                PurchaseBehavior::Accept => Ok(PurchaseReceipt { success: true }),
                PurchaseBehavior::Reject => Ok(PurchaseReceipt { success: false }),
                PurchaseBehavior::Explode => {
                    Err(PurchaseCallError::Transport("connection reset".to_string()))
                }
            }
        }
    }

    /// Purchase service that parks until released, for re-entrancy tests.
    struct ParkedPurchase {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl PurchaseService for ParkedPurchase {
        async fn purchase_courses_with_points(
            &self,
            _request: PurchaseRequest,
        ) -> Result<PurchaseReceipt, PurchaseCallError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(PurchaseReceipt { success: true })
        }
    }

    // -------------------------------------------------------------------------
    // Harness
    // -------------------------------------------------------------------------

    struct Harness<P: PurchaseService> {
        cart: Arc<CartStore>,
        codes: Arc<CodeStore>,
        codec: SessionCodec,
        sink: Arc<RecordingSink>,
        orchestrator: CheckoutOrchestrator<FixedLedger, P>,
    }

    async fn harness<P: PurchaseService>(balance: i64, purchase: P) -> Harness<P> {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let codec = SessionCodec::new(storage);
        let sink = Arc::new(RecordingSink::default());
        let sink_dyn: Arc<dyn NotificationSink> = sink.clone();

        let cart = Arc::new(CartStore::hydrate(codec.clone(), sink_dyn.clone()).await);
        let codes = Arc::new(CodeStore::hydrate(codec.clone(), sink_dyn.clone()).await);

        let orchestrator = CheckoutOrchestrator::new(
            cart.clone(),
            codes.clone(),
            codec.clone(),
            FixedLedger(Points::new(balance)),
            purchase,
            sink_dyn,
            SessionConfig::default(),
        );

        Harness {
            cart,
            codes,
            codec,
            sink,
            orchestrator,
        }
    }

    /// $300 / 150 points cart with both codes applied.
    async fn fill_session<P: PurchaseService>(h: &Harness<P>) {
        h.cart.add_to_cart(&test_course("algebra", 20000, 100)).await;
        h.cart.add_to_cart(&test_course("guitar", 10000, 50)).await;
        h.codes.apply_voucher("DISCOUNT20").await.unwrap();
        h.codes.apply_referral("FRIEND10").await.unwrap();
    }

    // -------------------------------------------------------------------------
    // Guards
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_empty_cart_never_calls_purchase_service() {
        let h = harness(1000, SpyPurchase::new(PurchaseBehavior::Accept)).await;

        let outcome = h.orchestrator.checkout_with_points().await;

        assert_eq!(outcome, CheckoutOutcome::EmptyCart);
        assert!(!outcome.succeeded());
        assert_eq!(h.orchestrator.purchase.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.sink.titles().last().unwrap(), "Your cart is empty");
    }

    #[tokio::test]
    async fn test_insufficient_points_short_circuits() {
        let h = harness(100, SpyPurchase::new(PurchaseBehavior::Accept)).await;
        fill_session(&h).await;

        let outcome = h.orchestrator.checkout_with_points().await;

        assert_eq!(
            outcome,
            CheckoutOutcome::InsufficientPoints {
                required: Points::new(150),
                available: Points::new(100),
            }
        );
        // Guard fired before any external call
        assert_eq!(h.orchestrator.purchase.calls.load(Ordering::SeqCst), 0);
        // Cart and codes are untouched
        assert_eq!(h.cart.totals().await.item_count, 2);
        assert!(h.codes.active_voucher().await.is_some());
    }

    // -------------------------------------------------------------------------
    // Success
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_success_clears_everything_and_schedules_follow_up() {
        let h = harness(200, SpyPurchase::new(PurchaseBehavior::Accept)).await;
        fill_session(&h).await;

        let outcome = h.orchestrator.checkout_with_points().await;

        assert!(outcome.succeeded());
        let CheckoutOutcome::Completed { follow_up } = outcome else {
            panic!("expected Completed outcome");
        };
        assert_eq!(follow_up.destination, "/dashboard/my-courses");
        assert_eq!(follow_up.delay_ms, 1500);

        // In-memory state is gone
        assert!(h.cart.is_empty().await);
        let totals = h.cart.totals().await;
        assert!(totals.total_price.is_zero());
        assert!(totals.total_points_price.is_zero());
        assert_eq!(h.codes.active_voucher().await, None);
        assert_eq!(h.codes.active_referral().await, None);

        // Durable state is gone too: a refresh cannot resurrect the cart
        assert!(h.codec.load_cart().await.is_empty());
        assert_eq!(h.codec.load_voucher().await, None);
        assert_eq!(h.codec.load_referral().await, None);

        let notifications = h.sink.notifications.lock().unwrap();
        let last = notifications.last().unwrap();
        assert_eq!(last.kind, NotificationKind::Success);
        assert_eq!(last.title, "Purchase complete");
    }

    #[tokio::test]
    async fn test_request_payload_matches_cart() {
        let h = harness(200, SpyPurchase::new(PurchaseBehavior::Accept)).await;
        fill_session(&h).await;

        h.orchestrator.checkout_with_points().await;

        let request = h
            .orchestrator
            .purchase
            .last_request
            .lock()
            .unwrap()
            .clone()
            .unwrap();
        assert_eq!(request.course_ids, vec!["algebra", "guitar"]);
        assert_eq!(request.points_cost, Points::new(150));
        assert_eq!(
            request.description,
            "2 course(s): Course algebra, Course guitar"
        );
    }

    // -------------------------------------------------------------------------
    // Failure
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_server_rejection_preserves_state() {
        let h = harness(200, SpyPurchase::new(PurchaseBehavior::Reject)).await;
        fill_session(&h).await;
        let cart_before = h.cart.snapshot().await;
        let voucher_before = h.codes.active_voucher().await;
        let referral_before = h.codes.active_referral().await;

        let outcome = h.orchestrator.checkout_with_points().await;

        assert_eq!(outcome, CheckoutOutcome::Failed);
        assert!(!outcome.succeeded());
        assert_eq!(h.orchestrator.purchase.calls.load(Ordering::SeqCst), 1);

        // Everything is exactly as before the attempt - the user retries
        // without re-entering anything
        assert_eq!(h.cart.snapshot().await, cart_before);
        assert_eq!(h.codes.active_voucher().await, voucher_before);
        assert_eq!(h.codes.active_referral().await, referral_before);
        assert!(!h.codec.load_cart().await.is_empty());

        let notifications = h.sink.notifications.lock().unwrap();
        let last = notifications.last().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert_eq!(last.title, "Purchase failed");
    }

    #[tokio::test]
    async fn test_transport_error_treated_like_rejection() {
        let h = harness(200, SpyPurchase::new(PurchaseBehavior::Explode)).await;
        fill_session(&h).await;

        let outcome = h.orchestrator.checkout_with_points().await;

        assert_eq!(outcome, CheckoutOutcome::Failed);
        assert_eq!(h.cart.totals().await.item_count, 2);
        assert!(h.codes.active_voucher().await.is_some());
        assert_eq!(h.sink.titles().last().unwrap(), "Purchase failed");
    }

    #[tokio::test]
    async fn test_failed_attempt_can_be_retried_successfully() {
        let h = harness(200, SpyPurchase::new(PurchaseBehavior::Reject)).await;
        fill_session(&h).await;
        assert_eq!(
            h.orchestrator.checkout_with_points().await,
            CheckoutOutcome::Failed
        );

        // Same session, healthy service this time
        let retry = CheckoutOrchestrator::new(
            h.cart.clone(),
            h.codes.clone(),
            h.codec.clone(),
            FixedLedger(Points::new(200)),
            SpyPurchase::new(PurchaseBehavior::Accept),
            Arc::new(crate::notify::NullSink) as Arc<dyn NotificationSink>,
            SessionConfig::default(),
        );
        assert!(retry.checkout_with_points().await.succeeded());
        assert!(h.cart.is_empty().await);
    }

    // -------------------------------------------------------------------------
    // Re-entrancy
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_reentrant_checkout_rejected_while_in_flight() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let h = harness(
            200,
            ParkedPurchase {
                started: started.clone(),
                release: release.clone(),
            },
        )
        .await;
        fill_session(&h).await;

        let orchestrator = Arc::new(h.orchestrator);
        let first = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.checkout_with_points().await })
        };

        // Wait until the first attempt is parked inside the purchase call
        started.notified().await;

        // A second click while Submitting must not reach the service
        let second = orchestrator.checkout_with_points().await;
        assert_eq!(second, CheckoutOutcome::AlreadyInProgress);
        assert!(!second.succeeded());

        release.notify_one();
        let first = first.await.unwrap();
        assert!(first.succeeded());

        // And once settled, the flag is released for future attempts
        assert_eq!(
            orchestrator.checkout_with_points().await,
            CheckoutOutcome::EmptyCart
        );
    }

    // -------------------------------------------------------------------------
    // Storage keys after settlement
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_settlement_wipes_all_storage_keys() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let codec = SessionCodec::new(storage.clone());
        let sink: Arc<dyn NotificationSink> = Arc::new(crate::notify::NullSink);

        let cart = Arc::new(CartStore::hydrate(codec.clone(), sink.clone()).await);
        let codes = Arc::new(CodeStore::hydrate(codec.clone(), sink.clone()).await);
        cart.add_to_cart(&test_course("algebra", 20000, 100)).await;
        codes.apply_voucher("DISCOUNT20").await.unwrap();
        codes.apply_referral("FRIEND10").await.unwrap();

        let orchestrator = CheckoutOrchestrator::new(
            cart,
            codes,
            codec,
            FixedLedger(Points::new(500)),
            SpyPurchase::new(PurchaseBehavior::Accept),
            sink,
            SessionConfig::default(),
        );
        assert!(orchestrator.checkout_with_points().await.succeeded());

        let repo = storage.session_state();
        assert_eq!(repo.get(CART_KEY).await.unwrap(), None);
        assert_eq!(repo.get(VOUCHER_KEY).await.unwrap(), None);
        assert_eq!(repo.get(REFERRAL_KEY).await.unwrap(), None);
    }
}
