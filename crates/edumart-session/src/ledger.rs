//! # External Collaborator Traits
//!
//! The two remote-side collaborators of the checkout flow, consumed as
//! black boxes. Production wires HTTP-backed implementations; tests wire
//! instrumented fakes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Collaborators                               │
//! │                                                                         │
//! │  PointsLedger (synchronous, latest-known balance)                      │
//! │  ├── available_points()   → balance query                              │
//! │  └── can_afford(cost)     → sufficiency predicate                      │
//! │                                                                         │
//! │  PurchaseService (async, the single network call of the flow)          │
//! │  └── purchase_courses_with_points(request) → receipt / error           │
//! │                                                                         │
//! │  The orchestrator treats a non-success receipt and a thrown error      │
//! │  identically: checkout failure, state untouched.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use edumart_core::Points;

// =============================================================================
// Points Ledger
// =============================================================================

/// The user's points balance, as last known to the client.
///
/// Both methods are synchronous on purpose: the balance guard must run
/// against the latest known balance BEFORE any network interaction, to
/// avoid a round-trip for a purchase that cannot succeed. Refreshing the
/// balance from the server is the implementor's concern.
pub trait PointsLedger: Send + Sync {
    /// The points currently available to spend.
    fn available_points(&self) -> Points;

    /// Whether the balance covers the given cost.
    fn can_afford(&self, cost: Points) -> bool {
        cost <= self.available_points()
    }
}

// =============================================================================
// Purchase Service
// =============================================================================

/// Payload of the points purchase call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Every course id in the cart, in cart order.
    pub course_ids: Vec<String>,

    /// The cart's total points price.
    pub points_cost: Points,

    /// Human-readable description for the remote ledger entry.
    pub description: String,
}

/// Response of the points purchase call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    /// Whether the remote side accepted the purchase.
    pub success: bool,
}

/// Transport-level failure of the purchase call.
#[derive(Debug, Error)]
pub enum PurchaseCallError {
    /// The call never completed (network down, timeout, 5xx).
    #[error("Purchase call failed: {0}")]
    Transport(String),
}

/// The remote purchase operation.
#[allow(async_fn_in_trait)]
pub trait PurchaseService: Send + Sync {
    /// Exchanges points for enrollment in the given courses.
    ///
    /// This is the single network call of the checkout flow.
    async fn purchase_courses_with_points(
        &self,
        request: PurchaseRequest,
    ) -> Result<PurchaseReceipt, PurchaseCallError>;
}
