//! # Cart Store
//!
//! Owns the canonical in-memory cart and every mutation path to it.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  UI Action              Store Method             Effect Chain           │
//! │  ─────────              ────────────             ────────────           │
//! │                                                                         │
//! │  Click "Add" ──────────► add_to_cart() ────┐                           │
//! │  Click "Remove" ───────► remove_from_cart()├─► 1. mutate Cart          │
//! │  Click "Empty cart" ───► clear_cart() ─────┘   2. recompute totals     │
//! │                                                3. persist (ordered     │
//! │                                                   after the mutation)  │
//! │                                                4. publish outcome      │
//! │                                                                         │
//! │  Render cart ──────────► snapshot() / totals()  (read only)            │
//! │                                                                         │
//! │  NOTE: All operations run under the cart Mutex. The persistence        │
//! │        write happens inside the locked section so writes land in       │
//! │        mutation order; it is fire-and-forget with respect to the       │
//! │        outcome (a failed write is logged, never surfaced as a          │
//! │        failed mutation).                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Duplicate adds and removes of missing lines are benign outcomes - the
//! store reports them and changes nothing. No mutation here ever fails.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use edumart_core::{Cart, CartMutation, CartTotals, Course};
use edumart_store::SessionCodec;

use crate::notify::{Notification, NotificationSink};

/// The session's cart state.
///
/// ## Thread Safety
/// The cart is wrapped in `Mutex` because the UI layer may issue
/// concurrent calls; only one may mutate at a time. Reads also take the
/// lock but release it quickly.
pub struct CartStore {
    cart: Mutex<Cart>,
    codec: SessionCodec,
    sink: Arc<dyn NotificationSink>,
}

impl CartStore {
    /// Hydrates the store from durable storage.
    ///
    /// Runs at session bootstrap. A missing or corrupt persisted cart
    /// fails soft to the empty cart inside the codec.
    pub async fn hydrate(codec: SessionCodec, sink: Arc<dyn NotificationSink>) -> Self {
        let cart = codec.load_cart().await;
        if !cart.is_empty() {
            info!(items = cart.item_count(), "Cart restored from storage");
        }
        CartStore {
            cart: Mutex::new(cart),
            codec,
            sink,
        }
    }

    /// Creates a store with an empty cart (no hydration).
    pub fn empty(codec: SessionCodec, sink: Arc<dyn NotificationSink>) -> Self {
        CartStore {
            cart: Mutex::new(Cart::new()),
            codec,
            sink,
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a course to the cart.
    ///
    /// ## Behavior
    /// - Course already in cart: no-op, "already present" outcome
    /// - Otherwise: appends a frozen line, recomputes totals, persists
    pub async fn add_to_cart(&self, course: &Course) -> CartMutation {
        debug!(course_id = %course.id, "add_to_cart");

        let mut cart = self.cart.lock().await;
        let outcome = cart.add_course(course);
        if outcome.changed_state() {
            self.persist(&cart).await;
        }
        drop(cart);

        match &outcome {
            CartMutation::Added { .. } => {
                info!(course_id = %course.id, "Course added to cart");
                self.sink.publish(Notification::success(
                    "Added to cart",
                    format!("{} is now in your cart.", course.title),
                ));
            }
            CartMutation::AlreadyInCart { .. } => {
                self.sink.publish(Notification::info(
                    "Already in cart",
                    format!("{} is already in your cart.", course.title),
                ));
            }
            _ => {}
        }

        outcome
    }

    /// Removes the line with the given identity.
    ///
    /// Removing a line that does not exist is a no-op.
    pub async fn remove_from_cart(&self, item_id: &str) -> CartMutation {
        debug!(item_id = %item_id, "remove_from_cart");

        let mut cart = self.cart.lock().await;
        // Grab the title before the line disappears
        let title = cart
            .items
            .iter()
            .find(|i| i.item_id == item_id)
            .map(|i| i.title.clone());
        let outcome = cart.remove_item(item_id);
        if outcome.changed_state() {
            self.persist(&cart).await;
        }
        drop(cart);

        if let CartMutation::Removed { .. } = &outcome {
            self.sink.publish(Notification::info(
                "Removed from cart",
                match title {
                    Some(title) => format!("{} was removed from your cart.", title),
                    None => "The course was removed from your cart.".to_string(),
                },
            ));
        }

        outcome
    }

    /// Resets to the empty cart (explicit user "empty cart" action).
    pub async fn clear_cart(&self) -> CartMutation {
        debug!("clear_cart");

        let mut cart = self.cart.lock().await;
        let outcome = cart.clear();
        self.persist(&cart).await;
        drop(cart);

        self.sink.publish(Notification::info(
            "Cart emptied",
            "All courses were removed from your cart.",
        ));

        outcome
    }

    /// Clears the in-memory cart without notifying or persisting.
    ///
    /// Used by checkout settlement, which owns the success notification
    /// and wipes all persisted keys in one sweep.
    pub(crate) async fn clear_silently(&self) {
        self.cart.lock().await.clear();
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// True iff some line references the given course.
    ///
    /// Drives the "Add" vs "In cart" affordance in the catalog.
    pub async fn is_in_cart(&self, course_id: &str) -> bool {
        self.cart.lock().await.is_in_cart(course_id)
    }

    /// Current cart totals.
    pub async fn totals(&self) -> CartTotals {
        CartTotals::from(&*self.cart.lock().await)
    }

    /// A full copy of the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// True if the cart has no lines.
    pub async fn is_empty(&self) -> bool {
        self.cart.lock().await.is_empty()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Writes the cart back to durable storage.
    ///
    /// Failures are logged, not propagated: the in-memory cart is the
    /// canonical value and the next successful write catches storage up.
    async fn persist(&self, cart: &Cart) {
        if let Err(err) = self.codec.save_cart(cart).await {
            warn!(error = %err, "Failed to persist cart");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
