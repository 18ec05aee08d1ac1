//! # Cart Aggregate
//!
//! The canonical shopping cart value: an insertion-ordered sequence of
//! frozen course lines plus two derived totals.
//!
//! ## Derived-Totals Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Mutation Flow                                   │
//! │                                                                         │
//! │  add_course() ──┐                                                       │
//! │  remove_item() ─┼──► mutate items ──► recompute_totals() ──► outcome   │
//! │  clear() ───────┘         │                                             │
//! │                           │    total_price        = Σ item.price       │
//! │                           │    total_points_price = Σ item.points      │
//! │                           ▼                                             │
//! │  Totals are ALWAYS a pure function of the item sequence. They are      │
//! │  never mutated independently, and every mutator recomputes them        │
//! │  synchronously before returning. There is no incremental update to     │
//! │  drift out of sync.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Benign Outcomes
//! Ordinary conditions - adding a course that is already in the cart,
//! removing a line that does not exist - are reported as [`CartMutation`]
//! outcomes, never as errors. The session layer maps outcomes to user
//! notifications; nothing here panics or returns `Err` for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Points};
use crate::types::Course;

// =============================================================================
// Cart Item
// =============================================================================

/// One purchasable line in the cart.
///
/// ## Identity
/// `item_id` is unique per add: it is derived from the course id plus the
/// `added_at` timestamp in milliseconds, so the same course removed and
/// re-added later produces a distinguishable line. Duplicate adds of a
/// course are rejected by course id before a second identity could ever
/// be minted.
///
/// ## Immutability
/// A cart item is a frozen snapshot. It is removed wholesale, never edited
/// in place; if the catalog changes the course, lines already in the cart
/// keep the data the learner saw when adding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Unique line identity (`{course_id}-{added_at_millis}`).
    pub item_id: String,

    /// The referenced course.
    pub course_id: String,

    /// Title at time of adding (frozen).
    pub title: String,

    /// Money price at time of adding (frozen).
    pub price: Money,

    /// Points price at time of adding (frozen).
    pub points_price: Points,

    /// Cover image at time of adding (frozen).
    pub image_url: Option<String>,

    /// Teacher name at time of adding (frozen).
    pub teacher_name: String,

    /// Subject tag at time of adding (frozen).
    pub subject: String,

    /// When this line entered the cart.
    ///
    /// Persisted and restored as a true temporal value - the storage codec
    /// round-trips this as `DateTime<Utc>`, not a string.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart line from a course snapshot.
    ///
    /// The timestamp is captured here; it both records when the line was
    /// added and completes the line's identity.
    pub fn from_course(course: &Course) -> Self {
        let added_at = Utc::now();
        CartItem {
            item_id: format!("{}-{}", course.id, added_at.timestamp_millis()),
            course_id: course.id.clone(),
            title: course.title.clone(),
            price: course.price,
            points_price: course.points_price,
            image_url: course.image_url.clone(),
            teacher_name: course.teacher_name.clone(),
            subject: course.subject.clone(),
            added_at,
        }
    }
}

// =============================================================================
// Mutation Outcomes
// =============================================================================

/// Outcome of a cart mutation.
///
/// ## Why not `Result`?
/// None of these are failures. A duplicate add or a remove of a missing
/// line leaves the cart untouched and is worth telling the user about,
/// but the operation itself completed normally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CartMutation {
    /// A new line was appended.
    Added { item_id: String },

    /// The course is already in the cart; nothing changed.
    AlreadyInCart { course_id: String },

    /// The line was removed.
    Removed { item_id: String },

    /// No line with that identity exists; nothing changed.
    NotInCart { item_id: String },

    /// All lines were removed.
    Cleared,
}

impl CartMutation {
    /// True if the mutation actually changed cart state.
    ///
    /// Drives whether the session layer writes the cart back to durable
    /// storage: no-op outcomes skip the persistence round-trip.
    pub fn changed_state(&self) -> bool {
        matches!(
            self,
            CartMutation::Added { .. } | CartMutation::Removed { .. } | CartMutation::Cleared
        )
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart aggregate.
///
/// ## Invariants
/// - `items` is insertion-ordered; lines are unique by `item_id` and by
///   `course_id` (duplicate course adds are no-ops)
/// - `total_price` and `total_points_price` equal the sums over `items`
///   at all times (see module docs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    /// Lines in the cart, in the order they were added.
    pub items: Vec<CartItem>,

    /// Sum of money prices over `items`. Derived; never set directly.
    pub total_price: Money,

    /// Sum of points prices over `items`. Derived; never set directly.
    pub total_points_price: Points,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a course to the cart.
    ///
    /// ## Behavior
    /// - Course already in cart: no-op, reports [`CartMutation::AlreadyInCart`]
    /// - Otherwise: appends a frozen line and recomputes totals
    pub fn add_course(&mut self, course: &Course) -> CartMutation {
        if self.is_in_cart(&course.id) {
            return CartMutation::AlreadyInCart {
                course_id: course.id.clone(),
            };
        }

        let item = CartItem::from_course(course);
        let item_id = item.item_id.clone();
        self.items.push(item);
        self.recompute_totals();

        CartMutation::Added { item_id }
    }

    /// Removes the line with the given identity.
    ///
    /// ## Behavior
    /// - Line exists: removed, totals recomputed
    /// - Line missing: no-op, reports [`CartMutation::NotInCart`]
    pub fn remove_item(&mut self, item_id: &str) -> CartMutation {
        let initial_len = self.items.len();
        self.items.retain(|i| i.item_id != item_id);

        if self.items.len() == initial_len {
            return CartMutation::NotInCart {
                item_id: item_id.to_string(),
            };
        }

        self.recompute_totals();
        CartMutation::Removed {
            item_id: item_id.to_string(),
        }
    }

    /// Resets to the empty cart (empty sequence, zero totals).
    pub fn clear(&mut self) -> CartMutation {
        self.items.clear();
        self.recompute_totals();
        CartMutation::Cleared
    }

    /// True iff some line references the given course.
    ///
    /// Always walks the current item sequence - no cached membership set
    /// that could go stale.
    pub fn is_in_cart(&self, course_id: &str) -> bool {
        self.items.iter().any(|i| i.course_id == course_id)
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Course ids of every line, in cart order.
    ///
    /// This is the payload of the points purchase call.
    pub fn course_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.course_id.clone()).collect()
    }

    /// Human-readable description of the cart contents.
    ///
    /// Sent along with the purchase call so the remote ledger entry reads
    /// like a receipt line.
    pub fn summary_line(&self) -> String {
        let titles: Vec<&str> = self.items.iter().map(|i| i.title.as_str()).collect();
        format!(
            "{} course(s): {}",
            self.items.len(),
            titles.join(", ")
        )
    }

    /// Recomputes both totals from the item sequence.
    ///
    /// Called by every mutator. Full recomputation, never incremental -
    /// this is what makes the derived-totals invariant unbreakable.
    fn recompute_totals(&mut self) {
        self.total_price = self.items.iter().map(|i| i.price).sum();
        self.total_points_price = self.items.iter().map(|i| i.points_price).sum();
    }

    /// Re-derives totals after deserialization.
    ///
    /// Persisted payloads include the totals, but storage is outside the
    /// invariant boundary; hydration recomputes them from the items rather
    /// than trusting the stored values.
    pub fn restore_invariants(&mut self) {
        self.recompute_totals();
    }
}

// =============================================================================
// Cart Totals Summary
// =============================================================================

/// Cart totals summary for UI responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_price: Money,
    pub total_points_price: Points,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_price: cart.total_price,
            total_points_price: cart.total_points_price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
