//! # Domain Types
//!
//! Core domain types shared across the cart engine.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Course Snapshot Flow                               │
//! │                                                                         │
//! │  Catalog page (out of scope)                                           │
//! │       │  user clicks "Add to cart"                                      │
//! │       ▼                                                                 │
//! │  Course ──────────► CartItem::from_course() ──────► CartItem           │
//! │  (live record)      freezes title, prices,          (frozen copy)      │
//! │                     image, teacher, subject                             │
//! │                                                                         │
//! │  If the catalog later changes the price, lines already in the cart     │
//! │  keep the price the learner saw when they added them.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Points};

// =============================================================================
// Course
// =============================================================================

/// A purchasable course as presented by the catalog.
///
/// This is the input snapshot for `add_to_cart`: the cart engine never
/// fetches course data itself; the calling layer hands over whatever the
/// catalog currently shows.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,

    /// Display title shown in the cart and on the purchase description.
    pub title: String,

    /// Money price in cents.
    pub price: Money,

    /// Points price (the alternate checkout currency).
    pub points_price: Points,

    /// Cover image URL for the cart line.
    pub image_url: Option<String>,

    /// Name of the teacher offering the course.
    pub teacher_name: String,

    /// Subject tag ("Mathematics", "Guitar", ...).
    pub subject: String,
}
