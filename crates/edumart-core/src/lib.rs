//! # edumart-core: Pure Business Logic for the Edumart Cart Engine
//!
//! This crate is the **heart** of the Edumart shopping cart. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Edumart Cart Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Front End (out of scope)                 │   │
//! │  │    Catalog UI ──► Cart UI ──► Checkout UI ──► My Courses       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    edumart-session                              │   │
//! │  │    CartStore, CodeStore, CheckoutOrchestrator, notifications   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ edumart-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ discount  │  │   │
//! │  │   │  Course   │  │   Money   │  │   Cart    │  │ Vouchers  │  │   │
//! │  │   │           │  │   Points  │  │ CartItem  │  │ Referrals │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  edumart-store (Storage Layer)                  │   │
//! │  │            SQLite key-value session state, SessionCodec         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Course snapshot)
//! - [`money`] - Money and Points types with integer arithmetic (no floats!)
//! - [`cart`] - Cart aggregate with derived totals
//! - [`discount`] - Voucher/referral registries and discount stacking
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for user-entered codes
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Benign Outcomes**: Ordinary conditions (duplicate add, unknown code) are
//!    typed outcomes, never panics
//!
//! ## Example Usage
//!
//! ```rust
//! use edumart_core::money::{Money, Points};
//! use edumart_core::discount::{compute_discount, ReferralReward, VoucherBenefit, VoucherCode};
//!
//! // Cart subtotal of $300.00 (never built from floats!)
//! let subtotal = Money::from_cents(30000);
//!
//! // 20% voucher stacked with a 10% / 50-point referral
//! let voucher = VoucherCode::new("DISCOUNT20", VoucherBenefit::Percentage { percent: 20 });
//! let referral = ReferralReward { discount_percent: 10, bonus_points: Points::new(50) };
//!
//! let result = compute_discount(subtotal, Some(&voucher), Some(&referral));
//!
//! // $60 voucher + $30 referral = $90 off; 30 base points + 50 bonus = 80
//! assert_eq!(result.discount_amount, Money::from_cents(9000));
//! assert_eq!(result.points_to_earn, Points::new(80));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use edumart_core::Money` instead of
// `use edumart_core::money::Money`

pub use cart::{Cart, CartItem, CartMutation, CartTotals};
pub use discount::{
    compute_discount, DiscountResult, ReferralCode, ReferralRegistry, ReferralReward,
    VoucherBenefit, VoucherCode, VoucherRegistry,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Points};
pub use types::Course;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Base points-to-earn accrual rate in basis points (1000 = 10%).
///
/// ## Why a constant?
/// Every purchase earns 10% of the money subtotal back as points, before
/// any voucher or referral bonus. The rate is platform-wide and applies
/// independently of any active codes.
pub const BASE_EARN_RATE_BPS: u32 = 1000;

/// Maximum length of a user-entered voucher or referral code.
///
/// ## Business Reason
/// Codes are short marketing strings ("DISCOUNT20"). A generous cap keeps
/// registry lookups cheap and rejects accidental paste-a-paragraph input.
pub const MAX_CODE_LENGTH: usize = 32;
