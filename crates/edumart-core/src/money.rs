//! # Money Module
//!
//! Provides the `Money` and `Points` types for the marketplace's two
//! currencies.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a discount engine:                                                  │
//! │    $29.99 × 20% = $5.998000000001  → Which cent did we charge?         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    2999 cents × 2000 bps = 600 cents, rounded once, explicitly         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual Currency
//! Courses carry two prices: a money price (cents) and a points price.
//! Points are the platform's secondary currency - earned on purchases,
//! spendable at checkout. Both are integer newtypes; they never mix in
//! arithmetic.
//!
//! ## Usage
//! ```rust
//! use edumart_core::money::{Money, Points};
//!
//! let price = Money::from_cents(4999); // $49.99
//!
//! // Discount math works in basis points (2000 bps = 20%)
//! let off = price.percentage(2000);
//! assert_eq!(off.cents(), 1000); // $10.00
//!
//! // Base earn accrual: floor(subtotal × 10%)
//! assert_eq!(price.earn_base_points(), Points::new(4));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and over-discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Course.price_cents ──► CartItem.price ──► Cart.total_price            │
/// │                                                │                        │
/// │                                                ▼                        │
/// │  compute_discount(subtotal, ...) ──► DiscountResult.discount_amount    │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use edumart_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the smaller of two amounts.
    ///
    /// Used by the fixed-voucher branch: a fixed discount is individually
    /// capped at the subtotal it is applied to.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    /// Calculates a percentage of this amount, in basis points.
    ///
    /// ## Basis Points
    /// 1 basis point = 0.01% = 1/10000. A 20% voucher is 2000 bps.
    ///
    /// ## Implementation
    /// Integer math: `(amount × bps + 5000) / 10000`. The +5000 provides
    /// round-half-up on the single rounding step, and the i128 intermediate
    /// prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use edumart_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(30000); // $300.00
    /// assert_eq!(subtotal.percentage(2000).cents(), 6000); // 20% = $60.00
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(part as i64)
    }

    /// Base points-to-earn accrual: `floor(subtotal × 10%)`, in whole points.
    ///
    /// ## Why floor?
    /// Points are indivisible. A $10.99 subtotal earns exactly 1 point;
    /// the fractional 0.099 is never carried anywhere.
    ///
    /// ## Example
    /// ```rust
    /// use edumart_core::money::{Money, Points};
    ///
    /// assert_eq!(Money::from_cents(30000).earn_base_points(), Points::new(30));
    /// assert_eq!(Money::from_cents(1099).earn_base_points(), Points::new(1));
    /// assert_eq!(Money::from_cents(999).earn_base_points(), Points::new(0));
    /// ```
    pub fn earn_base_points(&self) -> Points {
        // floor(dollars × 0.10) == cents / 1000 in integer math
        Points::new(self.0 / 1000)
    }
}

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and log lines. Use frontend formatting for actual
/// UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for line quantities, should they ever exist).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing an iterator of Money values (cart total recomputation).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Points Type
// =============================================================================

/// The platform's secondary currency.
///
/// Earned via purchases (10% base accrual plus code bonuses) and spendable
/// as an alternate checkout method. Same integer discipline as [`Money`],
/// but the two types never mix: you cannot add Points to Money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Points(i64);

impl Points {
    /// Creates a Points value.
    #[inline]
    pub const fn new(points: i64) -> Self {
        Points(points)
    }

    /// Returns the raw point count.
    #[inline]
    pub const fn count(&self) -> i64 {
        self.0
    }

    /// Returns zero points.
    #[inline]
    pub const fn zero() -> Self {
        Points(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pts", self.0)
    }
}

impl Default for Points {
    fn default() -> Self {
        Points::zero()
    }
}

impl Add for Points {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Points(self.0 + other.0)
    }
}

impl AddAssign for Points {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Points {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Points(self.0 - other.0)
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Self {
        iter.fold(Points::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 49]
            .iter()
            .map(|c| Money::from_cents(*c))
            .sum();
        assert_eq!(total.cents(), 399);

        let none: Money = std::iter::empty::<Money>().sum();
        assert!(none.is_zero());
    }

    #[test]
    fn test_percentage_basic() {
        // $300.00 at 20% = $60.00
        let amount = Money::from_cents(30000);
        assert_eq!(amount.percentage(2000).cents(), 6000);
    }

    #[test]
    fn test_percentage_with_rounding() {
        // $10.99 at 15% = $1.6485 → $1.65 (round half up on the single step)
        let amount = Money::from_cents(1099);
        assert_eq!(amount.percentage(1500).cents(), 165);
    }

    #[test]
    fn test_min_caps_fixed_discounts() {
        let subtotal = Money::from_cents(2000);
        let voucher_value = Money::from_cents(5000);
        assert_eq!(voucher_value.min(subtotal), subtotal);
        assert_eq!(subtotal.min(voucher_value), subtotal);
    }

    #[test]
    fn test_earn_base_points_floors() {
        assert_eq!(Money::from_cents(30000).earn_base_points(), Points::new(30));
        assert_eq!(Money::from_cents(1099).earn_base_points(), Points::new(1));
        assert_eq!(Money::from_cents(999).earn_base_points(), Points::new(0));
        assert_eq!(Money::zero().earn_base_points(), Points::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_points_arithmetic() {
        let a = Points::new(30);
        let b = Points::new(50);
        assert_eq!(a + b, Points::new(80));
        assert_eq!(b - a, Points::new(20));

        let total: Points = [10, 20, 30].iter().map(|p| Points::new(*p)).sum();
        assert_eq!(total.count(), 60);
    }

    #[test]
    fn test_points_display() {
        assert_eq!(format!("{}", Points::new(150)), "150 pts");
    }
}
