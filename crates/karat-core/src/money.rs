//! # Money and Weight
//!
//! Fixed-point types for the two physical quantities this business runs on:
//! currency and gold weight.
//!
//! ## Why Integer Representations?
//! ```text
//! In floating point:      0.1 + 0.2 = 0.30000000000000004
//! In a gold shop:         21.105 g at 3,000.00/g must settle to the piaster
//!
//! OUR SOLUTION:
//!   Money  = i64 minor currency units (2 decimals)
//!   Weight = i64 milligrams           (3 decimals of a gram)
//!
//! Every rounding step is explicit integer math. Nothing ever silently
//! truncates on the way to a receipt.
//! ```
//!
//! ## Usage
//! ```rust
//! use karat_core::money::{Money, Weight};
//!
//! let rate = Money::from_minor(300_000);        // 3,000.00 per gram
//! let weight = Weight::from_milligrams(5_000);  // 5.000 g
//!
//! assert_eq!(weight.value_at(rate), Money::from_minor(1_500_000));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: net amounts go negative when trade-in value exceeds
///   the goods value (the shop owes the customer change)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No float constructor**: there is deliberately no `from_float`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use karat_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // 10.99
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// Used for change-due: `max(0, -net)` never shows the customer a
    /// negative change line.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }
}

/// Debug-friendly display. UI formatting/localization happens elsewhere.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Weight Type
// =============================================================================

/// A gold weight in milligrams.
///
/// Scrap accounting and trade-in pricing both run on this type; the database
/// stores the same integer, so the ledger and the arithmetic can never
/// disagree by a rounding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Weight(i64);

impl Weight {
    /// Creates a Weight from milligrams.
    ///
    /// ```rust
    /// use karat_core::money::Weight;
    ///
    /// let w = Weight::from_milligrams(21_105); // 21.105 g
    /// assert_eq!(w.milligrams(), 21_105);
    /// ```
    #[inline]
    pub const fn from_milligrams(mg: i64) -> Self {
        Weight(mg)
    }

    /// Creates a Weight from whole grams.
    #[inline]
    pub const fn from_grams(g: i64) -> Self {
        Weight(g * 1000)
    }

    /// Returns the weight in milligrams.
    #[inline]
    pub const fn milligrams(&self) -> i64 {
        self.0
    }

    /// Whole-gram portion.
    #[inline]
    pub const fn grams_whole(&self) -> i64 {
        self.0 / 1000
    }

    /// Milligram remainder (always 0-999).
    #[inline]
    pub const fn milligrams_part(&self) -> i64 {
        (self.0 % 1000).abs()
    }

    /// Zero weight.
    #[inline]
    pub const fn zero() -> Self {
        Weight(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Values this weight at a per-gram rate, rounding half up to the
    /// nearest minor unit.
    ///
    /// Computed in i128 so a vault's worth of gold cannot overflow:
    /// `(mg × rate_minor + 500) / 1000`.
    ///
    /// ```rust
    /// use karat_core::money::{Money, Weight};
    ///
    /// // 5 g at 100 minor units per gram = 500
    /// let value = Weight::from_grams(5).value_at(Money::from_minor(100));
    /// assert_eq!(value, Money::from_minor(500));
    /// ```
    pub fn value_at(&self, rate_per_gram: Money) -> Money {
        let minor = (self.0 as i128 * rate_per_gram.minor() as i128 + 500) / 1000;
        Money::from_minor(minor as i64)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:03}g",
            sign,
            self.grams_whole().abs(),
            self.milligrams_part()
        )
    }
}

impl Add for Weight {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Weight(self.0 + other.0)
    }
}

impl AddAssign for Weight {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Weight {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Weight(self.0 - other.0)
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Self {
        iter.fold(Weight::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn money_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).minor(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
    }

    #[test]
    fn money_display() {
        assert_eq!(format!("{}", Money::from_minor(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_minor(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_minor(0)), "0.00");
    }

    #[test]
    fn money_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);
        assert_eq!((-a).minor(), -1000);
    }

    #[test]
    fn money_sum() {
        let total: Money = [100, 250, 75].into_iter().map(Money::from_minor).sum();
        assert_eq!(total.minor(), 425);
    }

    #[test]
    fn money_clamp_non_negative() {
        assert_eq!(Money::from_minor(-300).clamp_non_negative().minor(), 0);
        assert_eq!(Money::from_minor(300).clamp_non_negative().minor(), 300);
    }

    #[test]
    fn weight_parts() {
        let w = Weight::from_milligrams(21_105);
        assert_eq!(w.grams_whole(), 21);
        assert_eq!(w.milligrams_part(), 105);
        assert_eq!(format!("{}", w), "21.105g");
    }

    #[test]
    fn weight_value_at_exact() {
        // 10 g at 3,000.00/g = 30,000.00
        let value = Weight::from_grams(10).value_at(Money::from_minor(300_000));
        assert_eq!(value.minor(), 3_000_000);
    }

    #[test]
    fn weight_value_at_rounds_half_up() {
        // 1 mg at rate 500 minor/g = 0.5 minor, rounds to 1
        let value = Weight::from_milligrams(1).value_at(Money::from_minor(500));
        assert_eq!(value.minor(), 1);

        // 1 mg at rate 499 minor/g = 0.499 minor, rounds to 0
        let value = Weight::from_milligrams(1).value_at(Money::from_minor(499));
        assert_eq!(value.minor(), 0);
    }

    #[test]
    fn weight_arithmetic() {
        let a = Weight::from_grams(10);
        let b = Weight::from_milligrams(500);

        assert_eq!((a + b).milligrams(), 10_500);
        assert_eq!((a - b).milligrams(), 9_500);

        let total: Weight = [1000, 2000].into_iter().map(Weight::from_milligrams).sum();
        assert_eq!(total.milligrams(), 3000);
    }
}
