//! # Money Module
//!
//! Provides the `Money` type for every amount on a bill.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SPLITTING A BILL                                                       │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    24136.00 / 3 = 8045.333333...  → every guest pays 8045.33           │
//! │    8045.33 × 3 = 24135.99          → the table is 0.01 short ❌         │
//! │                                                                         │
//! │  With integer cents:                                                    │
//! │    2413600 / 3 = 804533 rem 1                                           │
//! │    shares: 804534, 804533, 804533  → exactly 2413600 ✅                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mesa_core::money::Money;
//!
//! let pizza = Money::from_major(14568);          // 14568.00
//! let line = pizza.multiply_quantity(2);         // 29136.00
//! let total = line - Money::from_major(5000);    // 24136.00
//! assert_eq!(total.cents(), 2_413_600);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Minor units per major unit.
pub const CENTS_PER_UNIT: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: reconciliation differences can be negative
/// - **Single field tuple struct**: serializes as a bare integer, so a
///   report written to JSON reads back without any rounding
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► OrderLine.unit_price ──► OrderLine.total
///                                                  │
///                         Table.discount ──► Table.total ──► Transaction.total
///                                                                  │
///                        CashierSession.initial_cash ──► expected cash at close
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// let beer = Money::from_cents(469_000);
    /// assert_eq!(beer.cents(), 469_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a whole number of major units.
    ///
    /// The seeded catalog and most manual inputs are whole amounts.
    ///
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(100).cents(), 10_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * CENTS_PER_UNIT)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    ///
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * CENTS_PER_UNIT - minor)
        } else {
            Money(major * CENTS_PER_UNIT + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / CENTS_PER_UNIT
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % CENTS_PER_UNIT).abs()
    }

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

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// let coke = Money::from_major(2350);
    /// assert_eq!(coke.multiply_quantity(3), Money::from_major(7050));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// [`Money::multiply_quantity`] returning `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Addition returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Subtraction returning `None` on overflow.
    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, returning `None` if any partial sum overflows.
    ///
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// let lines = [Money::from_cents(i64::MAX), Money::from_cents(1)];
    /// assert_eq!(Money::checked_sum(lines), None);
    /// assert_eq!(Money::checked_sum([Money::from_cents(2), Money::from_cents(3)]),
    ///            Some(Money::from_cents(5)));
    /// ```
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// Divides the amount into `parts` shares that add back up exactly.
    ///
    /// The remainder cents go to the first shares, one each.
    /// Returns an empty vector when `parts` is zero.
    ///
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// let shares = Money::from_cents(1000).split_even(3);
    /// assert_eq!(shares, vec![
    ///     Money::from_cents(334),
    ///     Money::from_cents(333),
    ///     Money::from_cents(333),
    /// ]);
    /// ```
    pub fn split_even(&self, parts: u32) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }

        let parts_i = i64::from(parts);
        let base = self.0.div_euclid(parts_i);
        let remainder = self.0.rem_euclid(parts_i);

        (0..parts_i)
            .map(|i| Money(if i < remainder { base + 1 } else { base }))
            .collect()
    }

    /// Amount as a floating point number of major units.
    ///
    /// Display only. Never feed the result back into a calculation.
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly formatting, e.g. `$10.99` or `-$5.00`.
///
/// The terminal formats with the configured currency symbol instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_and_parts() {
        let money = Money::from_major(14568);
        assert_eq!(money.cents(), 1_456_800);
        assert_eq!(money.major(), 14568);
        assert_eq!(money.minor(), 0);

        let odd = Money::from_cents(804_533);
        assert_eq!(odd.major(), 8045);
        assert_eq!(odd.minor(), 33);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_major(5).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-500).to_string(), "-$5.00");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let lines = [a, b, Money::from_cents(1)];
        assert_eq!(lines.iter().sum::<Money>().cents(), 1501);
        let empty: Vec<Money> = Vec::new();
        assert!(empty.into_iter().sum::<Money>().is_zero());
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Money::from_cents(i64::MAX / 2 + 1);

        assert_eq!(big.checked_multiply_quantity(2), None);
        assert_eq!(big.checked_add(big), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
        assert_eq!(
            Money::from_cents(700).checked_multiply_quantity(3),
            Some(Money::from_cents(2100))
        );
        assert_eq!(Money::checked_sum([big, big]), None);
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
    }

    #[test]
    fn test_split_even_adds_back_up() {
        let total = Money::from_major(24136);
        let shares = total.split_even(3);

        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].cents(), 804_534);
        assert_eq!(shares[1].cents(), 804_533);
        assert_eq!(shares[2].cents(), 804_533);
        assert_eq!(shares.iter().sum::<Money>(), total);
    }

    #[test]
    fn test_split_even_zero_parts() {
        assert!(Money::from_cents(100).split_even(0).is_empty());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!(Money::from_cents(-550).abs().cents(), 550);
    }

    #[test]
    fn test_serializes_as_integer_cents() {
        let json = serde_json::to_string(&Money::from_cents(-500)).unwrap();
        assert_eq!(json, "-500");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::from_cents(-500));
    }
}
