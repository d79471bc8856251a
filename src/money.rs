//! Fixed-point money type with 2 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so that splitting,
//! aggregating and settling amounts is exact down to the cent.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::num::NonZeroUsize;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A monetary amount that always carries exactly 2 decimal places.
///
/// Values coming from outside are rounded half away from zero to the cent.
/// Arithmetic between two `Money` values is exact.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use homies_ledger::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Amounts closer than this to each other are treated as equal.
    pub const TOLERANCE: Self = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// Largest magnitude accepted from input: `i64::MAX` cents.
    pub const MAX: Self = Money(Decimal::from_parts(u32::MAX, i32::MAX as u32, 0, false, 2));

    /// Creates a new `Money` from a `Decimal`, rounding to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        normalized.rescale(Self::SCALE);
        if normalized.is_zero() {
            normalized.set_sign_positive(true);
        }
        Money(normalized)
    }

    /// Creates a value from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns `true` if this value is strictly above zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `true` if the magnitude does not exceed [`Money::MAX`].
    pub fn is_within_bounds(&self) -> bool {
        self.abs() <= Self::MAX
    }

    /// Adds, returning `None` instead of overflowing.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money::new)
    }

    /// Subtracts, returning `None` instead of overflowing.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Money::new)
    }

    /// Returns `true` if the value is strictly within [`Money::TOLERANCE`] of zero.
    pub fn is_negligible(&self) -> bool {
        self.abs() < Self::TOLERANCE
    }

    /// Returns `true` if `self` and `other` differ by at most [`Money::TOLERANCE`].
    ///
    /// Values too far apart to subtract are never equal.
    pub fn approx_eq(&self, other: Money) -> bool {
        self.checked_sub(other)
            .is_some_and(|diff| diff.abs() <= Self::TOLERANCE)
    }

    /// Divides into `parts` shares, rounding the share half away from zero.
    pub fn share_of(&self, parts: NonZeroUsize) -> Self {
        Money::new(self.0 / Decimal::from(parts.get()))
    }

    /// Multiplies by a whole count.
    pub fn times(&self, count: usize) -> Self {
        Money::new(self.0 * Decimal::from(count))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money::new(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", self.0))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}
