//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Francs                                           │
//! │    The CFA franc has no minor unit, so every amount in the system is    │
//! │    a whole number of francs stored in an i64. No rounding, ever.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use boutique_core::money::Money;
//!
//! // Create from whole francs
//! let price = Money::from_francs(10_000); // 10 000 FCFA
//!
//! // Arithmetic operations
//! let pair = price * 2;                       // 20 000 FCFA
//! let total = pair + Money::from_francs(500); // 20 500 FCFA
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole CFA francs.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type:
/// `Product.price` → `CartLine` snapshot → `Order.total_amount` →
/// `OrderItem.unit_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole francs.
    ///
    /// ## Example
    /// ```rust
    /// use boutique_core::money::Money;
    ///
    /// let price = Money::from_francs(10_000);
    /// assert_eq!(price.francs(), 10_000);
    /// ```
    #[inline]
    pub const fn from_francs(francs: i64) -> Self {
        Money(francs)
    }

    /// Returns the value in francs.
    #[inline]
    pub const fn francs(&self) -> i64 {
        self.0
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

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use boutique_core::money::Money;
    ///
    /// let unit_price = Money::from_francs(2_500);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.francs(), 7_500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and receipts. Use frontend formatting for actual
/// UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{} FCFA", sign, group_thousands(self.0.unsigned_abs()))
    }
}

/// Groups digits by thousands with spaces: 1234567 → "1 234 567".
fn group_thousands(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut groups = Vec::new();
    while value > 0 {
        groups.push(value % 1000);
        value /= 1000;
    }

    let mut out = String::new();
    for (i, group) in groups.iter().rev().enumerate() {
        if i == 0 {
            out.push_str(&group.to_string());
        } else {
            out.push_str(&format!(" {:03}", group));
        }
    }
    out
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_francs() {
        let money = Money::from_francs(10_000);
        assert_eq!(money.francs(), 10_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_francs(10000)), "10 000 FCFA");
        assert_eq!(format!("{}", Money::from_francs(500)), "500 FCFA");
        assert_eq!(format!("{}", Money::from_francs(1234567)), "1 234 567 FCFA");
        assert_eq!(format!("{}", Money::from_francs(-2500)), "-2 500 FCFA");
        assert_eq!(format!("{}", Money::from_francs(0)), "0 FCFA");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_francs(1000);
        let b = Money::from_francs(500);

        assert_eq!((a + b).francs(), 1500);
        assert_eq!((a - b).francs(), 500);
        let result: Money = a * 3;
        assert_eq!(result.francs(), 3000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_francs(10_000);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.francs(), 20_000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_francs(100);
        assert!(positive.is_positive());

        let negative = Money::from_francs(-100);
        assert!(negative.is_negative());
    }
}
