//! Money is carried as integer **cents** (`i64`), the convention of the
//! vendor APIs this platform ingests (Stripe, Square). Negative amounts are
//! outflows on bank feeds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// An amount of money in minor units (cents).
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Self = Self(0);

    /// Builds an amount from whole dollars.
    #[must_use]
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    #[must_use]
    pub const fn is_outflow(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Saturating sum, so a corrupt import cannot panic an aggregation.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Cents {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Cents {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for Cents {
    /// Renders as a dollar string, e.g. `-1234` → `-$12.34`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Cents {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_and_sign() {
        let a = Cents::from_dollars(12) + Cents(34);
        assert_eq!(a, Cents(1234));
        assert!((-a).is_outflow());
        assert_eq!((-a).abs(), a);
        assert_eq!(a - Cents(234), Cents::from_dollars(10));
    }

    #[test]
    fn display_formats_dollars() {
        assert_eq!(Cents(1234).to_string(), "$12.34");
        assert_eq!(Cents(-5).to_string(), "-$0.05");
        assert_eq!(Cents::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&Cents(250)).unwrap();
        assert_eq!(json, "250");
        let back: Cents = serde_json::from_str("-99").unwrap();
        assert_eq!(back, Cents(-99));
    }
}
