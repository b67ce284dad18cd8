//! Monetary amounts kept as integer minor units.

use serde::{Deserialize, Serialize};

/// A budget amount.
///
/// Stored at rest as integer cents; views and inputs work in major units
/// (pesos). Serializes as major units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Largest accepted amount in major units. Cents stay exact in an `f64`
    /// well past this bound.
    pub const MAX_MAJOR: f64 = 1_000_000_000_000.0;

    /// Builds an amount from major units, rounding to the nearest cent.
    ///
    /// ```rust
    /// use planning_core::models::Money;
    ///
    /// let budget = Money::from_major(1500.50);
    /// assert_eq!(budget.minor(), 150050);
    /// assert_eq!(budget.major(), 1500.5);
    /// ```
    pub fn from_major(amount: f64) -> Self {
        Self {
            cents: (amount * 100.0).round() as i64,
        }
    }

    /// Builds an amount from stored minor units.
    pub fn from_minor(cents: i64) -> Self {
        Self { cents }
    }

    /// Amount in minor units (cents), the persisted representation.
    pub fn minor(&self) -> i64 {
        self.cents
    }

    /// Amount in major units.
    pub fn major(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl From<f64> for Money {
    fn from(amount: f64) -> Self {
        Self::from_major(amount)
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> Self {
        money.major()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_round_trip_through_cents() {
        let money = Money::from_major(1500.50);
        assert_eq!(money.minor(), 150050);
        assert_eq!(Money::from_minor(150050).major(), 1500.5);
    }

    #[test]
    fn test_sub_cent_amounts_round_to_nearest() {
        assert_eq!(Money::from_major(0.006).minor(), 1);
        assert_eq!(Money::from_major(19.994).minor(), 1999);
    }

    #[test]
    fn test_serializes_as_major_units() {
        let json = serde_json::to_string(&Money::from_minor(1050)).unwrap();
        assert_eq!(json, "10.5");
        let back: Money = serde_json::from_str("10.5").unwrap();
        assert_eq!(back.minor(), 1050);
    }
}
