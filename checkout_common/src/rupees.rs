use std::{
    fmt::Display,
    ops::{Add, Mul, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

pub const INR_CURRENCY_CODE: &str = "INR";

//--------------------------------------      Rupees       -----------------------------------------------------------
/// An amount of Indian rupees, stored as an integer number of paise so that order totals never accumulate binary
/// floating point error. Conversions to and from the gateways' fractional-rupee representation happen at the edges
/// via [`Rupees::try_from_rupees`] and [`Rupees::to_rupees`].
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Rupees(i64);

impl Add for Rupees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Rupees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Scaling by a quantity, e.g. a line-item sub-total.
impl Mul<i64> for Rupees {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in paise: {0}")]
pub struct RupeesConversionError(String);

impl From<i64> for Rupees {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Rupees {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Rupees {}

impl Display for Rupees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rupees = self.0 as f64 / 100.0;
        write!(f, "₹{rupees:0.2}")
    }
}

impl Rupees {
    /// The amount in paise.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    /// Converts a fractional rupee amount (as the gateways express prices) into paise, rounding to the nearest
    /// paisa. Rejects NaN, infinities and amounts that overflow an i64 paise count.
    pub fn try_from_rupees(rupees: f64) -> Result<Self, RupeesConversionError> {
        if !rupees.is_finite() {
            return Err(RupeesConversionError(format!("{rupees} is not a finite amount")));
        }
        let paise = (rupees * 100.0).round();
        if paise.abs() > i64::MAX as f64 {
            return Err(RupeesConversionError(format!("{rupees} is too large to convert to paise")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(paise as i64))
    }

    /// The amount as a fractional rupee count, exact to the paisa.
    pub fn to_rupees(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

#[cfg(test)]
mod test {
    use super::Rupees;

    #[test]
    fn fractional_amounts_round_trip() {
        let price = Rupees::try_from_rupees(250.50).unwrap();
        assert_eq!(price.value(), 25050);
        assert_eq!(price.to_rupees(), 250.50);
    }

    #[test]
    fn sub_total_is_exact_to_two_decimals() {
        let price = Rupees::try_from_rupees(250.50).unwrap();
        let sub_total = price * 3;
        assert_eq!(sub_total.value(), 75150);
        assert_eq!(sub_total.to_rupees(), 751.50);
    }

    #[test]
    fn totals_add_and_subtract_in_paise() {
        let a = Rupees::from_rupees(500);
        let b = Rupees::try_from_rupees(0.50).unwrap();
        assert_eq!((a + b).value(), 50050);
        assert_eq!((a - b).value(), 49950);
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        assert!(Rupees::try_from_rupees(f64::NAN).is_err());
        assert!(Rupees::try_from_rupees(f64::INFINITY).is_err());
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Rupees::from(75150).to_string(), "₹751.50");
        assert_eq!(Rupees::from_rupees(500).to_string(), "₹500.00");
    }
}
