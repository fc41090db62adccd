use crate::error::{CustodyError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Basis-point denominator: 10_000 bps == 100%.
pub const BPS_SCALE: u16 = 10_000;

/// Represents a monetary value held in custody.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce domain-specific rules
/// and provide type safety for custody accounting.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// A non-negative amount attached to a proposed transfer or an escrow.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(CustodyError::Validation(
                "amount must not be negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Service fee on this amount at `rate_bps`, truncated toward zero.
    pub fn fee(&self, rate_bps: u16) -> Amount {
        Self::portion(self.0, rate_bps)
    }

    /// Remainder of this amount after deducting the fee at `rate_bps`.
    pub fn net_of_fee(&self, rate_bps: u16) -> Amount {
        Amount(self.0 - self.fee(rate_bps).0)
    }

    /// Share of this amount at `share_bps`, truncated toward zero.
    pub fn share(&self, share_bps: u16) -> Amount {
        Self::portion(self.0, share_bps)
    }

    fn portion(value: Decimal, bps: u16) -> Amount {
        Amount((value * Decimal::from(bps) / Decimal::from(BPS_SCALE)).floor())
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CustodyError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

// Only ever used to take a part out of its whole (fee out of an amount,
// a split share out of the net), so the result stays non-negative.
impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }
}

// Implement basic arithmetic for Balance to make it a usable Value Object
impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_arithmetic() {
        let b1 = Balance::new(dec!(10.0));
        let b2 = Balance::new(dec!(5.0));
        assert_eq!(b1 + b2, Balance::new(dec!(15.0)));
        assert_eq!(b1 - b2, Balance::new(dec!(5.0)));
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        // Zero-value transfers are representable; only negatives are rejected.
        assert!(Amount::new(dec!(0.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(CustodyError::Validation(_))
        ));
    }

    #[test]
    fn test_fee_truncates_toward_zero() {
        let amount = Amount::new(dec!(1000)).unwrap();
        assert_eq!(amount.fee(250), Amount::new(dec!(25)).unwrap());

        // 999 * 250 / 10000 = 24.975 -> 24
        let odd = Amount::new(dec!(999)).unwrap();
        assert_eq!(odd.fee(250), Amount::new(dec!(24)).unwrap());
        assert_eq!(odd.net_of_fee(250), Amount::new(dec!(975)).unwrap());
    }

    #[test]
    fn test_fee_and_net_conserve_amount() {
        for (value, rate) in [
            (dec!(1000), 250u16),
            (dec!(999), 250),
            (dec!(1), 9999),
            (dec!(12345), 1),
            (dec!(500), 0),
            (dec!(500), 10_000),
        ] {
            let amount = Amount::new(value).unwrap();
            let fee = amount.fee(rate);
            let net = amount.net_of_fee(rate);
            assert_eq!(fee.value() + net.value(), value, "rate {rate} on {value}");
        }
    }

    #[test]
    fn test_share_stays_within_net() {
        let net = Amount::new(dec!(975)).unwrap();
        let to_buyer = net.share(5000);
        // 975 * 5000 / 10000 = 487.5 -> 487
        assert_eq!(to_buyer, Amount::new(dec!(487)).unwrap());
        assert_eq!(net - to_buyer, Amount::new(dec!(488)).unwrap());
    }

    #[test]
    fn test_display_is_normalized() {
        let amount = Amount::new(dec!(975.00)).unwrap();
        assert_eq!(amount.to_string(), "975");
    }
}
