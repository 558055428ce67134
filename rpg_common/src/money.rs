use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

pub const INR_CURRENCY_CODE: &str = "INR";
/// INR has a minor-unit exponent of 2: 100 paise to the rupee.
pub const INR_MINOR_UNITS_PER_RUPEE: i64 = 100;

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a currency amount: {0}")]
pub struct MoneyConversionError(pub String);

//--------------------------------------       Paise        -----------------------------------------------------------
/// An amount in the smallest INR currency unit. This is the unit the payment gateway reports in, both when creating
/// orders and in webhook payloads.
#[derive(Debug, Clone, Copy, Default, Type, PartialOrd, Ord, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Paise(i64);

impl Paise {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Converts a minor-unit amount to whole rupees, rounding to the nearest rupee.
    ///
    /// This conversion must be applied exactly once, at the point where a gateway-reported amount is stored. Amounts
    /// that are already in major units (e.g. the configured registration fee) must never pass through here.
    pub fn to_rupees(self) -> Rupees {
        Rupees((self.0 + INR_MINOR_UNITS_PER_RUPEE / 2).div_euclid(INR_MINOR_UNITS_PER_RUPEE))
    }
}

impl From<i64> for Paise {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Rupees> for Paise {
    fn from(value: Rupees) -> Self {
        Self(value.0 * INR_MINOR_UNITS_PER_RUPEE)
    }
}

impl TryFrom<u64> for Paise {
    type Error = MoneyConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(MoneyConversionError(format!("Value {value} is too large to convert to paise")))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl PartialEq for Paise {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Paise {}

impl Add for Paise {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Paise {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Paise {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for Paise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} paise", self.0)
    }
}

//--------------------------------------       Rupees       -----------------------------------------------------------
/// A whole-rupee amount. All persisted payment amounts are stored in this unit.
#[derive(Debug, Clone, Copy, Default, Type, PartialOrd, Ord, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Rupees(i64);

impl Rupees {
    pub fn value(&self) -> i64 {
        self.0
    }
}

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

impl Sum for Rupees {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for Rupees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{}", self.0)
    }
}
