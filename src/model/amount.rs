//! Amount type for handling monetary values with optional dollar signs.
//!
//! This module provides the `Amount` type which wraps `Decimal`. It parses user input that may
//! or may not include a dollar sign and commas, and it is stored on disk as a plain JSON number.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Represents a dollar amount.
///
/// Amounts always display with a dollar sign, thousands separators and two decimal places.
/// Equality and ordering are numeric, so `4.5` and `4.50` are the same amount.
///
/// # Examples
///
/// Parsing with dollar sign:
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$4.5").unwrap();
/// assert_eq!(amount.to_string(), "$4.50");
/// ```
///
/// Parsing with commas:
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("1,250").unwrap();
/// let b = Amount::from_str("$1250.00").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "$1,250.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// The largest amount a single expense may have, $1,000,000,000,000.00.
    ///
    /// Up to here every amount with cents is exact as a JSON number, and the decimal text of the
    /// number always parses back.
    pub const MAX: Amount = Amount(Decimal::from_parts(3_567_587_328, 232, 0, false, 0));

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the amount is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Adds two amounts, returning `None` if the sum is out of range.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// The amount exactly as it reads back from the data file.
    ///
    /// The file holds amounts as JSON numbers, so anything finer than an `f64` carries is
    /// dropped. Storing this value keeps the in-memory record identical to the reloaded one.
    pub fn to_stored(self) -> Result<Amount, AmountError> {
        Self::from_number(self.to_number()?)
    }

    /// The nearest `f64`. Parsing the decimal text rounds correctly, which keeps `to_stored`
    /// stable when applied twice.
    fn to_number(self) -> Result<f64, AmountError> {
        let text = self.0.to_string();
        text.parse::<f64>().map_err(|_| AmountError::NotANumber(text))
    }

    /// Reads a JSON number through its shortest round-trip text, so 4.5 stays 4.5 instead of
    /// 4.4999999999999996447286321199499070644378662109375.
    fn from_number(n: f64) -> Result<Amount, AmountError> {
        Amount::from_str(&n.to_string())
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmountError {
    #[error("An amount is required")]
    Empty,
    #[error("'{input}' is not a valid amount: {source}")]
    Invalid {
        input: String,
        source: rust_decimal::Error,
    },
    #[error("{0} cannot be written as a JSON number")]
    NotANumber(String),
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        // "-$50.00", "$50.00" and "50.00" are all accepted
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else {
            trimmed.strip_prefix('$').unwrap_or(trimmed).to_string()
        };

        let without_commas = without_dollar.replace(',', "");
        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(|source| AmountError::Invalid {
                input: trimmed.to_string(),
                source,
            })?;
        Ok(Amount(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().round_dp(2).to_f64().unwrap_or_default();
        write!(f, "{sign}${}", format_num::format_num!(",.2", num))
    }
}

/// Saturates at the bounds of `Decimal` instead of panicking. Use `checked_add` to detect it.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The data file stores amounts as JSON numbers
        let n = self.to_number().map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(n)
    }
}

/// Amounts are written as numbers, but hand-edited files may carry strings like `"$4.50"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => Amount::from_number(n),
            RawAmount::Text(s) => Amount::from_str(&s),
        }
        .map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
