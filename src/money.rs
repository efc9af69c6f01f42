//! Exact monetary amounts stored as integer minor units (cents).
//!
//! Amounts arrive from clients as either JSON numbers or strings, e.g. `120.5`
//! or `"120.50"`, and are always sent back as strings with two decimal places.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Error;

/// The number of decimal places kept for an amount of money.
const MINOR_UNIT_SCALE: u32 = 2;

/// An amount of money in cents.
///
/// Arithmetic on [Money] is exact, so sums of many transactions never pick up
/// floating point drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero dollars.
    pub const ZERO: Money = Money(0);

    /// The largest amount accepted for a single transaction, goal or investment,
    /// one hundred billion dollars.
    pub const MAX: Money = Money(10_000_000_000_000);

    /// Create an amount from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Convert a decimal amount of dollars to [Money].
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `value` has more than two decimal
    /// places or its magnitude is greater than [Money::MAX].
    pub fn from_decimal(value: Decimal) -> Result<Self, Error> {
        let mut normalized = value.normalize();

        if normalized.scale() > MINOR_UNIT_SCALE {
            return Err(Error::InvalidAmount(value.to_string()));
        }

        normalized.rescale(MINOR_UNIT_SCALE);

        i64::try_from(normalized.mantissa())
            .ok()
            .map(Self)
            .filter(|amount| amount.0.unsigned_abs() <= Self::MAX.0.unsigned_abs())
            .ok_or_else(|| Error::InvalidAmount(value.to_string()))
    }

    /// The amount in dollars as an exact decimal.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }

    /// The amount in dollars as a float, for display purposes only.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the amount is greater than [Money::MAX].
    pub const fn exceeds_max(self) -> bool {
        self.0 > Self::MAX.0
    }

    /// Whether the amount is less than zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value =
            Decimal::from_str(s.trim()).map_err(|_| Error::InvalidAmount(s.trim().to_owned()))?;

        Money::from_decimal(value)
    }
}

// Sums saturate at the i64 bounds instead of wrapping around.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
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
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;

        Money::from_decimal(value).map_err(de::Error::custom)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Money)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use crate::{Error, Money};

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(Money::from_str("120.50"), Ok(Money::from_cents(12_050)));
        assert_eq!(Money::from_str("120.5"), Ok(Money::from_cents(12_050)));
        assert_eq!(Money::from_str("95"), Ok(Money::from_cents(9_500)));
        assert_eq!(Money::from_str(" 0.01 "), Ok(Money::from_cents(1)));
    }

    #[test]
    fn trailing_zeros_do_not_count_as_extra_precision() {
        assert_eq!(Money::from_str("10.5000"), Ok(Money::from_cents(1_050)));
    }

    #[test]
    fn rejects_more_than_two_decimal_places() {
        assert_eq!(
            Money::from_str("12.345"),
            Err(Error::InvalidAmount("12.345".to_owned()))
        );
    }

    #[test]
    fn rejects_amounts_above_max() {
        assert_eq!(Money::from_str("100000000000.00"), Ok(Money::MAX));
        assert_eq!(
            Money::from_str("100000000000.01"),
            Err(Error::InvalidAmount("100000000000.01".to_owned()))
        );
        assert!(matches!(
            Money::from_str("92233720368547758.07"),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            Money::from_str("-100000000000.01"),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn addition_saturates_instead_of_overflowing() {
        let huge = Money::from_cents(i64::MAX - 1);

        assert_eq!(huge + huge, Money::from_cents(i64::MAX));
        assert_eq!(
            Money::from_cents(i64::MIN) - Money::from_cents(1),
            Money::from_cents(i64::MIN)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Money::from_str("twelve"),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn displays_two_decimal_places() {
        assert_eq!(Money::from_cents(12_050).to_string(), "120.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
        assert_eq!(Money::from_cents(-725).to_string(), "-7.25");
    }

    #[test]
    fn sum_is_exact() {
        let amounts = vec![Money::from_cents(10); 10];

        let total: Money = amounts.iter().sum();

        assert_eq!(total, Money::from_cents(100));
        assert_eq!(total.to_decimal(), Decimal::ONE);
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let from_number: Money = serde_json::from_str("120.5").unwrap();
        let from_string: Money = serde_json::from_str("\"120.50\"").unwrap();
        let from_integer: Money = serde_json::from_str("3").unwrap();

        assert_eq!(from_number, Money::from_cents(12_050));
        assert_eq!(from_string, Money::from_cents(12_050));
        assert_eq!(from_integer, Money::from_cents(300));
    }

    #[test]
    fn deserialize_rejects_extra_precision() {
        assert!(serde_json::from_str::<Money>("\"1.001\"").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Money::from_cents(4_500)).unwrap();

        assert_eq!(json, "\"45.00\"");
    }
}
