//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(10, 2)` and travel over JSON as decimal
//! strings (`"14.99"`) so no precision is lost to floating point. Incoming
//! JSON may use either a string or a number.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price must not be negative (got {0})")]
    Negative(Decimal),

    #[error("price must have at most two decimal places (got {0})")]
    TooPrecise(Decimal),

    #[error("price must not exceed 99999999.99 (got {0})")]
    TooLarge(Decimal),
}

/// Largest amount a `NUMERIC(10, 2)` column holds.
// 9_999_999_999 split into 32-bit words, scale 2.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// A non-negative unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero,
    /// `PriceError::TooPrecise` if it has fractions of a cent (trailing zeros
    /// are fine), and `PriceError::TooLarge` above [`MAX_AMOUNT`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an integer number of cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents` is below zero, or
    /// `PriceError::TooLarge` above [`MAX_AMOUNT`].
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The amount in the currency's standard unit (dollars, not cents).
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

// Rows are trusted: the column carries a `CHECK (price >= 0)` constraint.
#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let err = Price::new(Decimal::new(-1, 2)).unwrap_err();
        assert_eq!(err, PriceError::Negative(Decimal::new(-1, 2)));
    }

    #[test]
    fn test_fractions_of_a_cent_rejected() {
        let err = Price::new(Decimal::new(1999, 3)).unwrap_err();
        assert_eq!(err, PriceError::TooPrecise(Decimal::new(1999, 3)));

        // "1.990" is just 1.99
        assert!(Price::new(Decimal::new(1990, 3)).is_ok());
    }

    #[test]
    fn test_amount_must_fit_the_column() {
        assert!(Price::new(MAX_AMOUNT).is_ok());
        assert_eq!(MAX_AMOUNT.to_string(), "99999999.99");

        let too_large = Decimal::new(100_000_000, 0);
        assert_eq!(
            Price::new(too_large).unwrap_err(),
            PriceError::TooLarge(too_large)
        );
    }

    #[test]
    fn test_out_of_range_prices_fail_deserialization() {
        assert!(serde_json::from_str::<Price>("\"1.999\"").is_err());
        assert!(serde_json::from_str::<Price>("\"100000000\"").is_err());
    }

    #[test]
    fn test_zero_price_allowed() {
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_price_serializes_as_string() {
        let price = Price::from_cents(1499).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"14.99\"");
    }

    #[test]
    fn test_price_deserializes_from_string_and_number() {
        let from_str: Price = serde_json::from_str("\"22.99\"").unwrap();
        let from_int: Price = serde_json::from_str("90").unwrap();
        assert_eq!(from_str, Price::from_cents(2299).unwrap());
        assert_eq!(from_int.amount(), Decimal::new(90, 0));
    }

    #[test]
    fn test_negative_price_fails_deserialization() {
        let result: Result<Price, _> = serde_json::from_str("\"-5.00\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_uses_two_decimal_places() {
        assert_eq!(Price::from_cents(900).unwrap().to_string(), "9.00");
    }
}
