//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! In floating point:  0.1 + 0.2 = 0.30000000000000004
//!
//! OUR SOLUTION: integer minor units (cents), tagged with a currency.
//! Curve and power-law math stays in f64 internally, but every formula
//! rounds exactly once at the point it constructs a Money value. No
//! fractional cent ever crosses a function boundary.
//! ```
//!
//! ## Usage
//! ```rust
//! use fabquote_core::money::{Currency, Money};
//!
//! let price = Money::new(1084, Currency::EUR); // 10.84 EUR
//! let doubled = price * 2i64;
//! assert_eq!(doubled.cents(), 2168);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Mul;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult, ValidationError, ValidationResult};
use crate::exchange::RateProvider;

// =============================================================================
// Currency
// =============================================================================

/// ISO 4217 currency code, stored as three ASCII uppercase letters.
///
/// Copy-sized so `Money` stays a plain value type. Serialized as a plain
/// string ("EUR") for JSON payloads and TS bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    /// Euro, the base currency all catalog prices are expressed in.
    pub const EUR: Currency = Currency(*b"EUR");

    /// U.S. dollar.
    pub const USD: Currency = Currency(*b"USD");

    /// Parses a three-letter code, normalizing to uppercase.
    ///
    /// ## Example
    /// ```rust
    /// use fabquote_core::money::Currency;
    ///
    /// assert_eq!(Currency::from_code("usd").unwrap(), Currency::USD);
    /// assert!(Currency::from_code("EURO").is_err());
    /// ```
    pub fn from_code(code: &str) -> ValidationResult<Self> {
        let code = code.trim();
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency(code.to_string()));
        }
        Ok(Currency([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    /// Returns the code as a string slice.
    pub fn code(&self) -> &str {
        // Invariant: constructors only admit ASCII letters.
        std::str::from_utf8(&self.0).expect("currency codes are ASCII")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::from_code(&code).map_err(de::Error::custom)
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents), tagged with its
/// currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for credits and corrections
/// - **Currency tag**: arithmetic across currencies is a typed error, not
///   a silent mix
/// - **Immutable**: conversion returns a new value, never mutates
///
/// All catalog prices are expressed in [`Currency::EUR`]; conversion to the
/// requested display currency is the terminal step of every quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money {
    cents: i64,
    #[ts(type = "string")]
    currency: Currency,
}

impl Money {
    /// Creates a Money value from minor units. Exact, no rounding.
    #[inline]
    pub const fn new(cents: i64, currency: Currency) -> Self {
        Money { cents, currency }
    }

    /// Zero in the given currency.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money { cents: 0, currency }
    }

    /// Creates a Money value from major units (e.g. euros), rounding half
    /// away from zero to the nearest minor unit.
    ///
    /// Rounding policy is fixed, not caller-configurable: 0.005 -> 1 cent,
    /// -0.005 -> -1 cent.
    ///
    /// ## Example
    /// ```rust
    /// use fabquote_core::money::{Currency, Money};
    ///
    /// assert_eq!(Money::from_major(10.836, Currency::EUR).cents(), 1084);
    /// ```
    #[inline]
    pub fn from_major(amount: f64, currency: Currency) -> Self {
        Money {
            cents: (amount * 100.0).round() as i64,
            currency,
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the currency tag.
    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Adds two amounts of the same currency.
    ///
    /// Fails with [`PricingError::CurrencyMismatch`] if the tags differ;
    /// amounts are never mixed implicitly.
    pub fn checked_add(self, other: Money) -> PricingResult<Money> {
        if self.currency != other.currency {
            return Err(PricingError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(Money::new(self.cents + other.cents, self.currency))
    }

    /// Folds a sequence of amounts left-to-right with [`Money::checked_add`],
    /// starting from zero in the given currency.
    pub fn sum<I>(currency: Currency, amounts: I) -> PricingResult<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(currency), Money::checked_add)
    }

    /// Multiplies by a real scalar, rounding at the point of scaling.
    ///
    /// Rounding happens here, not deferred, so repeated scaling cannot
    /// accumulate fractional-cent drift.
    #[inline]
    pub fn scale(self, factor: f64) -> Money {
        Money::new((self.cents as f64 * factor).round() as i64, self.currency)
    }

    /// Converts to the target currency through the given rate provider.
    ///
    /// Identity when the target equals the current currency. Fails with
    /// [`PricingError::UnknownRate`] when the pair is not loaded; the
    /// caller may refresh the rate bank and retry the whole request.
    pub fn convert(self, target: Currency, rates: &dyn RateProvider) -> PricingResult<Money> {
        if self.currency == target {
            return Ok(self);
        }
        let rate = rates.rate(self.currency, target)?;
        Ok(Money::new(
            (self.cents as f64 * rate).round() as i64,
            target,
        ))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display: "10.84 EUR".
///
/// Frontend formatting owns localization; this is for logs and tests.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02} {}",
            sign,
            (self.cents / 100).abs(),
            (self.cents % 100).abs(),
            self.currency
        )
    }
}

/// Ordering is only defined within one currency; comparing across
/// currencies yields `None` rather than an arbitrary answer.
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency == other.currency {
            Some(self.cents.cmp(&other.cents))
        } else {
            None
        }
    }
}

/// Multiplication by an integer quantity. Exact, no rounding involved.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money::new(self.cents * qty, self.currency)
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money::new(self.cents * qty as i64, self.currency)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
