//! # Exchange Rate Seam
//!
//! The pricing engine never fetches rates itself; it is handed a
//! [`RateProvider`]. The refreshable, remote-backed bank lives in the
//! `fabquote-rates` crate. [`FixedRates`] here covers hosts that pin their
//! own rates and the test suites of both crates.

use std::collections::HashMap;

use crate::error::{PricingError, PricingResult};
use crate::money::Currency;

// =============================================================================
// RateProvider Trait
// =============================================================================

/// Multiplicative exchange-rate lookup.
///
/// `rate(from, to)` returns the factor that converts minor units of `from`
/// into minor units of `to`. Implementations must be safe for concurrent
/// reads; pricing runs in parallel with no coordination.
pub trait RateProvider: Send + Sync {
    /// Looks up the rate for a currency pair.
    ///
    /// Same-currency lookups return 1.0. An unloaded pair is
    /// [`PricingError::UnknownRate`], never a guessed value.
    fn rate(&self, from: Currency, to: Currency) -> PricingResult<f64>;
}

// =============================================================================
// FixedRates
// =============================================================================

/// An immutable-after-setup rate table.
///
/// ## Example
/// ```rust
/// use fabquote_core::exchange::{FixedRates, RateProvider};
/// use fabquote_core::money::Currency;
///
/// let mut rates = FixedRates::new();
/// rates.add_rate(Currency::EUR, Currency::USD, 1.15);
/// assert_eq!(rates.rate(Currency::EUR, Currency::USD).unwrap(), 1.15);
/// ```
#[derive(Debug, Default, Clone)]
pub struct FixedRates {
    rates: HashMap<(Currency, Currency), f64>,
}

impl FixedRates {
    /// Creates an empty table. Every cross-currency lookup fails until
    /// rates are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a directional rate, replacing any previous value for the
    /// pair. The inverse direction is NOT derived; register it explicitly
    /// if needed.
    pub fn add_rate(&mut self, from: Currency, to: Currency, rate: f64) -> &mut Self {
        self.rates.insert((from, to), rate);
        self
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// True when no pairs are registered.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl RateProvider for FixedRates {
    fn rate(&self, from: Currency, to: Currency) -> PricingResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        self.rates
            .get(&(from, to))
            .copied()
            .ok_or(PricingError::UnknownRate { from, to })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
