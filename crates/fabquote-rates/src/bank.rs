//! # Rate Bank
//!
//! The refreshable exchange-rate table behind the `RateProvider` seam.
//!
//! ## Refresh Flow
//! ```text
//! refresh(source)
//!      │
//!      ▼
//! source.fetch() ──────────── failure? old table stays, error returned
//!      │
//!      ▼
//! expand sheet to all ordered pairs (cross through the base currency)
//!      │
//!      ▼
//! one write lock: swap the WHOLE table + stamp fetched_at
//! ```
//!
//! Readers take a short read lock per lookup, so they see either the old
//! complete table or the new complete table, never a partial update.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use fabquote_core::error::{PricingError, PricingResult};
use fabquote_core::exchange::RateProvider;
use fabquote_core::money::Currency;

use crate::error::{RateError, RateResult};
use crate::source::{RateSheet, RateSource};

// =============================================================================
// Rate Bank
// =============================================================================

#[derive(Debug, Default)]
struct RateTable {
    rates: HashMap<(Currency, Currency), f64>,
    fetched_at: Option<DateTime<Utc>>,
}

/// Concurrently readable exchange-rate table with whole-table refresh.
///
/// New banks carry the house EUR->USD rate, so dollar quoting works before
/// the first refresh; every other pair needs a refresh or an explicit
/// `add_rate`.
pub struct RateBank {
    table: RwLock<RateTable>,
}

/// Fixed rate for U.S. business, available before any refresh.
const HOUSE_USD_RATE: f64 = 1.15;

impl RateBank {
    /// Bank seeded with the house EUR->USD rate and nothing else.
    pub fn new() -> Self {
        let mut rates = HashMap::new();
        rates.insert((Currency::EUR, Currency::USD), HOUSE_USD_RATE);
        RateBank {
            table: RwLock::new(RateTable {
                rates,
                fetched_at: None,
            }),
        }
    }

    /// Registers a single directional rate on the live table.
    ///
    /// For host-pinned overrides; a later refresh replaces it together
    /// with everything else.
    pub fn add_rate(&self, from: Currency, to: Currency, rate: f64) {
        let mut guard = self.write();
        guard.rates.insert((from, to), rate);
    }

    /// Replaces the entire table with a freshly fetched sheet.
    ///
    /// The sheet is expanded to every ordered currency pair by crossing
    /// through its base currency, then swapped in under one write lock.
    /// On any failure the existing table is left in place. Returns the
    /// number of pairs loaded.
    pub async fn refresh(&self, source: &dyn RateSource) -> RateResult<usize> {
        let sheet = source.fetch().await.map_err(|e| {
            warn!(error = %e, "rate refresh failed; keeping previous rates");
            e
        })?;

        let rates = expand_sheet(&sheet)?;
        let count = rates.len();

        let mut guard = self.write();
        *guard = RateTable {
            rates,
            fetched_at: Some(Utc::now()),
        };
        info!(pairs = count, base = %sheet.base, "exchange rates replaced");
        Ok(count)
    }

    /// Time of the last successful refresh, if any.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.read().fetched_at
    }

    /// Whether the table is older than `max_age` (or never refreshed).
    pub fn is_stale(&self, max_age: Duration) -> bool {
        match self.read().fetched_at {
            Some(at) => Utc::now() - at > max_age,
            None => true,
        }
    }

    /// Number of loaded ordered pairs.
    pub fn pair_count(&self) -> usize {
        self.read().rates.len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RateTable> {
        // A poisoned lock still holds a complete table; keep serving it.
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RateTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RateBank {
    fn default() -> Self {
        RateBank::new()
    }
}

impl RateProvider for RateBank {
    fn rate(&self, from: Currency, to: Currency) -> PricingResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        self.read()
            .rates
            .get(&(from, to))
            .copied()
            .ok_or(PricingError::UnknownRate { from, to })
    }
}

// =============================================================================
// Sheet Expansion
// =============================================================================

/// Expands base-relative quotes to every ordered pair. Unparseable codes
/// and non-positive quotes are dropped with a warning; a sheet with no
/// usable quote is rejected outright.
fn expand_sheet(sheet: &RateSheet) -> RateResult<HashMap<(Currency, Currency), f64>> {
    let mut quotes: Vec<(Currency, f64)> = vec![(sheet.base, 1.0)];
    for (code, rate) in &sheet.rates {
        let currency = match Currency::from_code(code) {
            Ok(c) => c,
            Err(_) => {
                warn!(code = %code, "dropping quote with invalid currency code");
                continue;
            }
        };
        if !rate.is_finite() || *rate <= 0.0 {
            warn!(code = %code, rate, "dropping non-positive quote");
            continue;
        }
        if currency != sheet.base {
            quotes.push((currency, *rate));
        }
    }

    if quotes.len() < 2 {
        return Err(RateError::Sheet("no usable quotes".to_string()));
    }

    let mut rates = HashMap::new();
    for &(from, from_rate) in &quotes {
        for &(to, to_rate) in &quotes {
            if from != to {
                rates.insert((from, to), to_rate / from_rate);
            }
        }
    }
    debug!(currencies = quotes.len(), pairs = rates.len(), "expanded rate sheet");
    Ok(rates)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticRateSource;
    use async_trait::async_trait;
    use std::sync::Arc;

    use fabquote_core::pricing::PricingEngine;
    use fabquote_core::types::{Dimension, PriceParams};

    fn sheet(json: &str) -> RateSheet {
        serde_json::from_str(json).unwrap()
    }

    struct FailingSource;

    #[async_trait]
    impl RateSource for FailingSource {
        async fn fetch(&self) -> RateResult<RateSheet> {
            Err(RateError::Sheet("unreachable".to_string()))
        }
    }

    #[test]
    fn test_new_bank_has_house_usd_rate_only() {
        let bank = RateBank::new();
        assert_eq!(bank.rate(Currency::EUR, Currency::USD).unwrap(), 1.15);
        assert!(bank.rate(Currency::USD, Currency::EUR).is_err());
        assert_eq!(bank.fetched_at(), None);
        assert_eq!(bank.pair_count(), 1);
    }

    #[test]
    fn test_same_currency_is_identity() {
        let bank = RateBank::new();
        assert_eq!(bank.rate(Currency::EUR, Currency::EUR).unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_refresh_replaces_whole_table() {
        let bank = RateBank::new();
        let source = StaticRateSource::new(sheet(
            r#"{ "base": "EUR", "rates": { "USD": 1.1, "GBP": 0.85 } }"#,
        ));

        let pairs = bank.refresh(&source).await.unwrap();
        assert_eq!(pairs, 6); // 3 currencies, every ordered pair

        // The house rate was replaced along with everything else.
        assert_eq!(bank.rate(Currency::EUR, Currency::USD).unwrap(), 1.1);

        let gbp = Currency::from_code("GBP").unwrap();
        assert!((bank.rate(Currency::USD, Currency::EUR).unwrap() - 1.0 / 1.1).abs() < 1e-12);
        assert!((bank.rate(gbp, Currency::USD).unwrap() - 1.1 / 0.85).abs() < 1e-12);
        assert!(bank.fetched_at().is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_rates() {
        let bank = RateBank::new();
        let result = bank.refresh(&FailingSource).await;
        assert!(result.is_err());

        assert_eq!(bank.rate(Currency::EUR, Currency::USD).unwrap(), 1.15);
        assert_eq!(bank.fetched_at(), None);
    }

    #[tokio::test]
    async fn test_refresh_drops_junk_quotes() {
        let bank = RateBank::new();
        let source = StaticRateSource::new(sheet(
            r#"{ "base": "EUR", "rates": { "USD": 1.1, "US1": 2.0, "GBP": -4.0 } }"#,
        ));

        let pairs = bank.refresh(&source).await.unwrap();
        assert_eq!(pairs, 2); // only EUR<->USD survived
    }

    #[tokio::test]
    async fn test_refresh_rejects_unusable_sheet() {
        let bank = RateBank::new();
        let source = StaticRateSource::new(sheet(r#"{ "base": "EUR", "rates": {} }"#));

        assert!(matches!(
            bank.refresh(&source).await,
            Err(RateError::Sheet(_))
        ));
        // Table untouched.
        assert_eq!(bank.rate(Currency::EUR, Currency::USD).unwrap(), 1.15);
    }

    #[tokio::test]
    async fn test_staleness() {
        let bank = RateBank::new();
        assert!(bank.is_stale(Duration::hours(1)));

        let source =
            StaticRateSource::new(sheet(r#"{ "base": "EUR", "rates": { "USD": 1.1 } }"#));
        bank.refresh(&source).await.unwrap();
        assert!(!bank.is_stale(Duration::hours(1)));
    }

    #[test]
    fn test_add_rate_override() {
        let bank = RateBank::new();
        let cad = Currency::from_code("CAD").unwrap();
        bank.add_rate(Currency::EUR, cad, 1.47);
        assert_eq!(bank.rate(Currency::EUR, cad).unwrap(), 1.47);
    }

    #[tokio::test]
    async fn test_bank_drives_the_pricing_engine() {
        let bank = Arc::new(RateBank::new());
        let source = StaticRateSource::new(sheet(
            r#"{ "base": "EUR", "rates": { "USD": 1.1, "GBP": 0.85 } }"#,
        ));
        bank.refresh(&source).await.unwrap();

        let engine = PricingEngine::with_defaults(bank);
        let gbp = Currency::from_code("GBP").unwrap();
        let params = PriceParams {
            dimension: Some(Dimension::Area(100.0)),
            currency: Some(gbp),
            ..PriceParams::default()
        };

        // Stencil minimum 1084 EUR cents * 0.85.
        let quote = engine.price(103, &params).unwrap();
        assert_eq!(quote.currency(), gbp);
        assert_eq!(quote.cents(), 921);
    }
}
