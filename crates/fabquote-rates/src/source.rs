//! # Rate Sources
//!
//! Where rate sheets come from. A [`RateSource`] hands the bank one
//! complete document per fetch; the bank owns expansion and swapping.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use fabquote_core::money::Currency;

use crate::error::RateResult;

// =============================================================================
// Rate Sheet
// =============================================================================

/// One complete set of quotes against a base currency, as published by the
/// remote service:
///
/// ```json
/// { "base": "EUR", "rates": { "USD": 1.15, "GBP": 0.85 } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RateSheet {
    pub base: Currency,
    pub rates: std::collections::HashMap<String, f64>,
}

// =============================================================================
// RateSource Trait
// =============================================================================

/// A provider of complete rate sheets.
///
/// Fetches are one-shot and idempotent; the bank never retries on its own.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches a complete sheet, or fails without side effects.
    async fn fetch(&self) -> RateResult<RateSheet>;
}

// =============================================================================
// HTTP Source
// =============================================================================

/// Fetches a JSON rate sheet over HTTPS with a request timeout, so a hung
/// remote cannot wedge a refresh.
pub struct HttpRateSource {
    client: reqwest::Client,
    url: String,
}

impl HttpRateSource {
    /// Default 10-second request timeout.
    pub fn new(url: impl Into<String>) -> RateResult<Self> {
        Self::with_timeout(url, Duration::from_secs(10))
    }

    /// Source with an explicit request timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> RateResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpRateSource {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch(&self) -> RateResult<RateSheet> {
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        Ok(response.json::<RateSheet>().await?)
    }
}

// =============================================================================
// Static Source
// =============================================================================

/// A source that always returns the same sheet. For hosts that pin rates
/// and for tests.
pub struct StaticRateSource {
    sheet: RateSheet,
}

impl StaticRateSource {
    pub fn new(sheet: RateSheet) -> Self {
        StaticRateSource { sheet }
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    async fn fetch(&self) -> RateResult<RateSheet> {
        Ok(self.sheet.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
