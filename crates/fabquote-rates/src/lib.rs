//! # fabquote-rates: Exchange-Rate Bank
//!
//! The I/O layer under fabquote-core's `RateProvider` seam: a concurrently
//! readable rate table fed by whole-sheet refreshes from a remote source.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fabquote_core::pricing::PricingEngine;
//! use fabquote_rates::{HttpRateSource, RateBank};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let bank = Arc::new(RateBank::new());
//! let source = HttpRateSource::new("https://rates.example.com/daily.json")?;
//! bank.refresh(&source).await?;
//!
//! let engine = PricingEngine::with_defaults(bank.clone());
//! # Ok(())
//! # }
//! ```
//!
//! Pricing keeps working on the previous table whenever a refresh fails;
//! staleness is observable through [`RateBank::fetched_at`].

pub mod bank;
pub mod error;
pub mod source;

pub use bank::RateBank;
pub use error::{RateError, RateResult};
pub use source::{HttpRateSource, RateSheet, RateSource, StaticRateSource};
