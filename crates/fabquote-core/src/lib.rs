//! # fabquote-core: Pure Pricing Logic
//!
//! This crate is the heart of fabquote. It computes monetary quotes for
//! manufactured PCB products as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Host Application (shop)                     │
//! │     product pages ──► quote API ──► checkout ──► invoicing      │
//! └──────────────────────────────┬──────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼──────────────────────────────────┐
//! │                ★ fabquote-core (THIS CRATE) ★                   │
//! │                                                                 │
//! │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │
//! │   │  money  │ │ catalog │ │ pricing │ │ shipping │ │exchange│  │
//! │   │  Money  │ │ curves  │ │ engine  │ │  tiers   │ │ trait  │  │
//! │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │
//! │                                                                 │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │
//! └──────────────────────────────┬──────────────────────────────────┘
//!                                │ RateProvider
//! ┌──────────────────────────────▼──────────────────────────────────┐
//! │              fabquote-rates (exchange-rate bank)                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` in integer minor units, tagged with a currency
//! - [`catalog`] - versioned coefficient tables and the uid -> product map
//! - [`pricing`] - formula families and the dispatching `PricingEngine`
//! - [`shipping`] - country-tier shipping rates (configuration data)
//! - [`exchange`] - the `RateProvider` seam and a fixed-rate table
//! - [`error`] - typed domain errors
//! - [`types`] - request-side types (`PriceParams`, `Dimension`, ...)
//! - [`validation`] - parameter validators
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output; pricing never suspends
//! 2. **Integer money**: amounts live in minor units; formulas round once
//!    at the Money boundary
//! 3. **Coefficients are data**: price-list changes ship as catalog
//!    documents, not code changes
//! 4. **Typed errors**: a failure is never coerced into a zero price
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fabquote_core::exchange::FixedRates;
//! use fabquote_core::money::Currency;
//! use fabquote_core::pricing::PricingEngine;
//! use fabquote_core::types::{Dimension, PriceParams};
//!
//! let mut rates = FixedRates::new();
//! rates.add_rate(Currency::EUR, Currency::USD, 1.15);
//! let engine = PricingEngine::with_defaults(Arc::new(rates));
//!
//! let params = PriceParams {
//!     dimension: Some(Dimension::Pair([40.0, 40.0])),
//!     currency: Some(Currency::USD),
//!     ..PriceParams::default()
//! };
//! let quote = engine.price(105, &params).unwrap();
//! assert_eq!(quote.currency(), Currency::USD);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod exchange;
pub mod money;
pub mod pricing;
pub mod shipping;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, ProductKind};
pub use error::{PricingError, PricingResult, ValidationError};
pub use exchange::{FixedRates, RateProvider};
pub use money::{Currency, Money};
pub use pricing::PricingEngine;
pub use shipping::ShippingTable;
pub use types::{Dimension, PriceParams, SlaTier};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The currency every catalog price is expressed in. Quotes convert to the
/// requested display currency as their terminal step.
pub const DEFAULT_CURRENCY: Currency = Currency::EUR;
