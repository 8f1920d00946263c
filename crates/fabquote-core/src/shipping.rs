//! # Shipping Rate Table
//!
//! Flat tracked/express prices per country tier. Destination countries are
//! grouped into tiers; the home country has its own domestic tier outside
//! the general ladder, and unknown or missing destinations fall back to a
//! configured default tier.
//!
//! The table is configuration data, not computed logic: hosts may load a
//! TOML document; the built-in default covers the published rates.
//!
//! ```toml
//! home = "DE"
//! default_tier = "world"
//!
//! [tiers.domestic]
//! tracked = 0
//! express = 995
//!
//! [tiers.eu]
//! tracked = 0
//! express = 1500
//!
//! [tiers.world]
//! tracked = 450
//! express = 2500
//!
//! [countries]
//! AT = "eu"
//! US = "world"
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{PricingError, PricingResult};
use crate::types::CountryCode;

// =============================================================================
// Shipping Rate
// =============================================================================

/// Net prices for one tier, in minor units of the base currency.
///
/// A zero price is a valid business rule (free tracked shipping), not an
/// error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingRate {
    pub tracked_cents: i64,
    pub express_cents: i64,
}

// =============================================================================
// Shipping Table
// =============================================================================

/// Resolved country -> rate table. Loaded once, read-only thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingTable {
    home: CountryCode,
    domestic: ShippingRate,
    fallback: ShippingRate,
    by_country: BTreeMap<CountryCode, ShippingRate>,
}

impl ShippingTable {
    /// Rates for a destination. The home country always resolves to the
    /// domestic tier; a missing or unmapped country resolves to the
    /// fallback tier.
    pub fn lookup(&self, country: Option<CountryCode>) -> &ShippingRate {
        match country {
            None => &self.fallback,
            Some(c) if c == self.home => &self.domestic,
            Some(c) => self.by_country.get(&c).unwrap_or(&self.fallback),
        }
    }

    /// The configured home country.
    pub fn home(&self) -> CountryCode {
        self.home
    }

    /// Parses and validates a TOML shipping-rate document.
    ///
    /// Rejected documents: unknown tier references, malformed country
    /// codes, negative prices, or a missing `domestic` tier.
    pub fn from_toml_str(doc: &str) -> PricingResult<ShippingTable> {
        let raw: RawTable =
            toml::from_str(doc).map_err(|e| PricingError::ShippingConfig(e.to_string()))?;

        let home = CountryCode::from_code(&raw.home)
            .map_err(|e| PricingError::ShippingConfig(e.to_string()))?;

        let mut tiers = BTreeMap::new();
        for (name, rate) in &raw.tiers {
            if rate.tracked < 0 || rate.express < 0 {
                return Err(PricingError::ShippingConfig(format!(
                    "tier '{name}' has a negative price"
                )));
            }
            tiers.insert(
                name.as_str(),
                ShippingRate {
                    tracked_cents: rate.tracked,
                    express_cents: rate.express,
                },
            );
        }

        let domestic = *tiers.get("domestic").ok_or_else(|| {
            PricingError::ShippingConfig("missing 'domestic' tier".to_string())
        })?;
        let fallback = *tiers.get(raw.default_tier.as_str()).ok_or_else(|| {
            PricingError::ShippingConfig(format!("unknown default tier '{}'", raw.default_tier))
        })?;

        let mut by_country = BTreeMap::new();
        for (code, tier) in &raw.countries {
            let country = CountryCode::from_code(code)
                .map_err(|e| PricingError::ShippingConfig(e.to_string()))?;
            let rate = tiers.get(tier.as_str()).ok_or_else(|| {
                PricingError::ShippingConfig(format!("country {code} maps to unknown tier '{tier}'"))
            })?;
            by_country.insert(country, *rate);
        }

        Ok(ShippingTable {
            home,
            domestic,
            fallback,
            by_country,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawTable {
    home: String,
    default_tier: String,
    tiers: BTreeMap<String, RawRate>,
    #[serde(default)]
    countries: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawRate {
    tracked: i64,
    express: i64,
}

// =============================================================================
// Published Default Rates
// =============================================================================

const EU_COUNTRIES: &[[u8; 2]] = &[
    *b"AT", *b"BE", *b"BG", *b"CY", *b"CZ", *b"DK", *b"EE", *b"ES", *b"FI", *b"FR", *b"GR",
    *b"HR", *b"HU", *b"IE", *b"IT", *b"LT", *b"LU", *b"LV", *b"MT", *b"NL", *b"PL", *b"PT",
    *b"RO", *b"SE", *b"SI", *b"SK",
];

const TRACKED_WORLD_COUNTRIES: &[[u8; 2]] = &[
    *b"AU", *b"CA", *b"CH", *b"GB", *b"JP", *b"NO", *b"US",
];

impl Default for ShippingTable {
    fn default() -> Self {
        let eu = ShippingRate {
            tracked_cents: 0,
            express_cents: 1500,
        };
        let world = ShippingRate {
            tracked_cents: 450,
            express_cents: 2500,
        };

        let mut by_country = BTreeMap::new();
        for code in EU_COUNTRIES {
            by_country.insert(CountryCode::from_bytes(*code), eu);
        }
        for code in TRACKED_WORLD_COUNTRIES {
            by_country.insert(CountryCode::from_bytes(*code), world);
        }

        ShippingTable {
            home: CountryCode::from_bytes(*b"DE"),
            domestic: ShippingRate {
                tracked_cents: 0,
                express_cents: 995,
            },
            fallback: world,
            by_country,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
