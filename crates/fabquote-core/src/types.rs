//! # Domain Types
//!
//! Request-side types for fabquote.
//!
//! ```text
//! PriceParams ── the per-call parameter bag (geometry, counts, currency)
//! Dimension   ── board/stencil geometry in three interchangeable shapes
//! CountryCode ── destination for shipping-tier lookup
//! SlaTier     ── delivery commitment (standard / blitz)
//! PanelClass  ── production-panel technology class
//! ```
//!
//! All of these deserialize straight from the shop's JSON payloads; the
//! engine consumes one `PriceParams` per quote and drops it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Currency;

// =============================================================================
// Dimension
// =============================================================================

/// Board or stencil geometry, in square millimeters.
///
/// Accepted in three equivalent JSON shapes, matching what the shop sends:
///
/// ```json
/// 1600                             // area
/// [40, 40]                         // width x height pair
/// { "width": 40, "height": 40 }    // named pair
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    /// Pre-computed area in mm².
    Area(f64),
    /// `[width, height]` in mm.
    Pair([f64; 2]),
    /// Named width/height in mm.
    Sides { width: f64, height: f64 },
}

impl Dimension {
    /// Resolves to an area in mm², validating positivity.
    pub fn area(&self) -> ValidationResult<f64> {
        let area = match *self {
            Dimension::Area(a) => a,
            Dimension::Pair([w, h]) => w * h,
            Dimension::Sides { width, height } => width * height,
        };
        crate::validation::validate_area(area)
    }
}

// =============================================================================
// Country Code
// =============================================================================

/// ISO 3166-1 alpha-2 country code, stored as two ASCII uppercase letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Builds a code from raw bytes. Callers must pass uppercase ASCII
    /// letters; used for compile-time tables.
    pub const fn from_bytes(code: [u8; 2]) -> Self {
        CountryCode(code)
    }

    /// Parses a two-letter code, normalizing to uppercase.
    pub fn from_code(code: &str) -> ValidationResult<Self> {
        let code = code.trim();
        let bytes = code.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCountry(code.to_string()));
        }
        Ok(CountryCode([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
        ]))
    }

    /// Returns the code as a string slice.
    pub fn code(&self) -> &str {
        // Invariant: constructors only admit ASCII letters.
        std::str::from_utf8(&self.0).expect("country codes are ASCII")
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for CountryCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        CountryCode::from_code(&code).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Service Level
// =============================================================================

/// Delivery speed commitment. Blitz jobs jump the production queue and
/// carry a catalog-defined surcharge multiplier on assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SlaTier {
    #[default]
    Standard,
    Blitz,
}

// =============================================================================
// Panel Class
// =============================================================================

/// Production-panel technology class, each with its own cost curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PanelClass {
    /// Standard two-layer panel.
    #[serde(rename = "pp-2l")]
    Pp2l,
    /// High-density two-layer panel.
    #[serde(rename = "pp-hd-2l")]
    PpHd2l,
    /// High-density four-layer panel.
    #[serde(rename = "pp-hd-4l")]
    PpHd4l,
}

// =============================================================================
// Price Parameters
// =============================================================================

/// The per-call parameter bag. Constructed per request, fully consumed by
/// one dispatch, never persisted.
///
/// Every field is optional at the type level; each formula demands the
/// fields it needs and fails with a typed error when they are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PriceParams {
    /// Board/stencil/panel geometry (three accepted shapes, see [`Dimension`]).
    #[ts(type = "number | [number, number] | { width: number; height: number } | null")]
    pub dimension: Option<Dimension>,

    /// Number of units ordered.
    pub quantity: Option<u32>,

    /// Panel rows.
    pub rows: Option<u32>,

    /// Panel columns.
    pub cols: Option<u32>,

    /// Copper layer count, for products that are not layer-specific by uid.
    pub layer_count: Option<u32>,

    /// Production-panel class.
    pub panel_class: Option<PanelClass>,

    /// SMD pad count on the top side.
    pub smd_pad_count_top: Option<u32>,

    /// SMD pad count on the bottom side. Nonzero implies double-sided
    /// assembly unless `double_sided` says otherwise.
    pub smd_pad_count_bottom: Option<u32>,

    /// Customer BOM total in minor units, for the sourcing markup.
    pub bom_price_cents: Option<i64>,

    /// Count of surface-mount parts per unit.
    pub part_smt_count: Option<u32>,

    /// Count of through-hole parts per unit.
    pub part_tht_count: Option<u32>,

    /// Count of distinct part types in the job.
    pub part_variance: Option<u32>,

    /// Count of distinct customer-supplied part types.
    pub customer_supplied_part_variance: Option<u32>,

    /// Explicit double-sided assembly flag.
    pub double_sided: Option<bool>,

    /// Shipping destination.
    #[ts(type = "string | null")]
    pub country: Option<CountryCode>,

    /// Requested display currency; engine default when absent.
    #[ts(type = "string | null")]
    pub currency: Option<Currency>,

    /// Service level.
    pub sla: Option<SlaTier>,
}

impl PriceParams {
    /// Resolves the dimension to a validated area in mm².
    pub fn require_area(&self) -> ValidationResult<f64> {
        match self.dimension {
            Some(dim) => dim.area(),
            None => Err(ValidationError::Required { field: "dimension" }),
        }
    }

    /// Returns the quantity, demanding a strictly positive value.
    pub fn require_quantity(&self) -> ValidationResult<u32> {
        crate::validation::validate_quantity(self.quantity)
    }

    /// Whether assembly runs on both board sides.
    pub fn is_double_sided(&self) -> bool {
        self.double_sided
            .unwrap_or_else(|| self.smd_pad_count_bottom.unwrap_or(0) > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
