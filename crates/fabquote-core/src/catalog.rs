//! # Product Catalog
//!
//! Coefficient tables for every formula family, plus the mapping from raw
//! shop product identifiers to product kinds.
//!
//! Pricing parameters change over time; each change ships as a complete
//! replacement catalog, never a runtime mutation. Everything here is plain
//! serde data so a revision is a data change, not a code change, and
//! historical parameter sets stay testable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::PanelClass;

// =============================================================================
// Coefficient Structs
// =============================================================================

/// One segment of a [`SegmentedCurve`]: a width along the size axis and the
/// per-mm slope charged inside it. `width: None` marks the final, unbounded
/// segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub width: Option<f64>,
    pub slope: f64,
}

/// Segmented linear cost curve over the square root of the area.
///
/// Fabrication gets cheaper per mm as boards grow: the size value is
/// consumed segment by segment, early segments carrying steeper slopes.
/// The summed cost is divided by `lot_size` (boards are produced in lots),
/// rounded once, then floored at `min_price_cents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedCurve {
    pub segments: Vec<Segment>,
    /// Units per production lot; the curve prices a lot, buyers pay per unit.
    pub lot_size: f64,
    /// Additive fixed fee on top of the curve.
    pub base_fee_cents: i64,
    /// Non-negotiable minimum order price.
    pub min_price_cents: i64,
}

/// One tier of a [`TieredFlat`] table: a fixed price for any area up to
/// `max_area` inclusive. `max_area: None` marks the catch-all tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatTier {
    pub max_area: Option<f64>,
    pub price_cents: i64,
}

/// Flat-rate pricing over disjoint inclusive area ranges. Tiers are ordered
/// by ascending `max_area`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredFlat {
    pub tiers: Vec<FlatTier>,
}

/// Linear area-rate pricing: `rate * area * quantity + setup`, optionally
/// reported per unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearAreaCurve {
    pub rate_cents_per_mm2: f64,
    pub setup_fee_cents: i64,
    pub per_unit: bool,
}

/// How a board layer-count category is priced. The active family changed
/// across catalog revisions, so it is data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum BoardPricing {
    Segmented(SegmentedCurve),
    Tiered(TieredFlat),
    LinearArea(LinearAreaCurve),
}

/// Power-law panel curve: `(a * 100^b) * eff_area^(1-b) + fix`, in major
/// units, per production batch. `a` and `b` capture economies of scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelCurve {
    pub a: f64,
    pub b: f64,
    pub fix: f64,
}

/// Markup on a customer-supplied BOM total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkupPricing {
    /// Service charge multiplier applied to the BOM total.
    pub multiplier: f64,
    /// Fixed handling fee added when any parts are sourced.
    pub handling_fee_cents: i64,
}

/// Cost components of one assembly production method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssemblyPath {
    pub setup_fee_cents: i64,
    /// Per surface-mount part, per unit.
    pub smt_part_cents: f64,
    /// Per through-hole part, per unit.
    pub tht_part_cents: f64,
    pub double_sided_surcharge_cents: i64,
    /// Per distinct part type in the job.
    pub variance_fee_cents: i64,
    /// Per distinct customer-supplied part type.
    pub customer_supplied_fee_cents: i64,
}

/// Assembly pricing strategy.
///
/// The two-path form quotes whichever of hand and machine assembly is
/// cheaper for the job. The single-path form replaced it in later
/// revisions: one additive formula, a minimum production lot, and a
/// service-level surcharge multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum AssemblyPricing {
    TwoPath {
        manual: AssemblyPath,
        automated: AssemblyPath,
    },
    SinglePath {
        path: AssemblyPath,
        /// Quantity is rounded up to this lot before per-unit math.
        min_lot: u32,
        /// Whole-cost multiplier for blitz service.
        blitz_multiplier: f64,
    },
}

// =============================================================================
// Product Kinds and the uid Table
// =============================================================================

/// What a product identifier resolves to. Raw uids are mapped to a kind
/// once at the dispatch boundary; formulas never see uids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductKind {
    Board { layer_count: u32 },
    Stencil,
    Panel,
    PartsMarkup,
    Assembly,
    /// Composite: board + sourced parts + stencil + assembly.
    AssembledBoard,
    TrackedShipping,
    ExpressShipping,
    FlatFee { cents: i64 },
}

/// An inclusive uid range bound to a product kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub first_uid: u32,
    pub last_uid: u32,
    pub kind: ProductKind,
}

impl CatalogEntry {
    /// Entry covering a single uid.
    pub const fn single(uid: u32, kind: ProductKind) -> Self {
        CatalogEntry {
            first_uid: uid,
            last_uid: uid,
            kind,
        }
    }

    /// Entry covering an inclusive uid range.
    pub const fn range(first_uid: u32, last_uid: u32, kind: ProductKind) -> Self {
        CatalogEntry {
            first_uid,
            last_uid,
            kind,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// One complete, active pricing parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// uid -> product kind table, checked in order.
    pub entries: Vec<CatalogEntry>,
    /// Board pricing per copper layer count. A layer count absent from the
    /// map prices at zero; that is catalog data absence, not an error.
    pub boards: BTreeMap<u32, BoardPricing>,
    pub stencil: SegmentedCurve,
    pub panels: BTreeMap<PanelClass, PanelCurve>,
    pub parts: MarkupPricing,
    pub assembly: AssemblyPricing,
}

impl Catalog {
    /// Resolves a raw product uid against the entry table.
    pub fn resolve(&self, uid: u32) -> Option<ProductKind> {
        self.entries
            .iter()
            .find(|e| e.first_uid <= uid && uid <= e.last_uid)
            .map(|e| e.kind)
    }
}

/// The active published price list.
impl Default for Catalog {
    fn default() -> Self {
        let entries = vec![
            CatalogEntry::range(71, 72, ProductKind::FlatFee { cents: 200 }),
            CatalogEntry::single(81, ProductKind::FlatFee { cents: 1000 }),
            CatalogEntry::single(91, ProductKind::TrackedShipping),
            CatalogEntry::single(99, ProductKind::ExpressShipping),
            CatalogEntry::single(103, ProductKind::Stencil),
            CatalogEntry::range(105, 106, ProductKind::Board { layer_count: 2 }),
            CatalogEntry::single(107, ProductKind::Board { layer_count: 4 }),
            CatalogEntry::single(150, ProductKind::PartsMarkup),
            CatalogEntry::single(151, ProductKind::Assembly),
            CatalogEntry::single(152, ProductKind::AssembledBoard),
            CatalogEntry::single(201, ProductKind::Panel),
            CatalogEntry::single(202, ProductKind::FlatFee { cents: 0 }),
            CatalogEntry::single(203, ProductKind::FlatFee { cents: 6000 }),
            CatalogEntry::single(204, ProductKind::FlatFee { cents: 0 }),
        ];

        let mut boards = BTreeMap::new();
        boards.insert(
            2,
            BoardPricing::Segmented(SegmentedCurve {
                segments: vec![
                    Segment {
                        width: Some(75.0),
                        slope: 0.336,
                    },
                    Segment {
                        width: Some(117.0),
                        slope: 0.084,
                    },
                    Segment {
                        width: None,
                        slope: 0.500,
                    },
                ],
                lot_size: 3.0,
                base_fee_cents: 0,
                min_price_cents: 235,
            }),
        );
        boards.insert(
            4,
            BoardPricing::Tiered(TieredFlat {
                tiers: vec![
                    FlatTier {
                        max_area: Some(1369.0),
                        price_cents: 496,
                    },
                    FlatTier {
                        max_area: Some(5776.0),
                        price_cents: 1168,
                    },
                    FlatTier {
                        max_area: None,
                        price_cents: 1681,
                    },
                ],
            }),
        );

        let stencil = SegmentedCurve {
            segments: vec![
                Segment {
                    width: Some(75.0),
                    slope: 0.20,
                },
                Segment {
                    width: Some(117.0),
                    slope: 0.05,
                },
                Segment {
                    width: None,
                    slope: 0.30,
                },
            ],
            lot_size: 1.0,
            base_fee_cents: 0,
            min_price_cents: 1084,
        };

        let mut panels = BTreeMap::new();
        panels.insert(
            PanelClass::Pp2l,
            PanelCurve {
                a: 0.111,
                b: 0.332,
                fix: 70.0,
            },
        );
        panels.insert(
            PanelClass::PpHd2l,
            PanelCurve {
                a: 0.111,
                b: 0.329,
                fix: 100.0,
            },
        );
        panels.insert(
            PanelClass::PpHd4l,
            PanelCurve {
                a: 0.355,
                b: 0.454,
                fix: 130.0,
            },
        );

        let parts = MarkupPricing {
            multiplier: 1.15,
            handling_fee_cents: 300,
        };

        let assembly = AssemblyPricing::TwoPath {
            manual: AssemblyPath {
                setup_fee_cents: 3000,
                smt_part_cents: 1.5,
                tht_part_cents: 9.0,
                double_sided_surcharge_cents: 2000,
                variance_fee_cents: 50,
                customer_supplied_fee_cents: 250,
            },
            automated: AssemblyPath {
                setup_fee_cents: 12000,
                smt_part_cents: 0.4,
                tht_part_cents: 14.0,
                double_sided_surcharge_cents: 4500,
                variance_fee_cents: 180,
                customer_supplied_fee_cents: 250,
            },
        };

        Catalog {
            entries,
            boards,
            stencil,
            panels,
            parts,
            assembly,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
