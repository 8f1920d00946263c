//! # Pricing Engine
//!
//! The formula families and the dispatch that routes a product identifier
//! to one of them.
//!
//! ## Control Flow
//! ```text
//! price(uid, params)
//!      │
//!      ▼
//! Catalog::resolve(uid) ──► ProductKind        (unknown uid = typed error)
//!      │
//!      ▼
//! formula(coefficients, params) ──► f64 internal math
//!      │
//!      ▼
//! round ONCE ──► Money in the base currency (EUR)
//!      │
//!      ▼
//! convert to requested currency               (always the terminal step)
//! ```
//!
//! Every formula is a pure function of its inputs and the catalog. Curve
//! and power-law math runs in f64 internally; no unrounded float crosses a
//! function boundary.

use std::sync::Arc;

use crate::catalog::{
    AssemblyPath, AssemblyPricing, BoardPricing, Catalog, LinearAreaCurve, MarkupPricing,
    PanelCurve, ProductKind, SegmentedCurve, TieredFlat,
};
use crate::error::{PricingError, PricingResult, ValidationError};
use crate::exchange::RateProvider;
use crate::money::{Currency, Money};
use crate::shipping::ShippingTable;
use crate::types::{PriceParams, SlaTier};
use crate::validation;

// =============================================================================
// Formula Family: Segmented Linear Curve
// =============================================================================

/// Prices an area against a segmented linear curve, in minor units.
///
/// The size value (sqrt of area) is consumed segment by segment: each
/// segment contributes `min(remaining, width) * slope`, and later segments
/// contribute nothing once the size is exhausted. The summed lot cost is
/// divided by the lot size, rounded once, and floored at the minimum price.
pub fn segmented_curve_cents(curve: &SegmentedCurve, area: f64) -> i64 {
    let mut remaining = area.sqrt();
    let mut cost = 0.0;
    for segment in &curve.segments {
        if remaining <= 0.0 {
            break;
        }
        let consumed = match segment.width {
            Some(width) => width.min(remaining),
            None => remaining,
        };
        cost += consumed * segment.slope;
        remaining -= consumed;
    }
    let cents = (cost / curve.lot_size * 100.0).round() as i64 + curve.base_fee_cents;
    cents.max(curve.min_price_cents)
}

// =============================================================================
// Formula Family: Tiered Flat Rate
// =============================================================================

/// Prices an area against ordered flat tiers: the first tier whose
/// `max_area` covers the area wins, regardless of exact area within it.
pub fn tiered_flat_cents(table: &TieredFlat, area: f64) -> i64 {
    for tier in &table.tiers {
        match tier.max_area {
            Some(max) if area > max => continue,
            _ => return tier.price_cents,
        }
    }
    0
}

// =============================================================================
// Formula Family: Linear Area Rate
// =============================================================================

/// `rate * area * quantity + setup`, optionally reported per unit. One
/// rounding at the end, after the per-unit division.
pub fn linear_area_cents(curve: &LinearAreaCurve, area: f64, quantity: u32) -> i64 {
    let total =
        curve.rate_cents_per_mm2 * area * quantity as f64 + curve.setup_fee_cents as f64;
    let value = if curve.per_unit {
        total / quantity as f64
    } else {
        total
    };
    value.round() as i64
}

// =============================================================================
// Formula Family: Power-Law Panel
// =============================================================================

/// Per-unit production-panel price in minor units.
///
/// `eff_area = area/100 * quantity * rows * cols`;
/// `cents = ((a * 100^b) * eff_area^(1-b) + fix) * 100 / quantity`.
pub fn panel_cents(curve: &PanelCurve, area: f64, quantity: u32, rows: u32, cols: u32) -> i64 {
    let eff_area = area / 100.0 * quantity as f64 * rows as f64 * cols as f64;
    let batch_major = (curve.a * 100f64.powf(curve.b)) * eff_area.powf(1.0 - curve.b) + curve.fix;
    (batch_major * 100.0 / quantity as f64).round() as i64
}

// =============================================================================
// Formula Family: Parts Markup
// =============================================================================

/// Markup on a customer BOM total. A zero BOM short-circuits to zero:
/// handling is only charged when parts actually flow through purchasing.
pub fn markup_cents(markup: &MarkupPricing, bom_cents: i64) -> i64 {
    if bom_cents == 0 {
        return 0;
    }
    (bom_cents as f64 * markup.multiplier).round() as i64 + markup.handling_fee_cents
}

// =============================================================================
// Formula Family: Assembly
// =============================================================================

/// The assembly-relevant slice of a request, validated once.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyJob {
    pub quantity: u32,
    pub smt_parts: u32,
    pub tht_parts: u32,
    pub double_sided: bool,
    pub part_variance: u32,
    pub customer_supplied_variance: u32,
    pub sla: SlaTier,
}

impl AssemblyJob {
    /// Extracts and validates assembly inputs from a parameter bag.
    pub fn from_params(params: &PriceParams) -> PricingResult<AssemblyJob> {
        Ok(AssemblyJob {
            quantity: params.require_quantity()?,
            smt_parts: params.part_smt_count.unwrap_or(0),
            tht_parts: params.part_tht_count.unwrap_or(0),
            double_sided: params.is_double_sided(),
            part_variance: params.part_variance.unwrap_or(0),
            customer_supplied_variance: params.customer_supplied_part_variance.unwrap_or(0),
            sla: params.sla.unwrap_or_default(),
        })
    }
}

fn assembly_path_raw(path: &AssemblyPath, job: &AssemblyJob, quantity: u32) -> f64 {
    let per_unit =
        job.smt_parts as f64 * path.smt_part_cents + job.tht_parts as f64 * path.tht_part_cents;
    let mut total = path.setup_fee_cents as f64 + per_unit * quantity as f64;
    if job.double_sided {
        total += path.double_sided_surcharge_cents as f64;
    }
    total += job.part_variance as f64 * path.variance_fee_cents as f64;
    total += job.customer_supplied_variance as f64 * path.customer_supplied_fee_cents as f64;
    total
}

/// Cost of one production method for a job, in minor units.
pub fn assembly_path_cents(path: &AssemblyPath, job: &AssemblyJob) -> i64 {
    assembly_path_raw(path, job, job.quantity).round() as i64
}

/// Assembly price for a job under the active strategy.
///
/// Two-path: the vendor quotes whichever of hand and machine assembly is
/// cheaper. Single-path: quantity is lifted to the minimum lot first, and
/// blitz service multiplies the whole cost.
pub fn assembly_cents(pricing: &AssemblyPricing, job: &AssemblyJob) -> i64 {
    match pricing {
        AssemblyPricing::TwoPath { manual, automated } => {
            assembly_path_cents(manual, job).min(assembly_path_cents(automated, job))
        }
        AssemblyPricing::SinglePath {
            path,
            min_lot,
            blitz_multiplier,
        } => {
            let quantity = job.quantity.max(*min_lot);
            let mut total = assembly_path_raw(path, job, quantity);
            if job.sla == SlaTier::Blitz {
                total *= blitz_multiplier;
            }
            total.round() as i64
        }
    }
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// The engine: one active catalog, one shipping table, one rate provider,
/// one base currency. Stateless across calls; safe to share between
/// threads.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use fabquote_core::exchange::FixedRates;
/// use fabquote_core::pricing::PricingEngine;
/// use fabquote_core::types::{Dimension, PriceParams};
///
/// let engine = PricingEngine::with_defaults(Arc::new(FixedRates::new()));
/// let params = PriceParams {
///     dimension: Some(Dimension::Area(1.0)),
///     ..PriceParams::default()
/// };
/// let price = engine.price(105, &params).unwrap();
/// assert_eq!(price.cents(), 235);
/// ```
pub struct PricingEngine {
    catalog: Catalog,
    shipping: ShippingTable,
    rates: Arc<dyn RateProvider>,
    base_currency: Currency,
}

impl PricingEngine {
    /// Builds an engine from explicit collaborators. Base currency is EUR;
    /// all catalog prices are expressed in it.
    pub fn new(catalog: Catalog, shipping: ShippingTable, rates: Arc<dyn RateProvider>) -> Self {
        PricingEngine {
            catalog,
            shipping,
            rates,
            base_currency: Currency::EUR,
        }
    }

    /// Engine over the active published catalog and shipping rates.
    pub fn with_defaults(rates: Arc<dyn RateProvider>) -> Self {
        PricingEngine::new(Catalog::default(), ShippingTable::default(), rates)
    }

    /// The currency catalog prices are expressed in.
    pub fn base_currency(&self) -> Currency {
        self.base_currency
    }

    /// Computes the price of a product for the given parameters.
    ///
    /// The result is converted to `params.currency` (engine base when
    /// absent) as the terminal step; all internal math happens in the base
    /// currency.
    pub fn price(&self, product_uid: u32, params: &PriceParams) -> PricingResult<Money> {
        let currency = params.currency.unwrap_or(self.base_currency);
        let kind = self
            .catalog
            .resolve(product_uid)
            .ok_or(PricingError::UnknownProduct(product_uid))?;

        let net = match kind {
            ProductKind::Board { layer_count } => self.board_price(layer_count, params)?,
            ProductKind::Stencil => self.stencil_price(params)?,
            ProductKind::Panel => self.panel_price(params)?,
            ProductKind::PartsMarkup => self.parts_price(params)?,
            ProductKind::Assembly => self.assembly_price(params)?,
            ProductKind::AssembledBoard => self.assembled_board_price(params)?,
            ProductKind::TrackedShipping => self.shipping_price(params, false),
            ProductKind::ExpressShipping => self.shipping_price(params, true),
            ProductKind::FlatFee { cents } => Money::new(cents, self.base_currency),
        };

        net.convert(currency, self.rates.as_ref())
    }

    /// Bare-board price for a layer-count category, in the base currency.
    ///
    /// A layer count with no catalog entry prices at zero: that is data
    /// absence for a known product, a defined business outcome distinct
    /// from an unknown uid.
    pub fn board_price(&self, layer_count: u32, params: &PriceParams) -> PricingResult<Money> {
        let area = params.require_area()?;
        let cents = match self.catalog.boards.get(&layer_count) {
            Some(BoardPricing::Segmented(curve)) => segmented_curve_cents(curve, area),
            Some(BoardPricing::Tiered(table)) => tiered_flat_cents(table, area),
            Some(BoardPricing::LinearArea(curve)) => {
                linear_area_cents(curve, area, params.require_quantity()?)
            }
            None => 0,
        };
        Ok(Money::new(cents, self.base_currency))
    }

    /// Solder-paste stencil price, from the stencil's own segmented curve.
    pub fn stencil_price(&self, params: &PriceParams) -> PricingResult<Money> {
        let area = params.require_area()?;
        Ok(Money::new(
            segmented_curve_cents(&self.catalog.stencil, area),
            self.base_currency,
        ))
    }

    /// Per-unit production-panel price for the requested panel class.
    pub fn panel_price(&self, params: &PriceParams) -> PricingResult<Money> {
        let area = params.require_area()?;
        let quantity = params.require_quantity()?;
        let (rows, cols) = validation::validate_grid(params.rows, params.cols)?;
        let class = params.panel_class.ok_or(PricingError::Validation(
            ValidationError::Required {
                field: "panel_class",
            },
        ))?;
        let cents = match self.catalog.panels.get(&class) {
            Some(curve) => panel_cents(curve, area, quantity, rows, cols),
            None => 0,
        };
        Ok(Money::new(cents, self.base_currency))
    }

    /// Sourcing markup on the customer's BOM total.
    pub fn parts_price(&self, params: &PriceParams) -> PricingResult<Money> {
        let bom = params
            .bom_price_cents
            .ok_or(ValidationError::Required {
                field: "bom_price_cents",
            })?;
        let bom = validation::validate_bom_cents(bom)?;
        Ok(Money::new(
            markup_cents(&self.catalog.parts, bom),
            self.base_currency,
        ))
    }

    /// Assembly service price under the active strategy.
    pub fn assembly_price(&self, params: &PriceParams) -> PricingResult<Money> {
        let job = AssemblyJob::from_params(params)?;
        Ok(Money::new(
            assembly_cents(&self.catalog.assembly, &job),
            self.base_currency,
        ))
    }

    /// Composite: board + sourced parts + stencil + assembly, each line
    /// independently rounded to base-currency minor units before the sum.
    fn assembled_board_price(&self, params: &PriceParams) -> PricingResult<Money> {
        let layer_count = params.layer_count.unwrap_or(2);
        let board = self.board_price(layer_count, params)?;
        let bom = validation::validate_bom_cents(params.bom_price_cents.unwrap_or(0))?;
        let parts = Money::new(markup_cents(&self.catalog.parts, bom), self.base_currency);
        let stencil = self.stencil_price(params)?;
        let assembly = self.assembly_price(params)?;

        Money::sum(self.base_currency, [board, parts, stencil, assembly])
    }

    fn shipping_price(&self, params: &PriceParams, express: bool) -> Money {
        let rate = self.shipping.lookup(params.country);
        let cents = if express {
            rate.express_cents
        } else {
            rate.tracked_cents
        };
        Money::new(cents, self.base_currency)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FlatTier, Segment};
    use crate::exchange::FixedRates;
    use crate::types::{CountryCode, Dimension};

    fn engine() -> PricingEngine {
        let mut rates = FixedRates::new();
        rates.add_rate(Currency::EUR, Currency::USD, 1.15);
        PricingEngine::with_defaults(Arc::new(rates))
    }

    fn params_with_area(area: f64) -> PriceParams {
        PriceParams {
            dimension: Some(Dimension::Area(area)),
            ..PriceParams::default()
        }
    }

    // ==================== segmented curve ====================

    #[test]
    fn test_smallest_two_layer_board_hits_minimum_price() {
        let price = engine().price(105, &params_with_area(1.0)).unwrap();
        assert_eq!(price.cents(), 235);
        assert_eq!(price.currency(), Currency::EUR);
    }

    #[test]
    fn test_two_layer_board_above_minimum() {
        // 100x100 mm: size 100 = 75 @ 0.336 + 25 @ 0.084 -> 27.3 per lot,
        // 9.10 per board.
        let price = engine().price(105, &params_with_area(10_000.0)).unwrap();
        assert_eq!(price.cents(), 910);
    }

    #[test]
    fn test_board_price_monotonic_and_floored() {
        let eng = engine();
        let mut last = 0;
        for area in [1.0, 100.0, 2_500.0, 5_625.0, 10_000.0, 40_000.0, 250_000.0] {
            let cents = eng.price(105, &params_with_area(area)).unwrap().cents();
            assert!(cents >= 235, "area {area} priced below minimum");
            assert!(cents >= last, "price decreased at area {area}");
            last = cents;
        }
    }

    #[test]
    fn test_segment_curve_continuity_at_breakpoint() {
        let curve = SegmentedCurve {
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
            min_price_cents: 0,
        };

        // Exactly on the first breakpoint (size 75) and a hair below it
        // must agree to within one minor unit; the next segment contributes
        // zero at the boundary.
        let at = segmented_curve_cents(&curve, 75.0 * 75.0);
        let below = segmented_curve_cents(&curve, 74.9999 * 74.9999);
        let above = segmented_curve_cents(&curve, 75.0001 * 75.0001);
        assert!((at - below).abs() <= 1);
        assert!(above >= at);
        assert_eq!(at, 840); // 75 * 0.336 / 3 * 100
    }

    #[test]
    fn test_segmented_base_fee_is_additive() {
        let curve = SegmentedCurve {
            segments: vec![Segment {
                width: None,
                slope: 1.0,
            }],
            lot_size: 1.0,
            base_fee_cents: 500,
            min_price_cents: 0,
        };
        // size 10 -> 10.0 cost -> 1000 cents + 500 base
        assert_eq!(segmented_curve_cents(&curve, 100.0), 1500);
    }

    // ==================== tiered flat ====================

    #[test]
    fn test_four_layer_board_tiers() {
        let eng = engine();
        assert_eq!(eng.price(107, &params_with_area(1.0)).unwrap().cents(), 496);
        assert_eq!(
            eng.price(107, &params_with_area(2_000.0)).unwrap().cents(),
            1168
        );
        assert_eq!(
            eng.price(107, &params_with_area(10_000.0)).unwrap().cents(),
            1681
        );
    }

    #[test]
    fn test_four_layer_tier_boundaries_inclusive() {
        let eng = engine();
        assert_eq!(
            eng.price(107, &params_with_area(1_369.0)).unwrap().cents(),
            496
        );
        assert_eq!(
            eng.price(107, &params_with_area(1_370.0)).unwrap().cents(),
            1168
        );
        assert_eq!(
            eng.price(107, &params_with_area(5_776.0)).unwrap().cents(),
            1168
        );
        assert_eq!(
            eng.price(107, &params_with_area(5_777.0)).unwrap().cents(),
            1681
        );
    }

    #[test]
    fn test_tiered_flat_with_no_catchall_prices_zero_past_last_tier() {
        let table = TieredFlat {
            tiers: vec![FlatTier {
                max_area: Some(100.0),
                price_cents: 500,
            }],
        };
        assert_eq!(tiered_flat_cents(&table, 50.0), 500);
        assert_eq!(tiered_flat_cents(&table, 200.0), 0);
    }

    #[test]
    fn test_unsupported_layer_count_prices_zero() {
        let price = engine()
            .board_price(6, &params_with_area(100.0))
            .unwrap();
        assert!(price.is_zero());
    }

    // ==================== linear area rate ====================

    #[test]
    fn test_linear_area_rate() {
        let curve = LinearAreaCurve {
            rate_cents_per_mm2: 0.02,
            setup_fee_cents: 800,
            per_unit: false,
        };
        // 0.02 * 10000 * 5 + 800 = 1800
        assert_eq!(linear_area_cents(&curve, 10_000.0, 5), 1800);

        let per_unit = LinearAreaCurve {
            per_unit: true,
            ..curve
        };
        assert_eq!(linear_area_cents(&per_unit, 10_000.0, 5), 360);
    }

    #[test]
    fn test_linear_board_revision_requires_quantity() {
        let mut catalog = Catalog::default();
        catalog.boards.insert(
            2,
            BoardPricing::LinearArea(LinearAreaCurve {
                rate_cents_per_mm2: 0.02,
                setup_fee_cents: 800,
                per_unit: true,
            }),
        );
        let eng = PricingEngine::new(catalog, ShippingTable::default(), Arc::new(FixedRates::new()));

        let err = eng.price(105, &params_with_area(10_000.0)).unwrap_err();
        assert!(matches!(
            err,
            PricingError::Validation(ValidationError::InvalidQuantity)
        ));

        let mut params = params_with_area(10_000.0);
        params.quantity = Some(5);
        assert_eq!(eng.price(105, &params).unwrap().cents(), 360);
    }

    // ==================== power-law panel ====================

    fn panel_params() -> PriceParams {
        PriceParams {
            dimension: Some(Dimension::Area(1_600.0)),
            quantity: Some(6),
            rows: Some(4),
            cols: Some(4),
            panel_class: Some(crate::types::PanelClass::Pp2l),
            ..PriceParams::default()
        }
    }

    #[test]
    fn test_panel_fixture() {
        // eff_area = 1600/100 * 6 * 4 * 4 = 1536;
        // ((0.111 * 100^0.332) * 1536^0.668 + 70) * 100 / 6 = 2314
        let price = engine().price(201, &panel_params()).unwrap();
        assert_eq!(price.cents(), 2314);
    }

    #[test]
    fn test_panel_requires_grid_and_class() {
        let eng = engine();

        let mut no_rows = panel_params();
        no_rows.rows = None;
        assert!(eng.price(201, &no_rows).is_err());

        let mut no_class = panel_params();
        no_class.panel_class = None;
        assert!(eng.price(201, &no_class).is_err());

        let mut zero_qty = panel_params();
        zero_qty.quantity = Some(0);
        assert!(matches!(
            eng.price(201, &zero_qty).unwrap_err(),
            PricingError::Validation(ValidationError::InvalidQuantity)
        ));
    }

    #[test]
    fn test_panel_classes_price_differently() {
        let eng = engine();
        let base = eng.price(201, &panel_params()).unwrap();

        let mut hd = panel_params();
        hd.panel_class = Some(crate::types::PanelClass::PpHd4l);
        let hd_price = eng.price(201, &hd).unwrap();
        assert!(hd_price > base);
    }

    // ==================== stencil ====================

    #[test]
    fn test_stencil_minimum_price() {
        let price = engine().price(103, &params_with_area(100.0)).unwrap();
        assert_eq!(price.cents(), 1084);
    }

    #[test]
    fn test_stencil_grows_past_minimum() {
        // 200x200 mm: 75 @ 0.20 + 117 @ 0.05 + 8 @ 0.30 = 23.25 -> 2325
        let price = engine().price(103, &params_with_area(40_000.0)).unwrap();
        assert_eq!(price.cents(), 2325);
    }

    // ==================== parts markup ====================

    #[test]
    fn test_parts_markup() {
        let mut params = PriceParams::default();
        params.bom_price_cents = Some(10_000);
        // round(10000 * 1.15) + 300
        assert_eq!(engine().price(150, &params).unwrap().cents(), 11_800);
    }

    #[test]
    fn test_zero_bom_short_circuits_to_zero() {
        let mut params = PriceParams::default();
        params.bom_price_cents = Some(0);
        let price = engine().price(150, &params).unwrap();
        assert!(price.is_zero());
    }

    #[test]
    fn test_parts_markup_requires_bom_and_rejects_negative() {
        let eng = engine();
        assert!(eng.price(150, &PriceParams::default()).is_err());

        let mut params = PriceParams::default();
        params.bom_price_cents = Some(-5);
        assert!(eng.price(150, &params).is_err());
    }

    // ==================== assembly ====================

    fn assembly_params(quantity: u32) -> PriceParams {
        PriceParams {
            quantity: Some(quantity),
            part_smt_count: Some(50),
            part_tht_count: Some(5),
            ..PriceParams::default()
        }
    }

    fn default_paths() -> (AssemblyPath, AssemblyPath) {
        match Catalog::default().assembly {
            AssemblyPricing::TwoPath { manual, automated } => (manual, automated),
            _ => unreachable!("default catalog uses the two-path strategy"),
        }
    }

    #[test]
    fn test_assembly_picks_cheaper_path_small_job() {
        let eng = engine();
        let params = assembly_params(10);
        let job = AssemblyJob::from_params(&params).unwrap();
        let (manual, automated) = default_paths();

        let manual_cents = assembly_path_cents(&manual, &job);
        let automated_cents = assembly_path_cents(&automated, &job);
        assert_eq!(manual_cents, 4_200);
        assert_eq!(automated_cents, 12_900);

        let price = eng.price(151, &params).unwrap();
        assert_eq!(price.cents(), manual_cents.min(automated_cents));
    }

    #[test]
    fn test_assembly_picks_cheaper_path_large_job() {
        let eng = engine();
        let params = assembly_params(500);
        let job = AssemblyJob::from_params(&params).unwrap();
        let (manual, automated) = default_paths();

        let manual_cents = assembly_path_cents(&manual, &job);
        let automated_cents = assembly_path_cents(&automated, &job);
        assert_eq!(manual_cents, 63_000);
        assert_eq!(automated_cents, 57_000);
        assert!(automated_cents < manual_cents);

        let price = eng.price(151, &params).unwrap();
        assert_eq!(price.cents(), automated_cents);
    }

    #[test]
    fn test_assembly_zero_smt_keeps_fixed_components() {
        let mut params = assembly_params(10);
        params.part_smt_count = Some(0);
        let job = AssemblyJob::from_params(&params).unwrap();
        let (manual, automated) = default_paths();

        // Manual: setup 3000 + 5 THT * 9.0 * 10 = 3450.
        let manual_cents = assembly_path_cents(&manual, &job);
        let automated_cents = assembly_path_cents(&automated, &job);
        assert_eq!(manual_cents, 3_450);

        let price = engine().price(151, &params).unwrap();
        assert_eq!(price.cents(), manual_cents.min(automated_cents));
    }

    #[test]
    fn test_assembly_surcharges() {
        let mut params = assembly_params(10);
        params.double_sided = Some(true);
        params.part_variance = Some(8);
        params.customer_supplied_part_variance = Some(2);
        let job = AssemblyJob::from_params(&params).unwrap();
        let (manual, _) = default_paths();

        // 3000 setup + 1200 placements + 2000 double-sided + 8*50 + 2*250
        assert_eq!(assembly_path_cents(&manual, &job), 7_100);
    }

    #[test]
    fn test_assembly_requires_quantity() {
        let mut params = assembly_params(1);
        params.quantity = None;
        assert!(matches!(
            engine().price(151, &params).unwrap_err(),
            PricingError::Validation(ValidationError::InvalidQuantity)
        ));
    }

    fn single_path_pricing() -> AssemblyPricing {
        AssemblyPricing::SinglePath {
            path: AssemblyPath {
                setup_fee_cents: 5_000,
                smt_part_cents: 1.0,
                tht_part_cents: 10.0,
                double_sided_surcharge_cents: 1_500,
                variance_fee_cents: 100,
                customer_supplied_fee_cents: 300,
            },
            min_lot: 3,
            blitz_multiplier: 1.5,
        }
    }

    #[test]
    fn test_single_path_minimum_lot() {
        let pricing = single_path_pricing();
        let one = AssemblyJob::from_params(&assembly_params(1)).unwrap();
        let three = AssemblyJob::from_params(&assembly_params(3)).unwrap();

        // 5000 + (50*1.0 + 5*10.0) * 3 = 5300 either way; a single unit is
        // produced as a lot of three.
        assert_eq!(assembly_cents(&pricing, &one), 5_300);
        assert_eq!(assembly_cents(&pricing, &one), assembly_cents(&pricing, &three));

        let four = AssemblyJob::from_params(&assembly_params(4)).unwrap();
        assert_eq!(assembly_cents(&pricing, &four), 5_400);
    }

    #[test]
    fn test_single_path_blitz_multiplier() {
        let pricing = single_path_pricing();
        let mut params = assembly_params(3);
        params.sla = Some(SlaTier::Blitz);
        let job = AssemblyJob::from_params(&params).unwrap();

        assert_eq!(assembly_cents(&pricing, &job), 7_950); // 5300 * 1.5
    }

    #[test]
    fn test_engine_with_single_path_catalog() {
        let mut catalog = Catalog::default();
        catalog.assembly = single_path_pricing();
        let eng =
            PricingEngine::new(catalog, ShippingTable::default(), Arc::new(FixedRates::new()));

        assert_eq!(eng.price(151, &assembly_params(1)).unwrap().cents(), 5_300);
    }

    // ==================== composite ====================

    #[test]
    fn test_assembled_board_sums_component_lines() {
        let eng = engine();
        let mut params = assembly_params(10);
        params.dimension = Some(Dimension::Area(10_000.0));
        params.bom_price_cents = Some(10_000);
        params.part_variance = Some(8);
        params.customer_supplied_part_variance = Some(2);

        let board = eng.board_price(2, &params).unwrap();
        let stencil = eng.stencil_price(&params).unwrap();
        let parts = eng.parts_price(&params).unwrap();
        let assembly = eng.assembly_price(&params).unwrap();
        let expected = board
            .checked_add(stencil)
            .and_then(|m| m.checked_add(parts))
            .and_then(|m| m.checked_add(assembly))
            .unwrap();

        let composite = eng.price(152, &params).unwrap();
        assert_eq!(composite, expected);
        assert_eq!(composite.cents(), 910 + 1625 + 11_800 + 5_100);
    }

    #[test]
    fn test_assembled_board_without_bom_skips_parts_line() {
        let eng = engine();
        let mut params = assembly_params(10);
        params.dimension = Some(Dimension::Area(10_000.0));

        let composite = eng.price(152, &params).unwrap();
        assert_eq!(composite.cents(), 910 + 1625 + 4_200);
    }

    // ==================== shipping ====================

    #[test]
    fn test_shipping_uids() {
        let eng = engine();

        let mut domestic = PriceParams::default();
        domestic.country = Some(CountryCode::from_code("DE").unwrap());
        assert_eq!(eng.price(91, &domestic).unwrap().cents(), 0);
        assert_eq!(eng.price(99, &domestic).unwrap().cents(), 995);

        let mut eu = PriceParams::default();
        eu.country = Some(CountryCode::from_code("FR").unwrap());
        assert_eq!(eng.price(91, &eu).unwrap().cents(), 0);
        assert_eq!(eng.price(99, &eu).unwrap().cents(), 1_500);

        let mut elsewhere = PriceParams::default();
        elsewhere.country = Some(CountryCode::from_code("BR").unwrap());
        assert_eq!(eng.price(91, &elsewhere).unwrap().cents(), 450);
        assert_eq!(eng.price(99, &elsewhere).unwrap().cents(), 2_500);

        // No country at all uses the fallback tier.
        assert_eq!(eng.price(99, &PriceParams::default()).unwrap().cents(), 2_500);
    }

    // ==================== flat fees ====================

    #[test]
    fn test_flat_fee_uids() {
        let eng = engine();
        let params = PriceParams::default();
        assert_eq!(eng.price(71, &params).unwrap().cents(), 200);
        assert_eq!(eng.price(72, &params).unwrap().cents(), 200);
        assert_eq!(eng.price(81, &params).unwrap().cents(), 1_000);
        assert_eq!(eng.price(202, &params).unwrap().cents(), 0);
        assert_eq!(eng.price(203, &params).unwrap().cents(), 6_000);
        assert_eq!(eng.price(204, &params).unwrap().cents(), 0);
    }

    // ==================== dispatch and currency ====================

    #[test]
    fn test_unknown_uid_is_an_error() {
        let err = engine().price(999, &PriceParams::default()).unwrap_err();
        assert!(matches!(err, PricingError::UnknownProduct(999)));
    }

    #[test]
    fn test_dimension_shapes_price_identically() {
        let eng = engine();
        let area = eng.price(105, &params_with_area(10_000.0)).unwrap();

        let mut pair = PriceParams::default();
        pair.dimension = Some(Dimension::Pair([100.0, 100.0]));
        let mut sides = PriceParams::default();
        sides.dimension = Some(Dimension::Sides {
            width: 100.0,
            height: 100.0,
        });

        assert_eq!(eng.price(105, &pair).unwrap(), area);
        assert_eq!(eng.price(105, &sides).unwrap(), area);
    }

    #[test]
    fn test_missing_dimension_is_an_error() {
        let err = engine().price(105, &PriceParams::default()).unwrap_err();
        assert!(matches!(
            err,
            PricingError::Validation(ValidationError::Required { field: "dimension" })
        ));
    }

    #[test]
    fn test_requested_currency_is_converted_last() {
        let eng = engine();
        let in_eur = eng.price(103, &params_with_area(100.0)).unwrap();

        let mut usd_params = params_with_area(100.0);
        usd_params.currency = Some(Currency::USD);
        let in_usd = eng.price(103, &usd_params).unwrap();

        assert_eq!(in_usd.currency(), Currency::USD);
        assert_ne!(in_usd.cents(), in_eur.cents());
        // Converting the base-currency price must give the same result:
        // conversion is the terminal step, never folded into a formula.
        let mut rates = FixedRates::new();
        rates.add_rate(Currency::EUR, Currency::USD, 1.15);
        assert_eq!(in_usd, in_eur.convert(Currency::USD, &rates).unwrap());
        assert_eq!(in_usd.cents(), 1_247); // 1084 * 1.15 rounded
    }

    #[test]
    fn test_unloaded_currency_pair_fails_until_rates_arrive() {
        let cad = Currency::from_code("CAD").unwrap();
        let mut params = params_with_area(100.0);
        params.currency = Some(cad);

        let err = engine().price(103, &params).unwrap_err();
        assert!(matches!(err, PricingError::UnknownRate { .. }));

        // The same request succeeds once the pair is loaded.
        let mut rates = FixedRates::new();
        rates.add_rate(Currency::EUR, cad, 1.47);
        let eng = PricingEngine::with_defaults(Arc::new(rates));
        assert_eq!(eng.price(103, &params).unwrap().cents(), 1_593); // 1084 * 1.47
    }
}
