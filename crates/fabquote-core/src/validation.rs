//! # Validation Module
//!
//! Low-level parameter validators. Each formula validates exactly the
//! inputs it consumes before any arithmetic runs, so a quote either
//! computes from fully valid inputs or fails fast with a typed error.

use crate::error::{ValidationError, ValidationResult};

/// Validates an area in mm²: finite and strictly positive.
pub fn validate_area(area: f64) -> ValidationResult<f64> {
    if !area.is_finite() || area <= 0.0 {
        return Err(ValidationError::InvalidDimensions {
            reason: "area must be a positive number of mm²",
        });
    }
    Ok(area)
}

/// Validates a quantity: present and strictly positive. Every formula that
/// divides by quantity goes through this.
pub fn validate_quantity(qty: Option<u32>) -> ValidationResult<u32> {
    match qty {
        Some(q) if q > 0 => Ok(q),
        _ => Err(ValidationError::InvalidQuantity),
    }
}

/// Validates a BOM total in minor units: zero is a valid business case
/// (no sourced parts), negative is not.
pub fn validate_bom_cents(cents: i64) -> ValidationResult<i64> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "bom_price_cents",
        });
    }
    Ok(cents)
}

/// Validates panel geometry: rows and cols present and strictly positive.
pub fn validate_grid(rows: Option<u32>, cols: Option<u32>) -> ValidationResult<(u32, u32)> {
    let rows = rows.filter(|r| *r > 0).ok_or(ValidationError::Required { field: "rows" })?;
    let cols = cols.filter(|c| *c > 0).ok_or(ValidationError::Required { field: "cols" })?;
    Ok((rows, cols))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_area() {
        assert_eq!(validate_area(1.0).unwrap(), 1.0);
        assert_eq!(validate_area(1600.0).unwrap(), 1600.0);

        assert!(validate_area(0.0).is_err());
        assert!(validate_area(-10.0).is_err());
        assert!(validate_area(f64::NAN).is_err());
        assert!(validate_area(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(Some(1)).unwrap(), 1);
        assert_eq!(validate_quantity(Some(999)).unwrap(), 999);

        assert_eq!(validate_quantity(Some(0)), Err(ValidationError::InvalidQuantity));
        assert_eq!(validate_quantity(None), Err(ValidationError::InvalidQuantity));
    }

    #[test]
    fn test_validate_bom_cents() {
        assert_eq!(validate_bom_cents(0).unwrap(), 0);
        assert_eq!(validate_bom_cents(125_000).unwrap(), 125_000);
        assert!(validate_bom_cents(-1).is_err());
    }

    #[test]
    fn test_validate_grid() {
        assert_eq!(validate_grid(Some(4), Some(4)).unwrap(), (4, 4));
        assert!(validate_grid(None, Some(4)).is_err());
        assert!(validate_grid(Some(4), Some(0)).is_err());
    }
}
