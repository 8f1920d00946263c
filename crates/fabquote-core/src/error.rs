//! # Error Types
//!
//! Domain-specific error types for fabquote-core.
//!
//! ## Error Hierarchy
//! ```text
//! fabquote-core errors (this file)
//! ├── PricingError     - Quote computation failures
//! └── ValidationError  - Request parameter failures
//!
//! fabquote-rates errors (separate crate)
//! └── RateError        - Rate sheet fetch failures
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (uid, currency pair, field name)
//! 3. Errors are enum variants, never String
//! 4. A zero price is never an error substitute; failures are surfaced

use thiserror::Error;

use crate::money::Currency;

// =============================================================================
// Pricing Error
// =============================================================================

/// Quote computation errors.
///
/// Every failure a caller can trigger is a distinct variant; the engine
/// never coerces a failure into a zero price.
#[derive(Debug, Error)]
pub enum PricingError {
    /// No catalog entry covers the given product identifier.
    #[error("no product registered for uid {0}")]
    UnknownProduct(u32),

    /// A conversion was requested for a currency pair that is not loaded.
    ///
    /// Resolved by the caller refreshing the rate bank and retrying the
    /// whole request.
    #[error("no exchange rate loaded for {from}->{to}")]
    UnknownRate { from: Currency, to: Currency },

    /// Arithmetic between two amounts in different currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    /// A shipping-rate configuration document was rejected.
    #[error("shipping table rejected: {0}")]
    ShippingConfig(String),

    /// Request parameter validation failed (wraps ValidationError).
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Request parameter validation errors.
///
/// Raised before any formula runs, so a quote either computes from fully
/// valid inputs or fails fast.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Board/stencil/panel geometry is missing or non-positive.
    #[error("dimensions invalid: {reason}")]
    InvalidDimensions { reason: &'static str },

    /// Quantity missing or non-positive where a per-unit price is computed.
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    /// A required parameter was not supplied.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// A count or amount that must not be negative was negative.
    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    /// Currency code is not three ASCII letters.
    #[error("invalid currency code '{0}'")]
    InvalidCurrency(String),

    /// Country code is not two ASCII letters.
    #[error("invalid country code '{0}'")]
    InvalidCountry(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PricingError::UnknownProduct(999);
        assert_eq!(err.to_string(), "no product registered for uid 999");

        let err = PricingError::UnknownRate {
            from: Currency::EUR,
            to: Currency::USD,
        };
        assert_eq!(err.to_string(), "no exchange rate loaded for EUR->USD");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::InvalidQuantity;
        assert_eq!(err.to_string(), "quantity must be a positive integer");

        let err = ValidationError::Required { field: "dimension" };
        assert_eq!(err.to_string(), "dimension is required");
    }

    #[test]
    fn test_validation_converts_to_pricing_error() {
        let validation_err = ValidationError::InvalidQuantity;
        let pricing_err: PricingError = validation_err.into();
        assert!(matches!(pricing_err, PricingError::Validation(_)));
    }
}
