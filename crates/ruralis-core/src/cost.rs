//! # Cost Module
//!
//! Exchange rates and the arithmetic behind an application's expense record.
//!
//! ## Cost Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  APPLICATION COST                                                       │
//! │                                                                         │
//! │  quantity   = dose_per_hectare × hectares                               │
//! │  native     = unit_price × quantity        (in the product's currency)  │
//! │                                                                         │
//! │  currency = ARS:  cost_in_ars = native                                  │
//! │                   cost_in_usd = native × rate                           │
//! │                                                                         │
//! │  currency = USD:  cost_in_usd = native                                  │
//! │                   cost_in_ars = native / rate                           │
//! │                                                                         │
//! │  rate = USD per 1 ARS (e.g. 0.001)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ruralis_core::cost::{ApplicationCost, ExchangeRate};
//! use ruralis_core::types::Currency;
//!
//! let rate = ExchangeRate::new(0.001).unwrap();
//!
//! // 20 L of a USD 4/L product
//! let cost = ApplicationCost::compute(4.0, Currency::Usd, 20.0, rate).unwrap();
//! assert_eq!(cost.cost_in_usd, 80.0);
//! assert!((cost.cost_in_ars - 80_000.0).abs() < 1e-6);
//!
//! // Overflows are rejected instead of stored as infinity
//! assert!(ApplicationCost::compute(1e308, Currency::Ars, 20.0, rate).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::types::Currency;
use crate::validation::ValidationResult;
use crate::DEFAULT_FALLBACK_RATE;

// =============================================================================
// Exchange Rate
// =============================================================================

/// ARS → USD conversion rate: how many US dollars one peso buys.
///
/// Always finite and strictly positive. Only constructed through [`ExchangeRate::new`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ExchangeRate(f64);

impl ExchangeRate {
    /// Creates a rate, rejecting NaN, infinities, zero and negatives.
    ///
    /// ## Example
    /// ```rust
    /// use ruralis_core::cost::ExchangeRate;
    ///
    /// assert!(ExchangeRate::new(0.00085).is_some());
    /// assert!(ExchangeRate::new(0.0).is_none());
    /// assert!(ExchangeRate::new(f64::NAN).is_none());
    /// ```
    pub fn new(usd_per_ars: f64) -> Option<Self> {
        if usd_per_ars.is_finite() && usd_per_ars > 0.0 {
            Some(ExchangeRate(usd_per_ars))
        } else {
            None
        }
    }

    /// The built-in fallback rate ([`DEFAULT_FALLBACK_RATE`]).
    pub const fn fallback() -> Self {
        ExchangeRate(DEFAULT_FALLBACK_RATE)
    }

    /// USD per ARS.
    #[inline]
    pub const fn usd_per_ars(&self) -> f64 {
        self.0
    }

    /// Converts a peso amount to dollars.
    #[inline]
    pub fn ars_to_usd(&self, ars: f64) -> f64 {
        ars * self.0
    }

    /// Converts a dollar amount to pesos.
    #[inline]
    pub fn usd_to_ars(&self, usd: f64) -> f64 {
        usd / self.0
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        ExchangeRate::fallback()
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 ARS = {} USD", self.0)
    }
}

// =============================================================================
// Application Cost
// =============================================================================

/// The computed fields of an expense record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCost {
    pub quantity_applied: f64,
    pub cost_in_ars: f64,
    pub cost_in_usd: f64,
}

impl ApplicationCost {
    /// Computes the cost of applying `quantity` units priced at `unit_price`
    /// in `currency`.
    ///
    /// The product's own currency keeps the exact figure; the other one is
    /// derived through `rate`.
    ///
    /// ## Errors
    /// `NotFinite` when either figure overflows to infinity (huge prices,
    /// or a USD product converted at a tiny rate).
    pub fn compute(
        unit_price: f64,
        currency: Currency,
        quantity: f64,
        rate: ExchangeRate,
    ) -> ValidationResult<Self> {
        let native = unit_price * quantity;

        let (cost_in_ars, cost_in_usd) = match currency {
            Currency::Ars => (native, rate.ars_to_usd(native)),
            Currency::Usd => (rate.usd_to_ars(native), native),
        };

        ensure_finite("costo_total_ars", cost_in_ars)?;
        ensure_finite("costo_total_usd", cost_in_usd)?;

        Ok(ApplicationCost {
            quantity_applied: quantity,
            cost_in_ars,
            cost_in_usd,
        })
    }
}

fn ensure_finite(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
