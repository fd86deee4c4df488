//! # Domain Types
//!
//! Core domain types used throughout Ruralis.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │  Agrochemical   │   │  ExpenseRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  name           │   │  agrochem. id   │──┐    │
//! │  │  email (unique) │   │  quantity ▼     │◄──┼──(not enforced) │  │    │
//! │  └─────────────────┘   │  unit           │   │  qty applied    │  │    │
//! │                        │  unit_price     │   │  cost ARS / USD │  │    │
//! │                        │  currency       │   │  timestamp      │  │    │
//! │                        └─────────────────┘   └─────────────────┘  │    │
//! │                                                  immutable ◄──────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities and prices are `f64`: stock is measured in litres or kilograms
//! and doses are fractional, so there is no natural integer unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Currency
// =============================================================================

/// Currency an agrochemical is priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Argentine peso.
    Ars,
    /// US dollar.
    Usd,
}

impl Currency {
    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Ars => "ARS",
            Currency::Usd => "USD",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Ars
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ARS" => Ok(Currency::Ars),
            "USD" => Ok(Currency::Usd),
            _ => Err(ValidationError::NotAllowed {
                field: "moneda".to_string(),
                allowed: vec!["ARS".to_string(), "USD".to_string()],
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered user. Created and deleted, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub name: String,
    /// Globally unique; enforced by the store.
    pub email: String,
}

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

// =============================================================================
// Agrochemical
// =============================================================================

/// A stocked product (fertilizer, herbicide, pesticide...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Agrochemical {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Commercial or active-ingredient name, e.g. "Glifosato".
    pub name: String,

    /// Current stock. Never negative; only the apply operation decreases it.
    pub quantity: f64,

    /// Unit label ("L", "kg"). Informational only.
    pub unit: String,

    /// Price per unit, in `currency`.
    pub unit_price: f64,

    /// Currency `unit_price` is expressed in.
    pub currency: Currency,
}

impl Agrochemical {
    /// Returns true if `needed` can be taken from stock without going negative.
    #[inline]
    pub fn has_stock_for(&self, needed: f64) -> bool {
        needed <= self.quantity
    }

    /// Checks that `needed` units are available.
    ///
    /// ## Returns
    /// * `Ok(())` - Enough stock
    /// * `Err(CoreError::InsufficientStock)` - `needed` exceeds current quantity
    pub fn ensure_stock_for(&self, needed: f64) -> CoreResult<()> {
        if self.has_stock_for(needed) {
            return Ok(());
        }

        Err(CoreError::InsufficientStock {
            name: self.name.clone(),
            available: self.quantity,
            requested: needed,
        })
    }
}

/// Input for creating an agrochemical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAgrochemical {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    #[serde(default)]
    pub currency: Currency,
}

// =============================================================================
// Application
// =============================================================================

/// A request to apply an agrochemical over an area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    /// Product quantity per hectare.
    pub dose_per_hectare: f64,
    /// Treated area.
    pub hectares: f64,
}

impl ApplicationRequest {
    /// Creates a new application request.
    pub const fn new(dose_per_hectare: f64, hectares: f64) -> Self {
        ApplicationRequest {
            dose_per_hectare,
            hectares,
        }
    }

    /// Total product consumed: `dose_per_hectare × hectares`.
    #[inline]
    pub fn quantity_needed(&self) -> f64 {
        self.dose_per_hectare * self.hectares
    }
}

// =============================================================================
// Expense Record
// =============================================================================

/// Immutable log entry of one apply operation's cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ExpenseRecord {
    pub id: String,
    /// Agrochemical that was applied. Not a foreign key: the product may
    /// have been deleted since.
    pub agrochemical_id: String,
    pub quantity_applied: f64,
    pub cost_in_ars: f64,
    pub cost_in_usd: f64,
    /// Creation time, formatted with [`crate::TIMESTAMP_FORMAT`].
    pub timestamp: String,
}

/// Result of a successful application: the product after the stock
/// decrement and the expense it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAgrochemical {
    pub agrochemical: Agrochemical,
    pub expense: ExpenseRecord,
}

// =============================================================================
// Reporting
// =============================================================================

/// Sum of every expense record's costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTotals {
    pub total_ars: f64,
    pub total_usd: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn glifosato(quantity: f64) -> Agrochemical {
        Agrochemical {
            id: "a1".to_string(),
            name: "Glifosato".to_string(),
            quantity,
            unit: "L".to_string(),
            unit_price: 50.0,
            currency: Currency::Ars,
        }
    }

    #[test]
    fn test_currency_default_is_ars() {
        assert_eq!(Currency::default(), Currency::Ars);
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("ARS".parse::<Currency>().unwrap(), Currency::Ars);
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" Usd ".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn test_currency_serializes_uppercase() {
        let json = serde_json::to_string(&Currency::Usd).unwrap();
        assert_eq!(json, "\"USD\"");
    }

    #[test]
    fn test_quantity_needed() {
        let request = ApplicationRequest::new(2.0, 10.0);
        assert_eq!(request.quantity_needed(), 20.0);
    }

    #[test]
    fn test_stock_check() {
        assert!(glifosato(100.0).ensure_stock_for(20.0).is_ok());
        assert!(glifosato(20.0).ensure_stock_for(20.0).is_ok());

        let err = glifosato(5.0).ensure_stock_for(20.0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available, requested, .. }
                if available == 5.0 && requested == 20.0
        ));
    }
}
