//! # ruralis-core: Pure Business Logic for Ruralis
//!
//! This crate holds the agronomic and financial rules of Ruralis as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ruralis Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP Clients                                 │   │
//! │  │    /users/  /agroquimicos/  /agroquimicos/{id}/aplicar/         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    routes ──► AgroService ──► ExchangeRate client              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ruralis-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   cost    │  │ validation│                  │   │
//! │  │   │   User    │  │ Exchange  │  │   rules   │                  │   │
//! │  │   │ Agrochem. │  │   Rate    │  │  checks   │                  │   │
//! │  │   │  Expense  │  │ AppCost   │  │           │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    ruralis-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Agrochemical, ExpenseRecord, Currency)
//! - [`cost`] - Exchange rates and application cost arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use ruralis_core::cost::{ApplicationCost, ExchangeRate};
//! use ruralis_core::types::Currency;
//!
//! let rate = ExchangeRate::new(0.001).unwrap();
//! let cost = ApplicationCost::compute(50.0, Currency::Ars, 20.0, rate).unwrap();
//!
//! assert_eq!(cost.cost_in_ars, 1000.0);
//! assert!((cost.cost_in_usd - 1.0).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cost;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cost::{ApplicationCost, ExchangeRate};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// ARS → USD rate used when the exchange-rate service cannot be reached.
///
/// Deployments override this through configuration; this is only the
/// default value.
pub const DEFAULT_FALLBACK_RATE: f64 = 0.001;

/// Format of [`ExpenseRecord::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Maximum length of free-text names (users and agrochemicals).
pub const MAX_NAME_LENGTH: usize = 200;
