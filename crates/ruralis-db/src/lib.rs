//! # ruralis-db: Database Layer for Ruralis
//!
//! SQLite storage for users, agrochemicals and expense records, using
//! sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ruralis Data Flow                                │
//! │                                                                         │
//! │  HTTP handler → AgroService (apps/api)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ruralis-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌─────────────┐  │   │
//! │  │   │   Database    │    │   Repositories   │   │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ UserRepo         │   │ (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ AgrochemicalRepo │   │ 001_initial │  │   │
//! │  │   │               │    │ ExpenseRepo      │   │             │  │   │
//! │  │   └───────────────┘    └──────────────────┘   └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (ruralis.db) or in-memory for tests                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ruralis_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./ruralis.db")).await?;
//! let stock = db.agrochemicals().list().await?;
//! let totals = db.expenses().totals().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::agrochemical::{AgrochemicalRepository, ApplyOutcome};
pub use repository::expense::ExpenseRepository;
pub use repository::user::UserRepository;
