//! # Repository Module
//!
//! Database repository implementations for Ruralis.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AgroService (apps/api)                                                │
//! │       │                                                                 │
//! │       │  db.agrochemicals().apply(id, &cost)                           │
//! │       ▼                                                                 │
//! │  AgrochemicalRepository                                                │
//! │  ├── list / get_by_id / find_by_name                                   │
//! │  ├── insert / delete                                                   │
//! │  └── apply  ← stock debit + expense insert, one transaction            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - User CRUD
//! - [`AgrochemicalRepository`](agrochemical::AgrochemicalRepository) - Inventory and applications
//! - [`ExpenseRepository`](expense::ExpenseRepository) - Expense history and totals

use chrono::Utc;
use ruralis_core::TIMESTAMP_FORMAT;
use uuid::Uuid;

pub mod agrochemical;
pub mod expense;
pub mod user;

/// Generates a new entity id (UUID v4, hyphenated).
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn now_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = generate_id();
        let b = generate_id();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_timestamp_format() {
        let ts = now_timestamp();

        assert_eq!(ts.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}
