//! # Application State
//!
//! Shared state handed to every handler through axum's `State` extractor.
//! Constructed once in `main` (or per test) and cloned per request.

use std::sync::Arc;

use crate::exchange::RateProvider;
use crate::service::AgroService;
use ruralis_db::Database;

#[derive(Clone)]
pub struct AppState {
    pub service: AgroService,
}

impl AppState {
    pub fn new(db: Database, rates: Arc<dyn RateProvider>) -> Self {
        AppState {
            service: AgroService::new(db, rates),
        }
    }
}
