//! # Agro Service
//!
//! Orchestrates validation, repositories and exchange rates for every API
//! operation. Handlers stay thin: parse, call one method here, shape JSON.
//!
//! ## Applying an Agrochemical
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. validate dose and hectares           → 400 on failure               │
//! │  2. load agrochemical                    → 404 if absent                │
//! │  3. needed = dose × hectares                                            │
//! │  4. pre-check stock                      → 422 if short                 │
//! │  5. fetch ARS→USD rate (never fails)                                    │
//! │  6. compute ARS and USD cost             → 400 if it overflows          │
//! │  7. guarded debit + expense insert, one transaction                     │
//! │        └── guard lost a race             → 422 / 404, nothing written   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rate fetch sits before the transaction so no write lock is held
//! across the network call.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::exchange::RateProvider;
use ruralis_core::validation::{validate_application, validate_new_agrochemical, validate_new_user};
use ruralis_core::{
    Agrochemical, AppliedAgrochemical, ApplicationCost, ApplicationRequest, CoreError, CostTotals,
    ExpenseRecord, NewAgrochemical, NewUser, User,
};
use ruralis_db::{ApplyOutcome, Database};

/// Domain service shared by all handlers. Cheap to clone.
#[derive(Clone)]
pub struct AgroService {
    db: Database,
    rates: Arc<dyn RateProvider>,
}

impl AgroService {
    pub fn new(db: Database, rates: Arc<dyn RateProvider>) -> Self {
        AgroService { db, rates }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Validates and stores a user. Name and email are trimmed first.
    pub async fn create_user(&self, new_user: NewUser) -> ApiResult<User> {
        let new_user = NewUser {
            name: new_user.name.trim().to_string(),
            email: new_user.email.trim().to_string(),
        };
        validate_new_user(&new_user)?;

        let user = self.db.users().insert(&new_user).await?;
        info!(id = %user.id, email = %user.email, "User created");
        Ok(user)
    }

    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.db.users().list().await?)
    }

    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.db.users().delete(id).await?;
        info!(id = %id, "User deleted");
        Ok(())
    }

    // =========================================================================
    // Agrochemicals
    // =========================================================================

    /// Validates and stores an agrochemical. Text fields are trimmed first.
    pub async fn create_agrochemical(&self, new_agro: NewAgrochemical) -> ApiResult<Agrochemical> {
        let new_agro = NewAgrochemical {
            name: new_agro.name.trim().to_string(),
            unit: new_agro.unit.trim().to_string(),
            ..new_agro
        };
        validate_new_agrochemical(&new_agro)?;

        let agro = self.db.agrochemicals().insert(&new_agro).await?;
        info!(
            id = %agro.id,
            name = %agro.name,
            quantity = agro.quantity,
            currency = %agro.currency,
            "Agrochemical created"
        );
        Ok(agro)
    }

    pub async fn list_agrochemicals(&self) -> ApiResult<Vec<Agrochemical>> {
        Ok(self.db.agrochemicals().list().await?)
    }

    /// Deletes an agrochemical; its expense records stay.
    pub async fn delete_agrochemical(&self, id: &str) -> ApiResult<()> {
        self.db.agrochemicals().delete(id).await?;
        info!(id = %id, "Agrochemical deleted");
        Ok(())
    }

    /// Applies `request` to the agrochemical `id`: debits stock and records
    /// the cost in both currencies.
    pub async fn apply_agrochemical(
        &self,
        id: &str,
        request: ApplicationRequest,
    ) -> ApiResult<AppliedAgrochemical> {
        validate_application(&request)?;

        let agro = self
            .db
            .agrochemicals()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::AgrochemicalNotFound(id.to_string()))?;

        let needed = request.quantity_needed();
        agro.ensure_stock_for(needed)?;

        let rate = self.rates.usd_per_ars().await;
        let cost = ApplicationCost::compute(agro.unit_price, agro.currency, needed, rate)?;
        debug!(id = %id, needed, %rate, ?cost, "Computed application cost");

        match self.db.agrochemicals().apply(id, &cost).await? {
            ApplyOutcome::Applied(applied) => Ok(applied),
            ApplyOutcome::NotFound => Err(CoreError::AgrochemicalNotFound(id.to_string()).into()),
            ApplyOutcome::InsufficientStock(current) => Err(CoreError::InsufficientStock {
                name: current.name,
                available: current.quantity,
                requested: needed,
            }
            .into()),
        }
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub async fn list_expenses(&self) -> ApiResult<Vec<ExpenseRecord>> {
        Ok(self.db.expenses().list().await?)
    }

    pub async fn cost_totals(&self) -> ApiResult<CostTotals> {
        Ok(self.db.expenses().totals().await?)
    }
}
