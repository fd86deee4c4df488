//! # Agrochemical Repository
//!
//! Inventory CRUD and the transactional stock debit behind an application.
//!
//! ## Applying an Agrochemical
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply(id, cost)                                                        │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE agrochemicals                                                 │
//! │       SET quantity = quantity - :qty                                    │
//! │     WHERE id = :id AND quantity >= :qty                                 │
//! │       │                                                                 │
//! │       ├── 0 rows → re-read → NotFound | InsufficientStock   ROLLBACK    │
//! │       │                                                                 │
//! │       ▼ 1 row                                                           │
//! │    INSERT INTO expense_records (...)                                    │
//! │    SELECT updated agrochemical                                          │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock check lives in the `WHERE` clause, so two concurrent
//! applications can never both succeed against stock that only covers one.

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{debug, info};

use super::expense::insert_expense;
use super::{generate_id, now_timestamp};
use crate::error::{DbError, DbResult};
use ruralis_core::{Agrochemical, AppliedAgrochemical, ApplicationCost, ExpenseRecord, NewAgrochemical};

const SELECT_AGROCHEMICALS: &str = r#"
    SELECT id, name, quantity, unit, unit_price, currency
    FROM agrochemicals
"#;

/// Result of [`AgrochemicalRepository::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// Stock was debited and the expense recorded.
    Applied(AppliedAgrochemical),

    /// No agrochemical with that id. Nothing was written.
    NotFound,

    /// Current stock doesn't cover the requested quantity. Nothing was
    /// written; carries the agrochemical as it was read inside the
    /// transaction.
    InsufficientStock(Agrochemical),
}

async fn fetch_by_id<'e, E>(executor: E, id: &str) -> DbResult<Option<Agrochemical>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SELECT_AGROCHEMICALS} WHERE id = ?1");

    let agrochemical = sqlx::query_as::<_, Agrochemical>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(agrochemical)
}

/// Repository for agrochemical database operations.
#[derive(Debug, Clone)]
pub struct AgrochemicalRepository {
    pool: SqlitePool,
}

impl AgrochemicalRepository {
    /// Creates a new AgrochemicalRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AgrochemicalRepository { pool }
    }

    /// Inserts an agrochemical with a freshly generated id.
    pub async fn insert(&self, new_agro: &NewAgrochemical) -> DbResult<Agrochemical> {
        let agrochemical = Agrochemical {
            id: generate_id(),
            name: new_agro.name.clone(),
            quantity: new_agro.quantity,
            unit: new_agro.unit.clone(),
            unit_price: new_agro.unit_price,
            currency: new_agro.currency,
        };

        debug!(
            id = %agrochemical.id,
            name = %agrochemical.name,
            currency = %agrochemical.currency,
            "Inserting agrochemical"
        );

        sqlx::query(
            r#"
            INSERT INTO agrochemicals (id, name, quantity, unit, unit_price, currency)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&agrochemical.id)
        .bind(&agrochemical.name)
        .bind(agrochemical.quantity)
        .bind(&agrochemical.unit)
        .bind(agrochemical.unit_price)
        .bind(agrochemical.currency)
        .execute(&self.pool)
        .await?;

        Ok(agrochemical)
    }

    /// Lists all agrochemicals ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Agrochemical>> {
        let sql = format!("{SELECT_AGROCHEMICALS} ORDER BY name COLLATE NOCASE, id");

        let agrochemicals = sqlx::query_as::<_, Agrochemical>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(agrochemicals)
    }

    /// Gets an agrochemical by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Agrochemical>> {
        fetch_by_id(&self.pool, id).await
    }

    /// Finds the first agrochemical with exactly this name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Agrochemical>> {
        let sql = format!("{SELECT_AGROCHEMICALS} WHERE name = ?1 ORDER BY id LIMIT 1");

        let agrochemical = sqlx::query_as::<_, Agrochemical>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(agrochemical)
    }

    /// Deletes an agrochemical. Its expense records are kept.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No agrochemical with that id
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting agrochemical");

        let result = sqlx::query("DELETE FROM agrochemicals WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Agrochemical", id));
        }

        Ok(())
    }

    /// Debits `cost.quantity_applied` from stock and records the expense,
    /// atomically.
    ///
    /// Either both writes happen or neither does. The returned agrochemical
    /// carries the quantity after the debit.
    pub async fn apply(&self, id: &str, cost: &ApplicationCost) -> DbResult<ApplyOutcome> {
        let quantity = cost.quantity_applied;
        debug!(id = %id, quantity, "Applying agrochemical");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let debited = sqlx::query(
            r#"
            UPDATE agrochemicals
            SET quantity = quantity - ?2
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        if debited.rows_affected() == 0 {
            // Dropping `tx` rolls back.
            let outcome = match fetch_by_id(&mut *tx, id).await? {
                None => ApplyOutcome::NotFound,
                Some(current) => ApplyOutcome::InsufficientStock(current),
            };
            debug!(id = %id, ?outcome, "Application rejected");
            return Ok(outcome);
        }

        let expense = ExpenseRecord {
            id: generate_id(),
            agrochemical_id: id.to_string(),
            quantity_applied: quantity,
            cost_in_ars: cost.cost_in_ars,
            cost_in_usd: cost.cost_in_usd,
            timestamp: now_timestamp(),
        };
        insert_expense(&mut *tx, &expense).await?;

        let agrochemical = fetch_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Agrochemical", id))?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            agrochemical_id = %id,
            expense_id = %expense.id,
            quantity,
            remaining = agrochemical.quantity,
            "Application recorded"
        );

        Ok(ApplyOutcome::Applied(AppliedAgrochemical {
            agrochemical,
            expense,
        }))
    }

    /// Counts agrochemicals.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agrochemicals")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use ruralis_core::{Currency, ExchangeRate};

    fn glifosato() -> NewAgrochemical {
        NewAgrochemical {
            name: "Glifosato".to_string(),
            quantity: 100.0,
            unit: "L".to_string(),
            unit_price: 50.0,
            currency: Currency::Ars,
        }
    }

    fn cost_for(agro: &Agrochemical, quantity: f64) -> ApplicationCost {
        let rate = ExchangeRate::new(0.001).unwrap();
        ApplicationCost::compute(agro.unit_price, agro.currency, quantity, rate).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut atrazina = glifosato();
        atrazina.name = "Atrazina".to_string();
        atrazina.currency = Currency::Usd;

        let g = db.agrochemicals().insert(&glifosato()).await.unwrap();
        let a = db.agrochemicals().insert(&atrazina).await.unwrap();

        let listed = db.agrochemicals().list().await.unwrap();
        assert_eq!(listed, vec![a.clone(), g.clone()]);

        let found = db.agrochemicals().get_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(found.currency, Currency::Usd);
        assert_eq!(
            db.agrochemicals().find_by_name("Glifosato").await.unwrap(),
            Some(g)
        );
    }

    #[tokio::test]
    async fn test_apply_debits_stock_and_records_expense() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let agro = db.agrochemicals().insert(&glifosato()).await.unwrap();

        let outcome = db
            .agrochemicals()
            .apply(&agro.id, &cost_for(&agro, 20.0))
            .await
            .unwrap();

        let applied = match outcome {
            ApplyOutcome::Applied(applied) => applied,
            other => panic!("expected Applied, got {other:?}"),
        };
        assert_eq!(applied.agrochemical.quantity, 80.0);
        assert_eq!(applied.expense.agrochemical_id, agro.id);
        assert_eq!(applied.expense.cost_in_ars, 1000.0);
        assert!((applied.expense.cost_in_usd - 1.0).abs() < 1e-9);

        let stored = db.agrochemicals().get_by_id(&agro.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 80.0);
        assert_eq!(db.expenses().list().await.unwrap(), vec![applied.expense]);
    }

    #[tokio::test]
    async fn test_apply_exact_stock_leaves_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let agro = db.agrochemicals().insert(&glifosato()).await.unwrap();

        let outcome = db
            .agrochemicals()
            .apply(&agro.id, &cost_for(&agro, 100.0))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            ApplyOutcome::Applied(ref a) if a.agrochemical.quantity == 0.0
        ));
    }

    #[tokio::test]
    async fn test_apply_insufficient_stock_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut new_agro = glifosato();
        new_agro.quantity = 5.0;
        let agro = db.agrochemicals().insert(&new_agro).await.unwrap();

        let outcome = db
            .agrochemicals()
            .apply(&agro.id, &cost_for(&agro, 20.0))
            .await
            .unwrap();

        assert_eq!(outcome, ApplyOutcome::InsufficientStock(agro.clone()));
        let stored = db.agrochemicals().get_by_id(&agro.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 5.0);
        assert_eq!(db.expenses().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_apply_unknown_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cost =
            ApplicationCost::compute(1.0, Currency::Ars, 1.0, ExchangeRate::fallback()).unwrap();

        let outcome = db.agrochemicals().apply("missing", &cost).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::NotFound);
        assert_eq!(db.expenses().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_applications_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("ruralis.db")))
            .await
            .unwrap();
        let agro = db.agrochemicals().insert(&glifosato()).await.unwrap();
        let cost = cost_for(&agro, 30.0);

        let mut handles = Vec::new();
        for _ in 0..6 {
            let repo = db.agrochemicals();
            let id = agro.id.clone();
            handles.push(tokio::spawn(async move { repo.apply(&id, &cost).await }));
        }

        let mut applied = 0;
        for handle in handles {
            if let Ok(ApplyOutcome::Applied(_)) = handle.await.unwrap() {
                applied += 1;
            }
        }

        // 100 L covers three 30 L applications.
        assert_eq!(applied, 3);
        let stored = db.agrochemicals().get_by_id(&agro.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 10.0);
        assert_eq!(db.expenses().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_keeps_expense_history() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let agro = db.agrochemicals().insert(&glifosato()).await.unwrap();
        db.agrochemicals()
            .apply(&agro.id, &cost_for(&agro, 10.0))
            .await
            .unwrap();

        db.agrochemicals().delete(&agro.id).await.unwrap();

        assert!(db.agrochemicals().get_by_id(&agro.id).await.unwrap().is_none());
        assert_eq!(db.expenses().list_for_agrochemical(&agro.id).await.unwrap().len(), 1);

        let err = db.agrochemicals().delete(&agro.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
