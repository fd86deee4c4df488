//! # Expense Repository
//!
//! Read side of the expense history, plus the insert used inside the
//! application transaction.
//!
//! Records are append-only: nothing in Ruralis updates or deletes them, and
//! deleting an agrochemical leaves its history in place.

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use ruralis_core::{CostTotals, ExpenseRecord};

const SELECT_EXPENSES: &str = r#"
    SELECT id, agrochemical_id, quantity_applied, cost_in_ars, cost_in_usd, timestamp
    FROM expense_records
"#;

/// Inserts an expense record through any executor (pool or open transaction).
pub(crate) async fn insert_expense<'e, E>(executor: E, expense: &ExpenseRecord) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    debug!(
        id = %expense.id,
        agrochemical_id = %expense.agrochemical_id,
        cost_in_ars = expense.cost_in_ars,
        "Inserting expense record"
    );

    sqlx::query(
        r#"
        INSERT INTO expense_records (
            id, agrochemical_id, quantity_applied, cost_in_ars, cost_in_usd, timestamp
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&expense.id)
    .bind(&expense.agrochemical_id)
    .bind(expense.quantity_applied)
    .bind(expense.cost_in_ars)
    .bind(expense.cost_in_usd)
    .bind(&expense.timestamp)
    .execute(executor)
    .await?;

    Ok(())
}

/// Repository for expense record database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Lists every expense record, oldest first.
    pub async fn list(&self) -> DbResult<Vec<ExpenseRecord>> {
        let sql = format!("{SELECT_EXPENSES} ORDER BY timestamp, rowid");

        let expenses = sqlx::query_as::<_, ExpenseRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(expenses)
    }

    /// Lists the expense records of one agrochemical, oldest first.
    ///
    /// Works for agrochemicals that have since been deleted.
    pub async fn list_for_agrochemical(&self, agrochemical_id: &str) -> DbResult<Vec<ExpenseRecord>> {
        let sql = format!("{SELECT_EXPENSES} WHERE agrochemical_id = ?1 ORDER BY timestamp, rowid");

        let expenses = sqlx::query_as::<_, ExpenseRecord>(&sql)
            .bind(agrochemical_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(expenses)
    }

    /// Sums both cost columns across all records. Zero when empty.
    pub async fn totals(&self) -> DbResult<CostTotals> {
        let (total_ars, total_usd): (f64, f64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(cost_in_ars), 0.0),
                COALESCE(SUM(cost_in_usd), 0.0)
            FROM expense_records
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CostTotals {
            total_ars,
            total_usd,
        })
    }

    /// Counts expense records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expense_records")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
