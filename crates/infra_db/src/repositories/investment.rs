//! Investment repository implementation
//!
//! Database access for the investment lifecycle. The two money-moving
//! operations (`create`, `settle`) are each a single transaction combining
//! the row mutation with the wallet delta from [`crate::repositories::wallet`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::wallet::apply_wallet_delta;

const INVESTMENT_COLUMNS: &str = "investment_id, user_id, fund_name, amount, rate_percent, \
     duration_days, start_time, end_time, wallet_type, status, paid_out, paid_at, \
     total_earned, created_at, updated_at";

/// Repository for investment rows
#[derive(Debug, Clone)]
pub struct InvestmentRepository {
    pool: PgPool,
}

impl InvestmentRepository {
    /// Creates a new InvestmentRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an investment and debits the owner's wallet in one
    /// transaction
    ///
    /// # Returns
    ///
    /// The user's post-debit balance
    ///
    /// # Errors
    ///
    /// - `DatabaseError::InsufficientFunds` rolls back with nothing
    ///   persisted
    /// - `DatabaseError::NotFound` if the user has no wallet row
    pub async fn create(&self, new: &NewInvestmentRow) -> Result<Decimal, DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_sqlx)?;
        let now = Utc::now();

        let new_balance = apply_wallet_delta(
            &mut tx,
            new.user_id,
            -new.amount,
            "investment_debit",
            Some(new.investment_id),
            now,
        )
        .await?;

        sqlx::query(
            "INSERT INTO investments (investment_id, user_id, fund_name, amount, rate_percent, \
             duration_days, start_time, end_time, wallet_type, status, paid_out, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active', FALSE, $10, $10)",
        )
        .bind(new.investment_id)
        .bind(new.user_id)
        .bind(&new.fund_name)
        .bind(new.amount)
        .bind(new.rate_percent)
        .bind(new.duration_days)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(&new.wallet_type)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        tx.commit().await.map_err(DatabaseError::from_sqlx)?;

        debug!(investment_id = %new.investment_id, user_id = %new.user_id, "investment created");
        Ok(new_balance)
    }

    /// Retrieves an investment by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<InvestmentRow, DatabaseError> {
        let query = format!(
            "SELECT {INVESTMENT_COLUMNS} FROM investments WHERE investment_id = $1"
        );
        sqlx::query_as::<_, InvestmentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?
            .ok_or_else(|| DatabaseError::not_found("Investment", id))
    }

    /// Returns all rows eligible for settlement at `now`
    ///
    /// A single consistent read; the inclusive `end_time <= now` bound is
    /// the eligibility boundary.
    pub async fn find_matured(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<InvestmentRow>, DatabaseError> {
        let query = format!(
            "SELECT {INVESTMENT_COLUMNS} FROM investments \
             WHERE status = 'active' AND paid_out = FALSE AND end_time <= $1 \
             ORDER BY end_time"
        );
        sqlx::query_as::<_, InvestmentRow>(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// Settles one investment: conditional status transition plus wallet
    /// credit, in one transaction
    ///
    /// The update carries `WHERE paid_out = FALSE`, so a concurrent
    /// duplicate attempt affects zero rows and is reported as `Ok(None)`
    /// with no credit applied. This row-level predicate, not application
    /// state, is what guarantees at-most-once payout.
    ///
    /// # Returns
    ///
    /// `Some((user_id, new_balance))` if this attempt won the update,
    /// `None` if the row was already settled
    pub async fn settle(
        &self,
        id: Uuid,
        total_earned: Decimal,
        status: &str,
        ledger_reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(Uuid, Decimal)>, DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_sqlx)?;

        let updated: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE investments \
             SET status = $2, paid_out = TRUE, paid_at = $3, total_earned = $4, updated_at = $3 \
             WHERE investment_id = $1 AND status = 'active' AND paid_out = FALSE \
             RETURNING user_id",
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .bind(total_earned)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        let Some((user_id,)) = updated else {
            tx.rollback().await.map_err(DatabaseError::from_sqlx)?;
            debug!(investment_id = %id, "settlement skipped, row already settled");
            return Ok(None);
        };

        let new_balance = apply_wallet_delta(
            &mut tx,
            user_id,
            total_earned,
            ledger_reason,
            Some(id),
            now,
        )
        .await?;

        tx.commit().await.map_err(DatabaseError::from_sqlx)?;

        debug!(investment_id = %id, user_id = %user_id, %total_earned, "investment settled");
        Ok(Some((user_id, new_balance)))
    }

    /// Reads a user's current wallet balance
    pub async fn wallet_balance(&self, user_id: Uuid) -> Result<Decimal, DatabaseError> {
        let row: Option<(Decimal,)> =
            sqlx::query_as("SELECT balance FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DatabaseError::from_sqlx)?;
        row.map(|(b,)| b)
            .ok_or_else(|| DatabaseError::not_found("User", user_id))
    }

    /// Counts currently active investments in a fund
    pub async fn count_active_for_fund(&self, fund_name: &str) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM investments \
             WHERE fund_name = $1 AND status = 'active' AND paid_out = FALSE",
        )
        .bind(fund_name)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;
        Ok(count)
    }
}

/// Parameters for inserting a new investment row
#[derive(Debug, Clone)]
pub struct NewInvestmentRow {
    pub investment_id: Uuid,
    pub user_id: Uuid,
    pub fund_name: String,
    pub amount: Decimal,
    pub rate_percent: Decimal,
    pub duration_days: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub wallet_type: String,
}

/// Database row for an investment
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvestmentRow {
    pub investment_id: Uuid,
    pub user_id: Uuid,
    pub fund_name: String,
    pub amount: Decimal,
    pub rate_percent: Decimal,
    pub duration_days: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub wallet_type: String,
    pub status: String,
    pub paid_out: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub total_earned: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
