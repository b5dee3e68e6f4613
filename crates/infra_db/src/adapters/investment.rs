//! PostgreSQL implementations of the investment domain ports
//!
//! Adapters translate between domain entities and database rows, and
//! between `DatabaseError` and `PortError`. All SQL lives in the
//! repositories; the adapters add no queries of their own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use core_kernel::{Currency, DomainPort, InvestmentId, Money, PortError, Rate, UserId};
use domain_investment::{
    Investment, InvestmentPort, InvestmentStatus, NotificationCategory, Notifier, SettleResult,
    SettlementOutcome,
};
use domain_wallet::{LedgerReason, WalletType};

use crate::error::DatabaseError;
use crate::repositories::{InvestmentRepository, InvestmentRow, NewInvestmentRow};
use crate::repositories::NotificationRepository;

/// The platform settles in a single currency; amounts are stored as bare
/// numerics and re-tagged on the way out.
const STORAGE_CURRENCY: Currency = Currency::KES;

fn map_db_error(error: DatabaseError) -> PortError {
    match error {
        DatabaseError::NotFound(message) => PortError::NotFound {
            entity_type: "Record".to_string(),
            id: message,
        },
        DatabaseError::InsufficientFunds {
            required,
            available,
        } => PortError::InsufficientFunds {
            required,
            available,
        },
        DatabaseError::DuplicateEntry(message) => PortError::Conflict { message },
        DatabaseError::ConnectionFailed(message) => PortError::Connection {
            message,
            source: None,
        },
        DatabaseError::PoolExhausted => PortError::Connection {
            message: "connection pool exhausted".to_string(),
            source: None,
        },
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

fn row_to_domain(row: InvestmentRow) -> Result<Investment, PortError> {
    let status: InvestmentStatus = row
        .status
        .parse()
        .map_err(|e: domain_investment::InvestmentError| PortError::internal(e.to_string()))?;

    let duration_days = u32::try_from(row.duration_days)
        .map_err(|_| PortError::internal("negative duration_days in storage"))?;

    Ok(Investment {
        id: InvestmentId::from(row.investment_id),
        user_id: UserId::from(row.user_id),
        fund_name: row.fund_name,
        amount: Money::new(row.amount, STORAGE_CURRENCY),
        rate: Rate::from_percentage(row.rate_percent),
        duration_days,
        start_time: row.start_time,
        end_time: row.end_time,
        wallet_type: WalletType::new(row.wallet_type),
        status,
        paid_out: row.paid_out,
        paid_at: row.paid_at,
        total_earned: row
            .total_earned
            .map(|t| Money::new(t, STORAGE_CURRENCY)),
    })
}

fn money(amount: Decimal) -> Money {
    Money::new(amount, STORAGE_CURRENCY)
}

/// PostgreSQL-backed [`InvestmentPort`]
#[derive(Debug, Clone)]
pub struct PostgresInvestmentAdapter {
    repository: InvestmentRepository,
}

impl PostgresInvestmentAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InvestmentRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresInvestmentAdapter {}

#[async_trait]
impl InvestmentPort for PostgresInvestmentAdapter {
    async fn create_investment(&self, investment: &Investment) -> Result<Money, PortError> {
        let new = NewInvestmentRow {
            investment_id: *investment.id.as_uuid(),
            user_id: *investment.user_id.as_uuid(),
            fund_name: investment.fund_name.clone(),
            amount: investment.amount.amount(),
            rate_percent: investment.rate.as_percentage(),
            duration_days: i32::try_from(investment.duration_days)
                .map_err(|_| PortError::validation("duration_days out of range"))?,
            start_time: investment.start_time,
            end_time: investment.end_time,
            wallet_type: investment.wallet_type.to_string(),
        };

        let new_balance = self.repository.create(&new).await.map_err(map_db_error)?;
        Ok(money(new_balance))
    }

    async fn get_investment(&self, id: InvestmentId) -> Result<Investment, PortError> {
        let row = self
            .repository
            .find_by_id(*id.as_uuid())
            .await
            .map_err(map_db_error)?;
        row_to_domain(row)
    }

    async fn find_matured(&self, now: DateTime<Utc>) -> Result<Vec<Investment>, PortError> {
        let rows = self
            .repository
            .find_matured(now)
            .await
            .map_err(map_db_error)?;
        rows.into_iter().map(row_to_domain).collect()
    }

    async fn settle(
        &self,
        id: InvestmentId,
        total_earned: Money,
        outcome: SettlementOutcome,
        now: DateTime<Utc>,
    ) -> Result<SettleResult, PortError> {
        let ledger_reason = match outcome {
            SettlementOutcome::Completed => LedgerReason::PayoutCredit,
            SettlementOutcome::Cancelled => LedgerReason::RefundCredit,
        };

        let settled = self
            .repository
            .settle(
                *id.as_uuid(),
                total_earned.amount(),
                outcome.status().as_str(),
                ledger_reason.as_str(),
                now,
            )
            .await
            .map_err(map_db_error)?;

        match settled {
            Some((_user_id, new_balance)) => Ok(SettleResult::Settled {
                new_balance: money(new_balance),
            }),
            None => Ok(SettleResult::AlreadySettled),
        }
    }

    async fn wallet_balance(&self, user_id: UserId) -> Result<Money, PortError> {
        let balance = self
            .repository
            .wallet_balance(*user_id.as_uuid())
            .await
            .map_err(map_db_error)?;
        Ok(money(balance))
    }

    async fn count_active_for_fund(&self, fund_name: &str) -> Result<u64, PortError> {
        let count = self
            .repository
            .count_active_for_fund(fund_name)
            .await
            .map_err(map_db_error)?;
        Ok(count.max(0) as u64)
    }
}

/// PostgreSQL-backed [`Notifier`]
///
/// Writes in-app notification rows. Callers treat failures as non-fatal.
#[derive(Debug, Clone)]
pub struct PostgresNotifier {
    repository: NotificationRepository,
}

impl PostgresNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: NotificationRepository::new(pool),
        }
    }
}

#[async_trait]
impl Notifier for PostgresNotifier {
    async fn notify(
        &self,
        user_id: UserId,
        message: &str,
        category: NotificationCategory,
    ) -> Result<(), PortError> {
        self.repository
            .insert(*user_id.as_uuid(), message, category.as_str())
            .await
            .map_err(map_db_error)
    }
}
