//! Investment lifecycle service
//!
//! Orchestration over the storage port: creation with policy validation,
//! the scheduled maturity settlement pass, and administrative cancellation.
//! All money movement is delegated to the port, whose methods are the
//! atomic transaction units; the service never holds state that must
//! survive a crash.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use core_kernel::{InvestmentId, Money, UserId};
use domain_investment::{
    payout, Investment, InvestmentPort, NotificationCategory, Notifier, PolicyBook, SettleResult,
    SettlementOutcome,
};

use crate::error::ServiceError;

/// Tally of one settlement pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettlementSummary {
    /// Investments the scan found eligible
    pub scanned: usize,
    /// Successfully settled in this pass
    pub settled: usize,
    /// Lost the conditional update to a concurrent settler; benign
    pub already_settled: usize,
    /// Errored; stay eligible for the next pass
    pub failed: usize,
    /// Sum of all credits applied in this pass
    pub total_paid: Option<Money>,
}

impl SettlementSummary {
    fn record_paid(&mut self, amount: Money) {
        self.total_paid = Some(match self.total_paid {
            Some(t) => t + amount,
            None => amount,
        });
    }
}

/// Tally of an administrative cancellation batch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CancellationSummary {
    /// Refunded in this batch
    pub cancelled: usize,
    /// Already settled before the batch reached them; skipped
    pub already_settled: usize,
    /// Unknown ids or port failures
    pub failed: usize,
    /// Sum of principals refunded
    pub total_refunded: Option<Money>,
    /// Refunds grouped by owning user, for the operator's report
    pub refunds_by_user: HashMap<UserId, Money>,
}

impl CancellationSummary {
    fn record_refund(&mut self, user_id: UserId, refund: Money) {
        self.cancelled += 1;
        self.total_refunded = Some(match self.total_refunded {
            Some(t) => t + refund,
            None => refund,
        });
        self.refunds_by_user
            .entry(user_id)
            .and_modify(|t| *t = *t + refund)
            .or_insert(refund);
    }
}

/// The investment lifecycle orchestrator
///
/// Generic over the storage and notification ports so tests run against
/// the in-memory mock and production against PostgreSQL.
pub struct InvestmentService<P, N> {
    port: Arc<P>,
    notifier: Arc<N>,
    policies: PolicyBook,
}

impl<P, N> InvestmentService<P, N>
where
    P: InvestmentPort,
    N: Notifier,
{
    pub fn new(port: Arc<P>, notifier: Arc<N>, policies: PolicyBook) -> Self {
        Self {
            port,
            notifier,
            policies,
        }
    }

    /// The policy book this service validates against
    pub fn policies(&self) -> &PolicyBook {
        &self.policies
    }

    /// Creates an investment for a user in the named fund
    ///
    /// Validates the amount against the fund policy and the fund's
    /// capacity, then atomically debits the wallet and persists the
    /// investment. The rate and duration are copied from the policy onto
    /// the investment, so later policy edits never affect it.
    ///
    /// # Returns
    ///
    /// The created investment and the user's post-debit balance
    pub async fn create_investment(
        &self,
        user_id: UserId,
        fund_name: &str,
        amount: Money,
        now: DateTime<Utc>,
    ) -> Result<(Investment, Money), ServiceError> {
        let policy = self.policies.get(fund_name)?;
        policy.validate_amount(&amount)?;

        // The count runs outside the insert transaction, so two concurrent
        // creations can both pass with one slot left. Capacity is an
        // admission control, not a hard invariant; the next check sees the
        // true count.
        if policy.capacity.is_some() {
            let active = self.port.count_active_for_fund(fund_name).await?;
            if !policy.has_capacity(active) {
                return Err(
                    domain_investment::InvestmentError::FundAtCapacity(fund_name.to_string())
                        .into(),
                );
            }
        }

        let investment = Investment::new(
            user_id,
            fund_name,
            amount,
            policy.daily_rate,
            policy.duration_days,
            domain_wallet::WalletType::main(),
            now,
        )?;

        let new_balance = self.port.create_investment(&investment).await?;

        info!(
            investment_id = %investment.id,
            user_id = %user_id,
            fund = fund_name,
            amount = %amount,
            "investment created"
        );

        self.notify_best_effort(
            user_id,
            &format!(
                "Your investment of {} in {} is confirmed. It matures in {} days.",
                amount, fund_name, investment.duration_days
            ),
            NotificationCategory::Investment,
        )
        .await;

        Ok((investment, new_balance))
    }

    /// Runs one maturity settlement pass at `now`
    ///
    /// Scans for eligible investments, then settles each independently: a
    /// failure on one is logged and counted, never aborts the rest. A
    /// crash mid-pass loses nothing; unsettled rows stay eligible and the
    /// next pass picks them up.
    pub async fn run_maturity_settlement(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SettlementSummary, ServiceError> {
        let matured = self.port.find_matured(now).await?;
        let mut summary = SettlementSummary {
            scanned: matured.len(),
            ..SettlementSummary::default()
        };

        for investment in &matured {
            match self.settle_matured(investment, now).await {
                Ok(Some(total)) => {
                    summary.settled += 1;
                    summary.record_paid(total);
                }
                Ok(None) => summary.already_settled += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(
                        investment_id = %investment.id,
                        error = %e,
                        "settlement failed, will retry next pass"
                    );
                }
            }
        }

        info!(
            scanned = summary.scanned,
            settled = summary.settled,
            already_settled = summary.already_settled,
            failed = summary.failed,
            "settlement pass complete"
        );

        Ok(summary)
    }

    /// Settles one matured investment, returning the credited total if
    /// this attempt won the conditional update
    async fn settle_matured(
        &self,
        investment: &Investment,
        now: DateTime<Utc>,
    ) -> Result<Option<Money>, ServiceError> {
        let computed = payout(
            investment.amount,
            investment.rate,
            investment.duration_days,
        );

        let result = self
            .port
            .settle(
                investment.id,
                computed.total,
                SettlementOutcome::Completed,
                now,
            )
            .await?;

        match result {
            SettleResult::Settled { new_balance } => {
                info!(
                    investment_id = %investment.id,
                    user_id = %investment.user_id,
                    total = %computed.total,
                    balance = %new_balance,
                    "investment matured and paid out"
                );

                self.notify_best_effort(
                    investment.user_id,
                    &format!(
                        "Your {} investment has matured. {} (principal {} + earnings {}) \
                         has been credited to your wallet.",
                        investment.fund_name,
                        computed.total,
                        computed.principal,
                        computed.interest
                    ),
                    NotificationCategory::Payout,
                )
                .await;

                Ok(Some(computed.total))
            }
            SettleResult::AlreadySettled => Ok(None),
        }
    }

    /// Cancels a batch of investments, refunding each principal without
    /// interest
    ///
    /// Each cancellation is independent; already-settled investments are
    /// skipped, unknown ids are counted as failures, and neither stops the
    /// batch.
    pub async fn cancel_investments(
        &self,
        ids: &[InvestmentId],
        now: DateTime<Utc>,
    ) -> Result<CancellationSummary, ServiceError> {
        let mut summary = CancellationSummary::default();

        for &id in ids {
            match self.cancel_one(id, now).await {
                Ok(Some((user_id, refund))) => summary.record_refund(user_id, refund),
                Ok(None) => summary.already_settled += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(investment_id = %id, error = %e, "cancellation failed");
                }
            }
        }

        info!(
            cancelled = summary.cancelled,
            already_settled = summary.already_settled,
            failed = summary.failed,
            "cancellation batch complete"
        );

        Ok(summary)
    }

    async fn cancel_one(
        &self,
        id: InvestmentId,
        now: DateTime<Utc>,
    ) -> Result<Option<(UserId, Money)>, ServiceError> {
        let investment = self.port.get_investment(id).await?;

        // Refund is the principal exactly, no interest
        let result = self
            .port
            .settle(id, investment.amount, SettlementOutcome::Cancelled, now)
            .await?;

        match result {
            SettleResult::Settled { .. } => {
                info!(
                    investment_id = %id,
                    user_id = %investment.user_id,
                    refund = %investment.amount,
                    "investment cancelled and refunded"
                );

                self.notify_best_effort(
                    investment.user_id,
                    &format!(
                        "Your {} investment was cancelled. The principal of {} has been \
                         refunded to your wallet.",
                        investment.fund_name, investment.amount
                    ),
                    NotificationCategory::Refund,
                )
                .await;

                Ok(Some((investment.user_id, investment.amount)))
            }
            SettleResult::AlreadySettled => Ok(None),
        }
    }

    /// Delivers a notification, logging and swallowing failures
    ///
    /// Delivery happens after the settlement transaction committed; a
    /// failed notification must never undo a payout.
    async fn notify_best_effort(
        &self,
        user_id: UserId,
        message: &str,
        category: NotificationCategory,
    ) {
        if let Err(e) = self.notifier.notify(user_id, message, category).await {
            warn!(user_id = %user_id, error = %e, "notification delivery failed");
        }
    }
}
