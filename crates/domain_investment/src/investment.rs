//! Investment entity and lifecycle state machine

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{InvestmentId, Money, Rate, UserId};
use domain_wallet::WalletType;

use crate::error::InvestmentError;

/// Lifecycle status of an investment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    /// Running; eligible for settlement once the term elapses
    Active,
    /// Matured and paid out (principal + interest)
    Completed,
    /// Reversed before maturity (principal refunded, no interest)
    Cancelled,
}

impl InvestmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Active => "active",
            InvestmentStatus::Completed => "completed",
            InvestmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvestmentStatus {
    type Err = InvestmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(InvestmentStatus::Active),
            "completed" => Ok(InvestmentStatus::Completed),
            "cancelled" => Ok(InvestmentStatus::Cancelled),
            other => Err(InvestmentError::InvalidStateTransition(format!(
                "unknown status '{}'",
                other
            ))),
        }
    }
}

/// How a settlement left the investment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// Normal maturity: payout = principal + interest
    Completed,
    /// Administrative reversal: refund = principal, no interest
    Cancelled,
}

impl SettlementOutcome {
    /// The terminal status this outcome transitions to
    pub fn status(&self) -> InvestmentStatus {
        match self {
            SettlementOutcome::Completed => InvestmentStatus::Completed,
            SettlementOutcome::Cancelled => InvestmentStatus::Cancelled,
        }
    }
}

/// A user's committed stake in a fund policy
///
/// # Invariants
///
/// - `end_time = start_time + duration_days`, fixed at creation and never
///   recomputed.
/// - `paid_out == true` ⇔ `status != Active` ⇔ `paid_at.is_some()`.
/// - A settled investment never receives a second credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    /// Unique identifier
    pub id: InvestmentId,
    /// Owning user
    pub user_id: UserId,
    /// Name of the fund policy this was created from
    pub fund_name: String,
    /// Principal committed (positive, currency precision)
    pub amount: Money,
    /// Daily interest rate, copied from the policy at creation
    pub rate: Rate,
    /// Term in whole days, copied from the policy at creation
    pub duration_days: u32,
    /// When the term started
    pub start_time: DateTime<Utc>,
    /// When the term elapses; settlement eligibility is inclusive of this
    /// instant
    pub end_time: DateTime<Utc>,
    /// Which wallet funded the principal
    pub wallet_type: WalletType,
    /// Lifecycle status
    pub status: InvestmentStatus,
    /// Whether the payout/refund has been credited
    pub paid_out: bool,
    /// When settlement happened
    pub paid_at: Option<DateTime<Utc>>,
    /// Total amount credited at settlement
    pub total_earned: Option<Money>,
}

impl Investment {
    /// Creates a new active investment, stamping `start_time = now` and the
    /// derived `end_time`
    ///
    /// Amount validation against the fund policy happens before this
    /// constructor is reached; it still refuses non-positive principals as
    /// a last line of defense for callers that bypass the policy book.
    pub fn new(
        user_id: UserId,
        fund_name: impl Into<String>,
        amount: Money,
        rate: Rate,
        duration_days: u32,
        wallet_type: WalletType,
        now: DateTime<Utc>,
    ) -> Result<Self, InvestmentError> {
        if !amount.is_positive() {
            return Err(InvestmentError::InvalidAmount(amount.amount()));
        }

        Ok(Self {
            id: InvestmentId::new_v7(),
            user_id,
            fund_name: fund_name.into(),
            amount: amount.round_to_currency(),
            rate,
            duration_days,
            start_time: now,
            end_time: now + Duration::days(i64::from(duration_days)),
            wallet_type,
            status: InvestmentStatus::Active,
            paid_out: false,
            paid_at: None,
            total_earned: None,
        })
    }

    /// Returns true if the term has elapsed at `now` (inclusive boundary)
    pub fn is_matured(&self, now: DateTime<Utc>) -> bool {
        self.end_time <= now
    }

    /// Returns true if this investment is still awaiting settlement
    pub fn is_unsettled(&self) -> bool {
        self.status == InvestmentStatus::Active && !self.paid_out
    }

    /// Transitions to a terminal status, recording the credited total
    ///
    /// This is the application-level mirror of the storage layer's
    /// conditional update: it refuses to settle twice.
    ///
    /// # Errors
    ///
    /// Returns `InvestmentError::AlreadySettled` if the investment has
    /// already been paid out.
    pub fn mark_settled(
        &mut self,
        total_earned: Money,
        outcome: SettlementOutcome,
        now: DateTime<Utc>,
    ) -> Result<(), InvestmentError> {
        if self.paid_out || self.status != InvestmentStatus::Active {
            return Err(InvestmentError::AlreadySettled);
        }

        self.status = outcome.status();
        self.paid_out = true;
        self.paid_at = Some(now);
        self.total_earned = Some(total_earned.round_to_currency());
        Ok(())
    }

    /// Checks the settlement invariant
    pub fn invariant_holds(&self) -> bool {
        let settled = self.status != InvestmentStatus::Active;
        self.paid_out == settled && self.paid_at.is_some() == settled
    }
}
