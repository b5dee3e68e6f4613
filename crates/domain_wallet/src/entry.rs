//! Ledger entries
//!
//! Every wallet mutation produces one entry. The entry log is append-only,
//! which is what makes conservation-of-funds checks possible: the sum of all
//! investment-debit entries must equal the sum of principals recorded as
//! active or eventually settled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{Money, TransactionId, UserId};

/// Why a wallet balance moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerReason {
    /// Principal committed to an investment
    InvestmentDebit,
    /// Matured investment paid out (principal + interest)
    PayoutCredit,
    /// Cancelled investment refunded (principal only)
    RefundCredit,
    /// Mobile-money recharge
    Recharge,
    /// Withdrawal to mobile money
    Withdrawal,
    /// Micro-task completion reward
    TaskReward,
    /// Referral bonus
    ReferralBonus,
}

impl LedgerReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerReason::InvestmentDebit => "investment_debit",
            LedgerReason::PayoutCredit => "payout_credit",
            LedgerReason::RefundCredit => "refund_credit",
            LedgerReason::Recharge => "recharge",
            LedgerReason::Withdrawal => "withdrawal",
            LedgerReason::TaskReward => "task_reward",
            LedgerReason::ReferralBonus => "referral_bonus",
        }
    }
}

/// A single recorded balance movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier
    pub id: TransactionId,
    /// The user whose wallet moved
    pub user_id: UserId,
    /// Signed amount: negative for debits, positive for credits
    pub amount: Money,
    /// Why the balance moved
    pub reason: LedgerReason,
    /// The entity that caused the movement (e.g., investment id)
    pub reference_id: Option<Uuid>,
    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a debit entry (amount stored negative)
    pub fn debit(
        user_id: UserId,
        amount: Money,
        reason: LedgerReason,
        reference_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: TransactionId::new_v7(),
            user_id,
            amount: -amount.abs(),
            reason,
            reference_id,
            created_at: Utc::now(),
        }
    }

    /// Creates a credit entry (amount stored positive)
    pub fn credit(
        user_id: UserId,
        amount: Money,
        reason: LedgerReason,
        reference_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: TransactionId::new_v7(),
            user_id,
            amount: amount.abs(),
            reason,
            reference_id,
            created_at: Utc::now(),
        }
    }

    /// Returns true if this entry removed money from the wallet
    pub fn is_debit(&self) -> bool {
        self.amount.is_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_entry_is_negative() {
        let entry = LedgerEntry::debit(
            UserId::new(),
            Money::new(dec!(100), Currency::KES),
            LedgerReason::InvestmentDebit,
            None,
        );
        assert!(entry.is_debit());
        assert_eq!(entry.amount.amount(), dec!(-100));
    }

    #[test]
    fn test_credit_entry_is_positive() {
        let entry = LedgerEntry::credit(
            UserId::new(),
            Money::new(dec!(123), Currency::KES),
            LedgerReason::PayoutCredit,
            None,
        );
        assert!(!entry.is_debit());
        assert_eq!(entry.amount.amount(), dec!(123));
    }

    #[test]
    fn test_reason_round_trip() {
        assert_eq!(LedgerReason::RefundCredit.as_str(), "refund_credit");
    }
}
