//! Investment Domain Ports
//!
//! This module defines the port interfaces the settlement service drives,
//! enabling swappable implementations:
//!
//! - **Internal Adapter**: PostgreSQL (infra_db), where each port method is
//!   one database transaction
//! - **Mock Adapter**: in-memory, for testing without a database
//!
//! # Transactional contract
//!
//! Port methods are the atomic units of the system. `create_investment`
//! debits the wallet and inserts the row in one transaction; `settle`
//! performs the conditional status update and the wallet credit in one
//! transaction. An adapter must never expose a state where the wallet moved
//! but the investment did not, or vice versa.
//!
//! # Idempotency
//!
//! `settle` must be safe to invoke twice, concurrently or after a restart,
//! for the same investment id: at most one invocation credits the wallet;
//! the other observes [`SettleResult::AlreadySettled`] and mutates nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, InvestmentId, Money, PortError, UserId};

use crate::investment::{Investment, SettlementOutcome};

/// Outcome of a settlement attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SettleResult {
    /// This attempt won the conditional update and applied the credit
    Settled {
        /// The user's post-credit balance
        new_balance: Money,
    },
    /// The conditional update affected zero rows: someone settled first.
    /// Benign no-op, no ledger mutation happened.
    AlreadySettled,
}

/// The storage port for the investment lifecycle
///
/// All money movement triggered through this port flows through the wallet
/// mutation rule in `domain_wallet`; adapters record a ledger entry for
/// every applied delta.
#[async_trait]
pub trait InvestmentPort: DomainPort {
    /// Atomically debits the owner's wallet by the principal and persists
    /// the investment
    ///
    /// # Returns
    ///
    /// The user's post-debit balance
    ///
    /// # Errors
    ///
    /// - `PortError::InsufficientFunds` if the debit would go negative;
    ///   nothing is persisted
    /// - `PortError::NotFound` if the user has no wallet
    async fn create_investment(&self, investment: &Investment) -> Result<Money, PortError>;

    /// Retrieves an investment by id
    async fn get_investment(&self, id: InvestmentId) -> Result<Investment, PortError>;

    /// Returns all investments eligible for settlement at `now`
    ///
    /// Eligibility: `status = active AND paid_out = false AND
    /// end_time <= now` (inclusive boundary). Single consistent read.
    async fn find_matured(&self, now: DateTime<Utc>) -> Result<Vec<Investment>, PortError>;

    /// Atomically settles one investment: conditional transition out of
    /// `active`, then credit `total_earned` to the owner's wallet
    ///
    /// The status update is conditional on the row still being unsettled;
    /// if it affects zero rows the attempt returns `AlreadySettled` and no
    /// credit is applied.
    async fn settle(
        &self,
        id: InvestmentId,
        total_earned: Money,
        outcome: SettlementOutcome,
        now: DateTime<Utc>,
    ) -> Result<SettleResult, PortError>;

    /// Reads a user's current wallet balance
    async fn wallet_balance(&self, user_id: UserId) -> Result<Money, PortError>;

    /// Counts currently active investments in a fund, for capacity checks
    async fn count_active_for_fund(&self, fund_name: &str) -> Result<u64, PortError>;
}

/// Category tag for user notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Investment,
    Payout,
    Refund,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Investment => "investment",
            NotificationCategory::Payout => "payout",
            NotificationCategory::Refund => "refund",
        }
    }
}

/// Fire-and-forget notification seam
///
/// Callers treat failures as non-fatal: they are logged and swallowed,
/// never rolled back into the operation that produced them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        user_id: UserId,
        message: &str,
        category: NotificationCategory,
    ) -> Result<(), PortError>;
}

/// In-memory mock adapters for testing
///
/// The mock guards all state behind one async mutex so that each port
/// method is atomic, mirroring the single-transaction guarantee of the
/// PostgreSQL adapter. A failure-injection switch makes the wallet credit
/// inside `settle` fail without mutating anything, which is how the
/// atomicity-under-failure property is tested.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    use core_kernel::Currency;
    use domain_wallet::{LedgerEntry, LedgerReason, Wallet, WalletError, WalletType};

    #[derive(Debug, Default)]
    struct MockState {
        wallets: HashMap<UserId, Wallet>,
        investments: HashMap<InvestmentId, Investment>,
        ledger: Vec<LedgerEntry>,
    }

    /// In-memory implementation of [`InvestmentPort`]
    #[derive(Debug, Default)]
    pub struct MockInvestmentPort {
        state: Arc<Mutex<MockState>>,
        fail_next_credit: AtomicBool,
    }

    impl MockInvestmentPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds a user wallet with an opening balance
        pub async fn seed_wallet(&self, user_id: UserId, balance: Money) {
            let wallet = Wallet::new(user_id, balance, WalletType::main())
                .expect("non-negative seed balance");
            self.state.lock().await.wallets.insert(user_id, wallet);
        }

        /// Makes the next wallet credit inside `settle` fail, simulating a
        /// mid-transaction storage failure that rolls back
        pub fn fail_next_credit(&self) {
            self.fail_next_credit.store(true, Ordering::SeqCst);
        }

        /// Snapshot of all recorded ledger entries
        pub async fn ledger_entries(&self) -> Vec<LedgerEntry> {
            self.state.lock().await.ledger.clone()
        }

        /// Snapshot of all stored investments
        pub async fn investments(&self) -> Vec<Investment> {
            self.state.lock().await.investments.values().cloned().collect()
        }

        fn map_wallet_error(e: WalletError) -> PortError {
            match e {
                WalletError::InsufficientFunds {
                    required,
                    available,
                } => PortError::InsufficientFunds {
                    required,
                    available,
                },
                WalletError::CurrencyMismatch(msg) => PortError::validation(msg),
            }
        }
    }

    impl DomainPort for MockInvestmentPort {}

    #[async_trait]
    impl InvestmentPort for MockInvestmentPort {
        async fn create_investment(&self, investment: &Investment) -> Result<Money, PortError> {
            let mut state = self.state.lock().await;

            if state.investments.contains_key(&investment.id) {
                return Err(PortError::conflict(format!(
                    "investment {} already exists",
                    investment.id
                )));
            }

            let wallet = state
                .wallets
                .get_mut(&investment.user_id)
                .ok_or_else(|| PortError::not_found("Wallet", investment.user_id))?;

            let new_balance = wallet
                .apply_delta(-investment.amount)
                .map_err(Self::map_wallet_error)?;

            let entry = LedgerEntry::debit(
                investment.user_id,
                investment.amount,
                LedgerReason::InvestmentDebit,
                Some(*investment.id.as_uuid()),
            );
            state.ledger.push(entry);
            state.investments.insert(investment.id, investment.clone());

            Ok(new_balance)
        }

        async fn get_investment(&self, id: InvestmentId) -> Result<Investment, PortError> {
            self.state
                .lock()
                .await
                .investments
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Investment", id))
        }

        async fn find_matured(&self, now: DateTime<Utc>) -> Result<Vec<Investment>, PortError> {
            let state = self.state.lock().await;
            let mut matured: Vec<Investment> = state
                .investments
                .values()
                .filter(|i| i.is_unsettled() && i.is_matured(now))
                .cloned()
                .collect();
            matured.sort_by_key(|i| i.end_time);
            Ok(matured)
        }

        async fn settle(
            &self,
            id: InvestmentId,
            total_earned: Money,
            outcome: SettlementOutcome,
            now: DateTime<Utc>,
        ) -> Result<SettleResult, PortError> {
            let mut state = self.state.lock().await;

            let investment = state
                .investments
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Investment", id))?;

            // Conditional update: settled rows are left alone
            if !investment.is_unsettled() {
                return Ok(SettleResult::AlreadySettled);
            }

            // Injected failure before anything mutates: the whole attempt
            // rolls back, the investment stays active
            if self.fail_next_credit.swap(false, Ordering::SeqCst) {
                return Err(PortError::internal("injected credit failure"));
            }

            let user_id = investment.user_id;
            let wallet = state
                .wallets
                .get_mut(&user_id)
                .ok_or_else(|| PortError::not_found("Wallet", user_id))?;
            let new_balance = wallet
                .apply_delta(total_earned)
                .map_err(Self::map_wallet_error)?;

            let reason = match outcome {
                SettlementOutcome::Completed => LedgerReason::PayoutCredit,
                SettlementOutcome::Cancelled => LedgerReason::RefundCredit,
            };
            let entry = LedgerEntry::credit(user_id, total_earned, reason, Some(*id.as_uuid()));
            state.ledger.push(entry);

            let stored = state
                .investments
                .get_mut(&id)
                .expect("investment present under lock");
            stored
                .mark_settled(total_earned, outcome, now)
                .map_err(|e| PortError::internal(e.to_string()))?;

            Ok(SettleResult::Settled { new_balance })
        }

        async fn wallet_balance(&self, user_id: UserId) -> Result<Money, PortError> {
            self.state
                .lock()
                .await
                .wallets
                .get(&user_id)
                .map(|w| w.balance())
                .ok_or_else(|| PortError::not_found("Wallet", user_id))
        }

        async fn count_active_for_fund(&self, fund_name: &str) -> Result<u64, PortError> {
            let state = self.state.lock().await;
            Ok(state
                .investments
                .values()
                .filter(|i| i.fund_name == fund_name && i.is_unsettled())
                .count() as u64)
        }
    }

    /// A recorded notification
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentNotification {
        pub user_id: UserId,
        pub message: String,
        pub category: NotificationCategory,
    }

    /// In-memory implementation of [`Notifier`]
    #[derive(Debug, Default)]
    pub struct MockNotifier {
        sent: Mutex<Vec<SentNotification>>,
        fail: AtomicBool,
    }

    impl MockNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every subsequent notify call fail
        pub fn fail_all(&self) {
            self.fail.store(true, Ordering::SeqCst);
        }

        /// Snapshot of delivered notifications
        pub async fn sent(&self) -> Vec<SentNotification> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn notify(
            &self,
            user_id: UserId,
            message: &str,
            category: NotificationCategory,
        ) -> Result<(), PortError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PortError::connection("notification channel down"));
            }
            self.sent.lock().await.push(SentNotification {
                user_id,
                message: message.to_string(),
                category,
            });
            Ok(())
        }
    }

    /// Default opening balance currency for mock wallets
    pub fn kes(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::KES)
    }
}
