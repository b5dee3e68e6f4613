//! Comprehensive tests for domain_investment

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money, Rate, UserId};
use domain_wallet::{LedgerReason, WalletType};

use domain_investment::investment::{Investment, InvestmentStatus, SettlementOutcome};
use domain_investment::payout::payout;
use domain_investment::policy::PolicyBook;
use domain_investment::ports::mock::{kes, MockInvestmentPort};
use domain_investment::ports::{InvestmentPort, SettleResult};

fn starter_investment(user_id: UserId, amount: rust_decimal::Decimal) -> Investment {
    Investment::new(
        user_id,
        "Starter",
        Money::new(amount, Currency::KES),
        Rate::from_percentage(dec!(2.3)),
        10,
        WalletType::main(),
        Utc::now() - Duration::days(11),
    )
    .unwrap()
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_full_maturity_transition() {
        let mut inv = starter_investment(UserId::new(), dec!(100));
        let p = payout(inv.amount, inv.rate, inv.duration_days);

        inv.mark_settled(p.total, SettlementOutcome::Completed, Utc::now())
            .unwrap();

        assert_eq!(inv.status, InvestmentStatus::Completed);
        assert_eq!(inv.total_earned.unwrap().amount(), dec!(123.00));
        assert!(inv.invariant_holds());
    }

    #[test]
    fn test_cancellation_refunds_principal_only() {
        let mut inv = starter_investment(UserId::new(), dec!(200));

        inv.mark_settled(inv.amount, SettlementOutcome::Cancelled, Utc::now())
            .unwrap();

        assert_eq!(inv.status, InvestmentStatus::Cancelled);
        assert_eq!(inv.total_earned.unwrap(), inv.amount);
    }

    #[test]
    fn test_terminal_states_reject_further_transitions() {
        for outcome in [SettlementOutcome::Completed, SettlementOutcome::Cancelled] {
            let mut inv = starter_investment(UserId::new(), dec!(100));
            inv.mark_settled(inv.amount, outcome, Utc::now()).unwrap();

            let again = inv.mark_settled(inv.amount, SettlementOutcome::Completed, Utc::now());
            assert!(again.is_err());
        }
    }
}

// ============================================================================
// Policy / Payout Interaction
// ============================================================================

mod policy_payout_tests {
    use super::*;

    #[test]
    fn test_payout_uses_stored_copy_of_rate_and_duration() {
        // The investment carries its own rate/duration; the policy book is
        // not consulted again at settlement time.
        let inv = starter_investment(UserId::new(), dec!(100));

        let book = PolicyBook::builtin(Currency::KES);
        drop(book); // settlement below must not depend on the book

        let p = payout(inv.amount, inv.rate, inv.duration_days);
        assert_eq!(p.total.amount(), dec!(123.00));
    }

    #[test]
    fn test_builtin_book_vectors() {
        let book = PolicyBook::builtin(Currency::KES);
        let growth = book.get("Growth").unwrap();

        let p = payout(
            Money::new(dec!(50), Currency::KES),
            growth.daily_rate,
            growth.duration_days,
        );
        assert_eq!(p.interest.amount(), dec!(18.75));
        assert_eq!(p.total.amount(), dec!(68.75));
    }
}

// ============================================================================
// Mock Port: Conservation of Funds
// ============================================================================

mod conservation_tests {
    use super::*;

    #[tokio::test]
    async fn test_creation_debits_equal_recorded_principals() {
        let port = MockInvestmentPort::new();
        let user = UserId::new();
        port.seed_wallet(user, kes(dec!(10000))).await;

        for amount in [dec!(100), dec!(250), dec!(1000)] {
            let inv = starter_investment(user, amount);
            port.create_investment(&inv).await.unwrap();
        }

        let entries = port.ledger_entries().await;
        let total_debited: rust_decimal::Decimal = entries
            .iter()
            .filter(|e| e.reason == LedgerReason::InvestmentDebit)
            .map(|e| e.amount.abs().amount())
            .sum();

        let total_principal: rust_decimal::Decimal = port
            .investments()
            .await
            .iter()
            .map(|i| i.amount.amount())
            .sum();

        assert_eq!(total_debited, dec!(1350));
        assert_eq!(total_debited, total_principal);
    }

    #[tokio::test]
    async fn test_cancellation_refund_equals_principal() {
        let port = MockInvestmentPort::new();
        let user = UserId::new();
        port.seed_wallet(user, kes(dec!(500))).await;

        let inv = starter_investment(user, dec!(200));
        port.create_investment(&inv).await.unwrap();
        assert_eq!(port.wallet_balance(user).await.unwrap().amount(), dec!(300));

        let result = port
            .settle(inv.id, inv.amount, SettlementOutcome::Cancelled, Utc::now())
            .await
            .unwrap();

        assert!(matches!(result, SettleResult::Settled { .. }));
        // Refund restores exactly the principal, zero interest
        assert_eq!(port.wallet_balance(user).await.unwrap().amount(), dec!(500));

        let refunds: Vec<_> = port
            .ledger_entries()
            .await
            .into_iter()
            .filter(|e| e.reason == LedgerReason::RefundCredit)
            .collect();
        assert_eq!(refunds.len(), 1);
        assert_eq!(refunds[0].amount.amount(), dec!(200));
    }
}

// ============================================================================
// Mock Port: Maturity Scanning
// ============================================================================

mod scan_tests {
    use super::*;

    #[tokio::test]
    async fn test_find_matured_respects_boundary() {
        let port = MockInvestmentPort::new();
        let user = UserId::new();
        port.seed_wallet(user, kes(dec!(10000))).await;

        let now = Utc::now();

        let matured = Investment::new(
            user,
            "Starter",
            kes(dec!(100)),
            Rate::from_percentage(dec!(2.3)),
            10,
            WalletType::main(),
            now - Duration::days(10), // ends exactly now
        )
        .unwrap();
        let running = Investment::new(
            user,
            "Starter",
            kes(dec!(100)),
            Rate::from_percentage(dec!(2.3)),
            10,
            WalletType::main(),
            now - Duration::days(10) + Duration::microseconds(1),
        )
        .unwrap();

        port.create_investment(&matured).await.unwrap();
        port.create_investment(&running).await.unwrap();

        let eligible = port.find_matured(now).await.unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, matured.id);
    }

    #[tokio::test]
    async fn test_settled_rows_never_rescanned() {
        let port = MockInvestmentPort::new();
        let user = UserId::new();
        port.seed_wallet(user, kes(dec!(1000))).await;

        let inv = starter_investment(user, dec!(100));
        port.create_investment(&inv).await.unwrap();

        let now = Utc::now();
        assert_eq!(port.find_matured(now).await.unwrap().len(), 1);

        port.settle(inv.id, kes(dec!(123)), SettlementOutcome::Completed, now)
            .await
            .unwrap();

        assert!(port.find_matured(now).await.unwrap().is_empty());
    }
}
