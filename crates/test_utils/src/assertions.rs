//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types that give more
//! meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_wallet::LedgerEntry;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies differ or the amounts differ by more than
/// `tolerance`
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a ledger's signed entries sum to the expected net amount
///
/// This is the conservation-of-funds check: every wallet movement leaves a
/// signed entry, so the net of all entries must equal the net balance
/// change observed.
pub fn assert_ledger_net(entries: &[LedgerEntry], expected_net: Decimal) {
    let net: Decimal = entries.iter().map(|e| e.amount.amount()).sum();
    assert_eq!(
        net, expected_net,
        "Ledger does not balance: net of {} entries is {}, expected {}",
        entries.len(),
        net,
        expected_net
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, UserId};
    use domain_wallet::LedgerReason;
    use rust_decimal_macros::dec;

    #[test]
    fn test_approx_eq_within_tolerance() {
        let a = Money::new(dec!(100.00), Currency::KES);
        let b = Money::new(dec!(100.004), Currency::KES);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "differ by more than tolerance")]
    fn test_approx_eq_outside_tolerance() {
        let a = Money::new(dec!(100.00), Currency::KES);
        let b = Money::new(dec!(101.00), Currency::KES);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    fn test_ledger_net_balances() {
        let user = UserId::new();
        let entries = vec![
            LedgerEntry::debit(
                user,
                Money::new(dec!(100), Currency::KES),
                LedgerReason::InvestmentDebit,
                None,
            ),
            LedgerEntry::credit(
                user,
                Money::new(dec!(123), Currency::KES),
                LedgerReason::PayoutCredit,
                None,
            ),
        ];
        assert_ledger_net(&entries, dec!(23));
    }
}
