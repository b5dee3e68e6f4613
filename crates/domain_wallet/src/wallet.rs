//! Wallet balance aggregate

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Money, UserId};

use crate::error::WalletError;

/// Tag identifying which of a user's wallets a movement touches
///
/// The platform keeps the tag free-form ("main", "bonus", ...) so new wallet
/// kinds can be introduced without a schema change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletType(String);

impl WalletType {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The default wallet every user owns
    pub fn main() -> Self {
        Self("main".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WalletType {
    fn default() -> Self {
        Self::main()
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's wallet balance
///
/// # Invariants
///
/// - The balance is never negative.
/// - Mutation happens only through [`Wallet::apply_delta`]; callers never
///   read-then-write the balance outside the transaction that also performs
///   the corresponding state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Owning user
    pub user_id: UserId,
    /// Current balance
    balance: Money,
    /// Which wallet this is
    pub wallet_type: WalletType,
}

impl Wallet {
    /// Creates a wallet with the given opening balance
    ///
    /// # Errors
    ///
    /// Returns `WalletError::InsufficientFunds` if the opening balance is
    /// negative.
    pub fn new(user_id: UserId, balance: Money, wallet_type: WalletType) -> Result<Self, WalletError> {
        if balance.is_negative() {
            return Err(WalletError::InsufficientFunds {
                required: balance.abs().amount(),
                available: Money::zero(balance.currency()).amount(),
            });
        }
        Ok(Self {
            user_id,
            balance,
            wallet_type,
        })
    }

    /// Returns the current balance
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Returns true if a debit of `amount` would succeed
    pub fn can_debit(&self, amount: &Money) -> bool {
        match self.balance.checked_sub(amount) {
            Ok(remaining) => !remaining.is_negative(),
            Err(_) => false,
        }
    }

    /// Applies a signed delta to the balance
    ///
    /// Negative deltas are debits, positive deltas are credits. This is the
    /// check-then-act step the persistence layer mirrors inside its
    /// transaction scope.
    ///
    /// # Returns
    ///
    /// The new balance on success
    ///
    /// # Errors
    ///
    /// - `WalletError::CurrencyMismatch` if the delta is in a different
    ///   currency
    /// - `WalletError::InsufficientFunds` if a debit would drive the
    ///   balance negative; the balance is left untouched
    pub fn apply_delta(&mut self, delta: Money) -> Result<Money, WalletError> {
        let new_balance = self.balance.checked_add(&delta)?;
        if new_balance.is_negative() {
            return Err(WalletError::InsufficientFunds {
                required: delta.abs().amount(),
                available: self.balance.amount(),
            });
        }
        self.balance = new_balance;
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn wallet(amount: rust_decimal::Decimal) -> Wallet {
        Wallet::new(
            UserId::new(),
            Money::new(amount, Currency::KES),
            WalletType::main(),
        )
        .unwrap()
    }

    #[test]
    fn test_credit_increases_balance() {
        let mut w = wallet(dec!(100));
        let new = w.apply_delta(Money::new(dec!(25.50), Currency::KES)).unwrap();
        assert_eq!(new.amount(), dec!(125.50));
        assert_eq!(w.balance().amount(), dec!(125.50));
    }

    #[test]
    fn test_debit_decreases_balance() {
        let mut w = wallet(dec!(100));
        let new = w.apply_delta(Money::new(dec!(-40), Currency::KES)).unwrap();
        assert_eq!(new.amount(), dec!(60));
    }

    #[test]
    fn test_debit_to_exactly_zero_is_allowed() {
        let mut w = wallet(dec!(100));
        let new = w.apply_delta(Money::new(dec!(-100), Currency::KES)).unwrap();
        assert!(new.is_zero());
    }

    #[test]
    fn test_overdraft_is_rejected_without_mutation() {
        let mut w = wallet(dec!(50));
        let result = w.apply_delta(Money::new(dec!(-100), Currency::KES));

        assert!(matches!(result, Err(WalletError::InsufficientFunds { .. })));
        assert_eq!(w.balance().amount(), dec!(50));
    }

    #[test]
    fn test_currency_mismatch_is_rejected() {
        let mut w = wallet(dec!(50));
        let result = w.apply_delta(Money::new(dec!(10), Currency::USD));
        assert!(matches!(result, Err(WalletError::CurrencyMismatch(_))));
    }

    #[test]
    fn test_negative_opening_balance_rejected() {
        let result = Wallet::new(
            UserId::new(),
            Money::new(dec!(-1), Currency::KES),
            WalletType::main(),
        );
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use core_kernel::Currency;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn balance_never_goes_negative(
            opening in 0i64..1_000_000i64,
            deltas in proptest::collection::vec(-100_000i64..100_000i64, 0..50)
        ) {
            let mut w = Wallet::new(
                UserId::new(),
                Money::from_minor(opening, Currency::KES),
                WalletType::main(),
            ).unwrap();

            for d in deltas {
                let _ = w.apply_delta(Money::from_minor(d, Currency::KES));
                prop_assert!(!w.balance().is_negative());
            }
        }
    }
}
