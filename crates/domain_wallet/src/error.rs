//! Wallet domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::MoneyError;

/// Errors raised by wallet operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    /// A debit would drive the balance negative
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    /// The delta currency does not match the wallet currency
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
}

impl From<MoneyError> for WalletError {
    fn from(e: MoneyError) -> Self {
        WalletError::CurrencyMismatch(e.to_string())
    }
}
