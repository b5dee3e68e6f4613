//! Investment domain errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by investment operations
///
/// Validation variants are surfaced synchronously to the creating caller
/// before any mutation; `AlreadySettled` is a benign signal the settlement
/// path treats as a no-op.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvestmentError {
    /// Principal must be strictly positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// No fund policy with this name exists
    #[error("Unknown fund: {0}")]
    UnknownFund(String),

    /// Amount is below the fund's minimum
    #[error("Amount {amount} is below the minimum {minimum} for fund {fund}")]
    BelowMinimum {
        fund: String,
        amount: Decimal,
        minimum: Decimal,
    },

    /// Amount is above the fund's maximum
    #[error("Amount {amount} is above the maximum {maximum} for fund {fund}")]
    AboveMaximum {
        fund: String,
        amount: Decimal,
        maximum: Decimal,
    },

    /// The fund has no remaining capacity for new investments
    #[error("Fund {0} is at capacity")]
    FundAtCapacity(String),

    /// The investment has already been paid out
    #[error("Investment already settled")]
    AlreadySettled,

    /// The requested transition is not allowed from the current status
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}
