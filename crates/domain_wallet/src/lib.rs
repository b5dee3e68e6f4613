//! Wallet Domain
//!
//! This crate implements the wallet balance aggregate and the ledger-entry
//! record that every money movement produces. The wallet balance is the one
//! resource mutated by multiple independent workflows (tasks, referrals,
//! investments, withdrawals), so all of them funnel through the single
//! mutation rule defined here:
//!
//! - A mutation is a signed delta applied to the balance.
//! - A debit that would drive the balance negative fails with
//!   [`WalletError::InsufficientFunds`] before any state changes.
//! - Every applied delta is recorded as a [`LedgerEntry`] carrying the
//!   reason and a reference to the entity that caused it.
//!
//! Persistence adapters must apply the delta and write the entry inside the
//! same database transaction as the state change the delta funds.

pub mod wallet;
pub mod entry;
pub mod error;

pub use wallet::{Wallet, WalletType};
pub use entry::{LedgerEntry, LedgerReason};
pub use error::WalletError;
