//! Investment Domain
//!
//! This crate implements the investment lifecycle for the UAI platform's
//! fixed-term fund products:
//!
//! - **Investment**: wallet funds committed to a fund policy for a fixed
//!   term, settled exactly once at maturity or cancelled with a refund
//! - **Fund Policy**: named configuration tuple (daily rate, duration,
//!   min/max amount, capacity) looked up at creation time; the investment
//!   stores its own copy of rate and duration so later policy edits never
//!   affect existing investments
//! - **Payout**: simple (non-compounding) daily interest,
//!   `principal + principal * rate * days`, rounded half-up to the
//!   currency's minor unit
//! - **Ports**: the storage and notification seams the settlement service
//!   drives, with an in-memory mock for tests
//!
//! # Settlement invariant
//!
//! `paid_out == true` ⇔ `status != Active` ⇔ `paid_at` is set. An
//! investment is settled exactly once; adapters enforce this with a
//! conditional update so a duplicate attempt is a detectable no-op rather
//! than a second credit.

pub mod investment;
pub mod policy;
pub mod payout;
pub mod ports;
pub mod error;

pub use investment::{Investment, InvestmentStatus, SettlementOutcome};
pub use policy::{FundPolicy, FundPolicyConfig, PolicyBook};
pub use payout::{payout, Payout};
pub use ports::{InvestmentPort, Notifier, NotificationCategory, SettleResult};
pub use error::InvestmentError;
