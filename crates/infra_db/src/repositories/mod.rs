//! Repository implementations
//!
//! Repositories own the SQL and work in raw row types; domain translation
//! happens in the adapters.

pub mod wallet;
pub mod investment;
pub mod notification;

pub use investment::{InvestmentRepository, InvestmentRow, NewInvestmentRow};
pub use notification::NotificationRepository;
