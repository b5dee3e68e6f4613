//! Port adapters backed by PostgreSQL

pub mod investment;

pub use investment::{PostgresInvestmentAdapter, PostgresNotifier};
