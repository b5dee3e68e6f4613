//! Core Kernel - Foundational types and utilities for the UAI investment core
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Money and rate types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Port infrastructure shared by domain seams and their adapters

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, Rate, MoneyError};
pub use identifiers::{UserId, InvestmentId, TransactionId};
pub use ports::{DomainPort, PortError};
