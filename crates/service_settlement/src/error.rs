//! Settlement service error types

use thiserror::Error;

use core_kernel::PortError;
use domain_investment::InvestmentError;

/// Errors surfaced by the settlement service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A domain rule rejected the operation
    #[error(transparent)]
    Domain(#[from] InvestmentError),

    /// The storage or notification port failed
    #[error(transparent)]
    Port(#[from] PortError),

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    /// Returns true if retrying the operation later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Port(e) if e.is_transient())
    }

    /// Returns true if this is an insufficient-funds rejection
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, ServiceError::Port(e) if e.is_insufficient_funds())
    }
}
