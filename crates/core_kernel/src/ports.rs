//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types for the hexagonal
//! architecture (ports and adapters) pattern used at the storage and
//! notification seams.
//!
//! Each domain defines its own port trait that extends the marker trait
//! here. Adapters implement those traits to provide either the internal
//! (PostgreSQL) implementation or an in-memory mock for testing.
//!
//! ```rust,ignore
//! // In domain_investment/src/ports.rs
//! #[async_trait]
//! pub trait InvestmentPort: DomainPort {
//!     async fn find_matured(&self, now: DateTime<Utc>) -> Result<Vec<Investment>, PortError>;
//! }
//!
//! // In infra_db - internal adapter
//! impl InvestmentPort for PostgresInvestmentAdapter { ... }
//! ```

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// ensuring consistent error handling across adapters.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation {
        message: String,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// A debit would drive a wallet balance negative
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may
    /// succeed on retry
    ///
    /// For scheduled settlement a transient failure simply leaves the
    /// investment eligible on the next scan.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::Timeout { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if this error is an insufficient-funds rejection
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, PortError::InsufficientFunds { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Investment", "INV-123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Investment"));
        assert!(error.to_string().contains("INV-123"));
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "settle".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());

        let validation = PortError::validation("Unknown fund");
        assert!(!validation.is_transient());
    }

    #[test]
    fn test_insufficient_funds_display() {
        let error = PortError::InsufficientFunds {
            required: dec!(100),
            available: dec!(50),
        };
        assert!(error.is_insufficient_funds());
        assert!(error.to_string().contains("100"));
        assert!(error.to_string().contains("50"));
    }
}
