//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL backing for the UAI investment core
//! using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! work in raw row types; adapters implement the domain port traits on top
//! of the repositories, translating rows to domain entities and database
//! errors to port errors.
//!
//! # Transactional contracts
//!
//! The port methods that move money are each one database transaction:
//!
//! - investment creation: wallet debit + ledger entry + row insert
//! - settlement: conditional status update (`WHERE paid_out = FALSE`) +
//!   wallet credit + ledger entry
//!
//! The conditional update is what makes settlement idempotent across
//! concurrent processes sharing one database; a losing attempt affects zero
//! rows and applies no credit.

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, create_pool_from_url, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::{PostgresInvestmentAdapter, PostgresNotifier};

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}
