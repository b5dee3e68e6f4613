//! Settlement Service
//!
//! The worker-side orchestration for the UAI investment core:
//!
//! - **Service**: creation with policy validation, the maturity settlement
//!   pass, and administrative cancellation, all driven through the
//!   investment storage port
//! - **Scheduler**: periodic loop with a startup catch-up pass and
//!   overlap protection within the process
//! - **Config**: environment-driven worker configuration and fund policy
//!   loading
//!
//! The service is stateless between passes. Crash recovery is free: any
//! investment that was eligible but unsettled when the process died is
//! still eligible on the next scan, and the storage layer's conditional
//! update guarantees the interrupted attempt never half-applied.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod service;

pub use config::{load_policy_book, WorkerConfig};
pub use error::ServiceError;
pub use scheduler::SettlementScheduler;
pub use service::{CancellationSummary, InvestmentService, SettlementSummary};
