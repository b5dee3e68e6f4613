//! UAI Settlement Worker Binary
//!
//! Runs the maturity settlement loop against PostgreSQL.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin uai-worker
//!
//! # Run with environment variables
//! UAI_DATABASE_URL=postgres://... UAI_SETTLE_INTERVAL_SECS=300 cargo run --bin uai-worker
//! ```
//!
//! # Environment Variables
//!
//! * `UAI_DATABASE_URL` - PostgreSQL connection string
//! * `UAI_SETTLE_INTERVAL_SECS` - Seconds between settlement passes (default: 600)
//! * `UAI_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `UAI_FUND_POLICY_FILE` - Optional JSON file with fund policy definitions

use std::sync::Arc;
use std::time::Duration;

use service_settlement::{InvestmentService, SettlementScheduler, WorkerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        interval_secs = config.settle_interval_secs,
        "Starting UAI settlement worker"
    );

    let pool = infra_db::create_pool_from_url(&config.database_url).await?;
    infra_db::run_migrations(&pool).await?;

    let policies = config.policy_book()?;
    tracing::info!(funds = policies.len(), "Fund policy book loaded");

    let port = Arc::new(infra_db::PostgresInvestmentAdapter::new(pool.clone()));
    let notifier = Arc::new(infra_db::PostgresNotifier::new(pool));
    let service = Arc::new(InvestmentService::new(port, notifier, policies));

    let scheduler = Arc::new(SettlementScheduler::new(
        service,
        Duration::from_secs(config.settle_interval_secs),
    ));

    scheduler.run(shutdown_signal()).await;

    tracing::info!("Worker shutdown complete");
    Ok(())
}

/// Loads worker configuration from environment, falling back to individual
/// variables or defaults
fn load_config() -> WorkerConfig {
    WorkerConfig::from_env().unwrap_or_else(|_| fallback_config(|key| std::env::var(key).ok()))
}

/// Builds the fallback configuration from individual variables
///
/// The `UAI_`-prefixed variables take precedence over their bare
/// counterparts, so an ambient `DATABASE_URL` never overrides an
/// explicitly configured worker.
fn fallback_config(get: impl Fn(&str) -> Option<String>) -> WorkerConfig {
    WorkerConfig {
        database_url: get("UAI_DATABASE_URL")
            .or_else(|| get("DATABASE_URL"))
            .unwrap_or_else(|| "postgres://localhost/uai".to_string()),
        settle_interval_secs: get("UAI_SETTLE_INTERVAL_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(600),
        log_level: get("UAI_LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string()),
        fund_policy_file: get("UAI_FUND_POLICY_FILE"),
    }
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_database_url_wins_over_bare() {
        let config = fallback_config(|key| match key {
            "UAI_DATABASE_URL" => Some("postgres://worker-db/uai".to_string()),
            "DATABASE_URL" => Some("postgres://ambient-db/other".to_string()),
            _ => None,
        });
        assert_eq!(config.database_url, "postgres://worker-db/uai");
    }

    #[test]
    fn test_bare_database_url_is_the_fallback() {
        let config = fallback_config(|key| match key {
            "DATABASE_URL" => Some("postgres://ambient-db/uai".to_string()),
            _ => None,
        });
        assert_eq!(config.database_url, "postgres://ambient-db/uai");
        assert_eq!(config.settle_interval_secs, 600);
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
