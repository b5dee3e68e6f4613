//! Worker configuration

use std::path::Path;

use serde::Deserialize;

use core_kernel::Currency;
use domain_investment::{FundPolicyConfig, PolicyBook};

use crate::error::ServiceError;

/// Settlement worker configuration
///
/// Loaded from the environment with the `UAI_` prefix, e.g.
/// `UAI_DATABASE_URL`, `UAI_SETTLE_INTERVAL_SECS`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Seconds between settlement passes
    pub settle_interval_secs: u64,
    /// Log level
    pub log_level: String,
    /// Optional path to a JSON file with fund policy definitions; the
    /// builtin lineup is used when unset
    pub fund_policy_file: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/uai".to_string(),
            settle_interval_secs: 600,
            log_level: "info".to_string(),
            fund_policy_file: None,
        }
    }
}

impl WorkerConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("UAI"))
            .build()?
            .try_deserialize()
    }

    /// Builds the policy book this worker settles against
    ///
    /// Reads `fund_policy_file` if configured, otherwise falls back to the
    /// builtin lineup.
    pub fn policy_book(&self) -> Result<PolicyBook, ServiceError> {
        match &self.fund_policy_file {
            Some(path) => load_policy_book(Path::new(path)),
            None => Ok(PolicyBook::builtin(Currency::KES)),
        }
    }
}

/// Loads fund policies from a JSON file
pub fn load_policy_book(path: &Path) -> Result<PolicyBook, ServiceError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ServiceError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let configs: Vec<FundPolicyConfig> = serde_json::from_str(&raw)
        .map_err(|e| ServiceError::Config(format!("invalid policy file {}: {}", path.display(), e)))?;
    if configs.is_empty() {
        return Err(ServiceError::Config(format!(
            "policy file {} defines no funds",
            path.display()
        )));
    }
    Ok(PolicyBook::from_configs(configs, Currency::KES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.settle_interval_secs, 600);
        assert!(config.fund_policy_file.is_none());
    }

    #[test]
    fn test_builtin_book_when_no_file() {
        let config = WorkerConfig::default();
        let book = config.policy_book().unwrap();
        assert!(book.get("Starter").is_ok());
        assert!(book.get("Growth").is_ok());
        assert!(book.get("Premium").is_ok());
    }

    #[test]
    fn test_missing_policy_file_is_an_error() {
        let config = WorkerConfig {
            fund_policy_file: Some("/nonexistent/funds.json".to_string()),
            ..WorkerConfig::default()
        };
        assert!(matches!(
            config.policy_book(),
            Err(ServiceError::Config(_))
        ));
    }
}
