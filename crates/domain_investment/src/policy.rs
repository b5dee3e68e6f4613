//! Fund policies
//!
//! A fund policy is configuration, not a living entity: a named tuple of
//! daily rate, duration, investment limits, and capacity. The policy book
//! is loaded once at startup and treated as read-only; runtime changes go
//! through a redeploy or a dedicated configuration store, never through a
//! shared mutable object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use core_kernel::{Currency, Money, Rate};

use crate::error::InvestmentError;

/// A named fund product users can invest in
#[derive(Debug, Clone, PartialEq)]
pub struct FundPolicy {
    /// Policy name, the lookup key
    pub name: String,
    /// Daily interest rate
    pub daily_rate: Rate,
    /// Term length in whole days
    pub duration_days: u32,
    /// Minimum investment amount
    pub min_amount: Money,
    /// Maximum investment amount
    pub max_amount: Money,
    /// Maximum number of concurrently active investments, if capped
    pub capacity: Option<u32>,
}

impl FundPolicy {
    /// Validates an investment amount against this policy's limits
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` for non-positive amounts
    /// - `BelowMinimum` / `AboveMaximum` for amounts outside the limits
    pub fn validate_amount(&self, amount: &Money) -> Result<(), InvestmentError> {
        if !amount.is_positive() {
            return Err(InvestmentError::InvalidAmount(amount.amount()));
        }
        if amount.amount() < self.min_amount.amount() {
            return Err(InvestmentError::BelowMinimum {
                fund: self.name.clone(),
                amount: amount.amount(),
                minimum: self.min_amount.amount(),
            });
        }
        if amount.amount() > self.max_amount.amount() {
            return Err(InvestmentError::AboveMaximum {
                fund: self.name.clone(),
                amount: amount.amount(),
                maximum: self.max_amount.amount(),
            });
        }
        Ok(())
    }

    /// Returns true if `active_count` leaves room for one more investment
    pub fn has_capacity(&self, active_count: u64) -> bool {
        match self.capacity {
            Some(cap) => active_count < u64::from(cap),
            None => true,
        }
    }
}

/// Serializable policy definition, as it appears in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundPolicyConfig {
    pub name: String,
    /// Daily rate as a percentage, e.g. 2.3 for 2.3%/day
    pub daily_rate_percent: Decimal,
    pub duration_days: u32,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl FundPolicyConfig {
    fn into_policy(self, currency: Currency) -> FundPolicy {
        FundPolicy {
            name: self.name,
            daily_rate: Rate::from_percentage(self.daily_rate_percent),
            duration_days: self.duration_days,
            min_amount: Money::new(self.min_amount, currency),
            max_amount: Money::new(self.max_amount, currency),
            capacity: self.capacity,
        }
    }
}

/// Read-only registry of fund policies, keyed by name
#[derive(Debug, Clone)]
pub struct PolicyBook {
    policies: HashMap<String, FundPolicy>,
    currency: Currency,
}

impl PolicyBook {
    /// Builds a book from configuration entries
    pub fn from_configs(configs: Vec<FundPolicyConfig>, currency: Currency) -> Self {
        let policies = configs
            .into_iter()
            .map(|c| {
                let policy = c.into_policy(currency);
                (policy.name.clone(), policy)
            })
            .collect();
        Self { policies, currency }
    }

    /// The default product lineup, used when no configuration is supplied
    pub fn builtin(currency: Currency) -> Self {
        use rust_decimal_macros::dec;

        let configs = vec![
            FundPolicyConfig {
                name: "Starter".to_string(),
                daily_rate_percent: dec!(2.3),
                duration_days: 10,
                min_amount: dec!(100),
                max_amount: dec!(5000),
                capacity: None,
            },
            FundPolicyConfig {
                name: "Growth".to_string(),
                daily_rate_percent: dec!(2.5),
                duration_days: 15,
                min_amount: dec!(500),
                max_amount: dec!(20000),
                capacity: None,
            },
            FundPolicyConfig {
                name: "Premium".to_string(),
                daily_rate_percent: dec!(3.0),
                duration_days: 30,
                min_amount: dec!(2000),
                max_amount: dec!(100000),
                capacity: Some(500),
            },
        ];
        Self::from_configs(configs, currency)
    }

    /// The wallet currency this book prices in
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Looks up a policy by name
    ///
    /// # Errors
    ///
    /// Returns `InvestmentError::UnknownFund` if no policy has this name.
    pub fn get(&self, name: &str) -> Result<&FundPolicy, InvestmentError> {
        self.policies
            .get(name)
            .ok_or_else(|| InvestmentError::UnknownFund(name.to_string()))
    }

    /// Iterates over all policies
    pub fn iter(&self) -> impl Iterator<Item = &FundPolicy> {
        self.policies.values()
    }

    /// Number of policies in the book
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book() -> PolicyBook {
        PolicyBook::builtin(Currency::KES)
    }

    #[test]
    fn test_lookup_known_fund() {
        let book = book();
        let starter = book.get("Starter").unwrap();

        assert_eq!(starter.duration_days, 10);
        assert_eq!(starter.daily_rate.as_percentage(), dec!(2.3));
    }

    #[test]
    fn test_lookup_unknown_fund() {
        let book = book();
        let result = book.get("Moonshot");
        assert!(matches!(result, Err(InvestmentError::UnknownFund(_))));
    }

    #[test]
    fn test_amount_within_limits() {
        let book = book();
        let starter = book.get("Starter").unwrap();
        assert!(starter
            .validate_amount(&Money::new(dec!(100), Currency::KES))
            .is_ok());
        assert!(starter
            .validate_amount(&Money::new(dec!(5000), Currency::KES))
            .is_ok());
    }

    #[test]
    fn test_amount_below_minimum() {
        let book = book();
        let starter = book.get("Starter").unwrap();
        let result = starter.validate_amount(&Money::new(dec!(99.99), Currency::KES));
        assert!(matches!(result, Err(InvestmentError::BelowMinimum { .. })));
    }

    #[test]
    fn test_amount_above_maximum() {
        let book = book();
        let starter = book.get("Starter").unwrap();
        let result = starter.validate_amount(&Money::new(dec!(5000.01), Currency::KES));
        assert!(matches!(result, Err(InvestmentError::AboveMaximum { .. })));
    }

    #[test]
    fn test_non_positive_amount() {
        let book = book();
        let starter = book.get("Starter").unwrap();
        let result = starter.validate_amount(&Money::zero(Currency::KES));
        assert!(matches!(result, Err(InvestmentError::InvalidAmount(_))));
    }

    #[test]
    fn test_capacity() {
        let book = book();
        let premium = book.get("Premium").unwrap();
        assert!(premium.has_capacity(499));
        assert!(!premium.has_capacity(500));

        let starter = book.get("Starter").unwrap();
        assert!(starter.has_capacity(u64::MAX - 1));
    }

    #[test]
    fn test_config_deserialization() {
        let json = r#"{
            "name": "Starter",
            "daily_rate_percent": "2.3",
            "duration_days": 10,
            "min_amount": "100",
            "max_amount": "5000"
        }"#;
        let config: FundPolicyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.capacity, None);

        let book = PolicyBook::from_configs(vec![config], Currency::KES);
        assert_eq!(book.len(), 1);
        assert!(book.get("Starter").is_ok());
    }
}
