//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use chrono::{DateTime, Duration, Utc};
use core_kernel::{Money, Rate, UserId};
use domain_investment::Investment;
use domain_wallet::WalletType;

use crate::fixtures::{MoneyFixtures, RateFixtures, TemporalFixtures};

/// Builder for constructing test investments
///
/// Defaults to a Starter-shaped investment: 100 KES at 2.3%/day for 10
/// days, created at the fixed fixture instant.
pub struct TestInvestmentBuilder {
    user_id: UserId,
    fund_name: String,
    amount: Money,
    rate: Rate,
    duration_days: u32,
    created_at: DateTime<Utc>,
}

impl Default for TestInvestmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInvestmentBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            user_id: UserId::new(),
            fund_name: "Starter".to_string(),
            amount: MoneyFixtures::kes_100(),
            rate: RateFixtures::starter_daily(),
            duration_days: 10,
            created_at: TemporalFixtures::creation_time(),
        }
    }

    /// Sets the owning user
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the fund name
    pub fn with_fund(mut self, fund_name: impl Into<String>) -> Self {
        self.fund_name = fund_name.into();
        self
    }

    /// Sets the principal
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the daily rate
    pub fn with_rate(mut self, rate: Rate) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the term length
    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }

    /// Sets the creation instant the term is stamped from
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Backdates the creation so the investment is already matured at
    /// `now`, with one second to spare
    pub fn matured_by(self, now: DateTime<Utc>) -> Self {
        let days = self.duration_days;
        self.created_at(now - Duration::days(i64::from(days)) - Duration::seconds(1))
    }

    /// Builds the investment
    ///
    /// # Panics
    ///
    /// Panics if the configured amount is not a valid principal; test
    /// setup bugs should fail loudly.
    pub fn build(self) -> Investment {
        Investment::new(
            self.user_id,
            self.fund_name,
            self.amount,
            self.rate,
            self.duration_days,
            WalletType::main(),
            self.created_at,
        )
        .expect("builder produced an invalid investment")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_build_is_active_starter() {
        let inv = TestInvestmentBuilder::new().build();
        assert_eq!(inv.fund_name, "Starter");
        assert_eq!(inv.duration_days, 10);
        assert!(inv.is_unsettled());
    }

    #[test]
    fn test_matured_by_backdates_past_the_term() {
        let now = Utc::now();
        let inv = TestInvestmentBuilder::new().matured_by(now).build();
        assert!(inv.is_matured(now));
    }

    #[test]
    fn test_created_at_stamps_term() {
        let at = TemporalFixtures::creation_time();
        let inv = TestInvestmentBuilder::new()
            .with_duration_days(15)
            .created_at(at)
            .build();
        assert_eq!(inv.end_time, at + Duration::days(15));
    }
}
