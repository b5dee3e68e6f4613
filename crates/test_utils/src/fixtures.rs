//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the investment core.
//! Fixtures are consistent and predictable so unit tests can assert exact
//! values.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{Currency, InvestmentId, Money, Rate, UserId};
use domain_investment::PolicyBook;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// The builtin fund lineup, shared across tests
pub static POLICY_BOOK: Lazy<PolicyBook> = Lazy::new(|| PolicyBook::builtin(Currency::KES));

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The Starter fund's minimum stake
    pub fn kes_100() -> Money {
        Money::new(dec!(100.00), Currency::KES)
    }

    /// A comfortable opening wallet balance
    pub fn kes_opening_balance() -> Money {
        Money::new(dec!(10000.00), Currency::KES)
    }

    /// A stake below every fund's minimum
    pub fn kes_tiny() -> Money {
        Money::new(dec!(1.00), Currency::KES)
    }

    /// A zero amount
    pub fn kes_zero() -> Money {
        Money::zero(Currency::KES)
    }

    /// A USD amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }
}

/// Fixture for rate test data
pub struct RateFixtures;

impl RateFixtures {
    /// The Starter fund's daily rate
    pub fn starter_daily() -> Rate {
        Rate::from_percentage(dec!(2.3))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard investment creation instant (Jan 1, 2026)
    pub fn creation_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    /// Ten days after [`Self::creation_time`], the Starter maturity instant
    pub fn starter_maturity() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap()
    }

    /// Well after every fixture investment has matured
    pub fn far_future() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// A deterministic user id
    pub fn user_id() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x1111_2222_3333_4444_5555_6666_7777_8888))
    }

    /// A deterministic investment id
    pub fn investment_id() -> InvestmentId {
        InvestmentId::from_uuid(Uuid::from_u128(0xaaaa_bbbb_cccc_dddd_eeee_ffff_0000_1111))
    }
}

/// Generates a random phone number for user records
pub fn random_phone() -> String {
    PhoneNumber().fake()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_book_fixture_has_builtin_lineup() {
        assert!(POLICY_BOOK.get("Starter").is_ok());
        assert_eq!(POLICY_BOOK.currency(), Currency::KES);
    }

    #[test]
    fn test_starter_maturity_is_ten_days_out() {
        let elapsed = TemporalFixtures::starter_maturity() - TemporalFixtures::creation_time();
        assert_eq!(elapsed.num_days(), 10);
    }

    #[test]
    fn test_random_phone_is_nonempty() {
        assert!(!random_phone().is_empty());
    }
}
