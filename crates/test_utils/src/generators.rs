//! Property-Based Test Generators
//!
//! Proptest strategies for generating random test data that maintains
//! domain invariants.

use core_kernel::{Currency, Money, Rate};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::KES),
        Just(Currency::UGX),
        Just(Currency::TZS),
        Just(Currency::USD),
    ]
}

/// Strategy for generating positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating positive KES Money values
pub fn kes_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::KES))
}

/// Strategy for generating principals within the Starter fund's limits
pub fn starter_principal_strategy() -> impl Strategy<Value = Money> {
    (10_000i64..=500_000i64).prop_map(|minor| Money::from_minor(minor, Currency::KES))
}

/// Strategy for generating daily rates between 0% and 10%
pub fn daily_rate_strategy() -> impl Strategy<Value = Rate> {
    (0i64..=1000i64).prop_map(|bp| Rate::from_percentage(Decimal::new(bp, 2)))
}

/// Strategy for generating term lengths in days
pub fn duration_days_strategy() -> impl Strategy<Value = u32> {
    0u32..3650u32
}
