//! Payout calculation
//!
//! Pure arithmetic, no I/O. The platform pays simple (non-compounding)
//! daily interest: `total = principal + principal * rate * days`. The
//! final payout is rounded half-up to the currency's minor unit.

use rust_decimal::{Decimal, RoundingStrategy};

use core_kernel::{Money, Rate};

/// The computed result of settling one investment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    /// The original principal
    pub principal: Money,
    /// Interest earned over the full term
    pub interest: Money,
    /// Total amount to credit (principal + interest)
    pub total: Money,
}

/// Computes the payout for a matured investment
///
/// Assumes a validated positive principal; creation rejects anything else
/// before an investment can reach settlement.
///
/// # Arguments
///
/// * `principal` - The committed amount
/// * `rate` - Daily interest rate
/// * `duration_days` - Term length in whole days
///
/// # Example
///
/// ```rust
/// use core_kernel::{Money, Currency, Rate};
/// use domain_investment::payout;
/// use rust_decimal_macros::dec;
///
/// let p = payout(
///     Money::new(dec!(100), Currency::KES),
///     Rate::from_percentage(dec!(2.3)),
///     10,
/// );
/// assert_eq!(p.interest.amount(), dec!(23.00));
/// assert_eq!(p.total.amount(), dec!(123.00));
/// ```
pub fn payout(principal: Money, rate: Rate, duration_days: u32) -> Payout {
    let days = Decimal::from(duration_days);
    // Accrual stays in full-precision Decimal; the single rounding step
    // is the final half-up to the currency's minor unit.
    let raw_total = principal.amount() + principal.amount() * rate.as_decimal() * days;
    let total = Money::new(
        raw_total.round_dp_with_strategy(
            principal.currency().decimal_places(),
            RoundingStrategy::MidpointAwayFromZero,
        ),
        principal.currency(),
    );
    let interest = total
        .checked_sub(&principal)
        .expect("total and principal share a currency");

    Payout {
        principal,
        interest,
        total,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use core_kernel::Currency;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn total_is_never_below_principal(
            principal in 1i64..100_000_000i64,
            rate_bp in 0i64..10_000i64,
            days in 0u32..3650u32
        ) {
            let principal = Money::from_minor(principal, Currency::KES);
            let rate = Rate::from_percentage(Decimal::new(rate_bp, 2));

            let p = payout(principal, rate, days);

            prop_assert!(p.total.amount() >= p.principal.amount());
            prop_assert!(!p.interest.is_negative());
            prop_assert_eq!(p.principal + p.interest, p.total);
        }

        #[test]
        fn interest_scales_with_duration(
            principal in 100i64..10_000_000i64,
            days in 1u32..365u32
        ) {
            let principal = Money::from_minor(principal, Currency::KES);
            let rate = Rate::from_percentage(Decimal::new(25, 1)); // 2.5%

            let shorter = payout(principal, rate, days);
            let longer = payout(principal, rate, days + 1);

            prop_assert!(longer.interest.amount() >= shorter.interest.amount());
        }
    }
}
