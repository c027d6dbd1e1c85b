//! Fixed-rate mortgage math: level annuity payment and outstanding balance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::DealMetricsError;
use crate::types::{Money, Rate};
use crate::DealMetricsResult;

/// Below this, a monthly rate is numerically indistinguishable from
/// interest-free and the annuity denominator collapses.
const RATE_EPSILON: Decimal = dec!(0.000000001);

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1),
/// with r = annual_rate / 12 and n = term_years * 12.
///
/// A zero or near-zero rate amortizes straight-line (P / n) instead of
/// dividing by zero.
pub fn monthly_payment(
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
) -> DealMetricsResult<Money> {
    let total_months = term_years * 12;
    if total_months == 0 {
        return Err(DealMetricsError::DivisionByZero {
            context: "amortization over a zero-month term".into(),
        });
    }

    let monthly_rate = annual_rate / dec!(12);
    if monthly_rate.abs() < RATE_EPSILON {
        return Ok(principal / Decimal::from(total_months));
    }

    let compound = compound_factor(monthly_rate, total_months)
        .ok_or_else(|| overflow("amortization compound factor"))?;
    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(DealMetricsError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(compound))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| overflow("mortgage payment"))
}

/// Outstanding principal after `payments_made` months of a fully-amortizing
/// schedule: B_k = P(1+r)^k - pmt * ((1+r)^k - 1) / r.
///
/// The monthly rate is threaded through from `annual_rate` directly; it is
/// never re-derived from the payment amount, which has no stable closed-form
/// inverse. Identities: B_0 = P and B_n = 0 (up to decimal residue).
pub fn remaining_balance(
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
    payments_made: u32,
) -> DealMetricsResult<Money> {
    let total_months = term_years * 12;
    if payments_made > total_months {
        return Err(DealMetricsError::InvalidInput {
            field: "payments_made".into(),
            reason: format!(
                "{payments_made} payments exceed the {total_months}-month schedule"
            ),
        });
    }

    let monthly_rate = annual_rate / dec!(12);
    if monthly_rate.abs() < RATE_EPSILON {
        // Straight-line: principal retires in equal monthly slices
        let paid = principal * Decimal::from(payments_made) / Decimal::from(total_months.max(1));
        return Ok(principal - paid);
    }

    let payment = monthly_payment(principal, annual_rate, term_years)?;
    let compound = compound_factor(monthly_rate, payments_made)
        .ok_or_else(|| overflow("balance compound factor"))?;

    let grown_principal = principal
        .checked_mul(compound)
        .ok_or_else(|| overflow("balance on grown principal"))?;
    let amortized = payment
        .checked_mul(compound - Decimal::ONE)
        .and_then(|v| v.checked_div(monthly_rate))
        .ok_or_else(|| overflow("amortized principal"))?;

    Ok(grown_principal - amortized)
}

/// (1 + r)^n via iterative multiplication; exact in decimal arithmetic.
/// None when the factor leaves Decimal range (extreme rate/term pairs).
fn compound_factor(monthly_rate: Rate, months: u32) -> Option<Decimal> {
    let mut compound = Decimal::ONE;
    let one_plus_r = Decimal::ONE + monthly_rate;
    for _ in 0..months {
        compound = compound.checked_mul(one_plus_r)?;
    }
    Some(compound)
}

fn overflow(context: &str) -> DealMetricsError {
    DealMetricsError::NumericOverflow {
        context: context.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thirty_year_fixed_payment() {
        // $200k at 6% over 30 years: the textbook $1,199.10/mo
        let payment = monthly_payment(dec!(200000), dec!(0.06), 30).unwrap();
        let diff = (payment - dec!(1199.10)).abs();
        assert!(diff < dec!(0.01), "payment {payment} off by {diff}");
    }

    #[test]
    fn test_zero_rate_payment_is_straight_line() {
        let payment = monthly_payment(dec!(360000), Decimal::ZERO, 30).unwrap();
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn test_zero_term_rejected() {
        let result = monthly_payment(dec!(100000), dec!(0.05), 0);
        assert!(matches!(
            result,
            Err(DealMetricsError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_extreme_rate_term_pair_overflows_cleanly() {
        // 20% over 600 years: (1+r)^n leaves Decimal range long before
        // month 7200, and the caller gets a structured error
        let result = monthly_payment(dec!(100000), dec!(0.20), 600);
        assert!(matches!(
            result,
            Err(DealMetricsError::NumericOverflow { .. })
        ));
    }

    #[test]
    fn test_balance_at_origination_equals_principal() {
        let balance = remaining_balance(dec!(200000), dec!(0.06), 30, 0).unwrap();
        assert_eq!(balance, dec!(200000));
    }

    #[test]
    fn test_balance_at_maturity_is_zero() {
        let balance = remaining_balance(dec!(200000), dec!(0.06), 30, 360).unwrap();
        assert!(
            balance.abs() < dec!(0.01),
            "maturity balance {balance} should be ~0"
        );
    }

    #[test]
    fn test_balance_declines_over_schedule() {
        let early = remaining_balance(dec!(325080), dec!(0.04), 30, 12).unwrap();
        let late = remaining_balance(dec!(325080), dec!(0.04), 30, 120).unwrap();
        assert!(early > late);
        assert!(late > Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_balance_is_linear() {
        let halfway = remaining_balance(dec!(360000), Decimal::ZERO, 30, 180).unwrap();
        assert_eq!(halfway, dec!(180000));
    }

    #[test]
    fn test_payments_beyond_schedule_rejected() {
        let result = remaining_balance(dec!(200000), dec!(0.06), 30, 361);
        assert!(matches!(
            result,
            Err(DealMetricsError::InvalidInput { ref field, .. }) if field == "payments_made"
        ));
    }
}
