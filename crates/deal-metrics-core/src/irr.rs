//! Newton-Raphson internal-rate-of-return solver.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DealMetricsError;
use crate::types::{Money, Rate};
use crate::DealMetricsResult;

const MAX_ITERATIONS: u32 = 1000;
const CONVERGENCE_THRESHOLD: Decimal = dec!(0.00001);
const DERIVATIVE_EPSILON: Decimal = dec!(0.000000001);

/// Default starting point for the iteration.
pub const DEFAULT_GUESS: Decimal = dec!(0.10);

/// Outcome of an IRR solve. An exhausted iteration budget is reported, not
/// hidden: `rate` is then the last estimate and `converged` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrSolution {
    pub rate: Rate,
    pub converged: bool,
    pub iterations: u32,
}

/// Find r such that NPV(r) = sum cf[t] / (1+r)^t is zero, starting from
/// `guess`.
///
/// Sequences with more than one sign change can have multiple roots; the
/// iteration lands on whichever root `guess` basin-hops into, with no
/// uniqueness guarantee. A vanishing derivative is a hard failure rather
/// than a NaN in the output. Estimates whose discounting runs past Decimal
/// range (roots pinned near -100% on long series) come back tagged
/// `converged: false` instead of panicking mid-arithmetic.
pub fn solve_irr(cash_flows: &[Money], guess: Rate) -> DealMetricsResult<IrrSolution> {
    if cash_flows.len() < 2 {
        return Err(DealMetricsError::InvalidInput {
            field: "cash_flows".into(),
            reason: "IRR requires at least 2 cash flows".into(),
        });
    }

    let mut rate = guess;

    for i in 0..MAX_ITERATIONS {
        let Some((npv, dnpv)) = npv_and_derivative(cash_flows, rate) else {
            return Ok(IrrSolution {
                rate,
                converged: false,
                iterations: i,
            });
        };

        if dnpv.abs() < DERIVATIVE_EPSILON {
            return Err(DealMetricsError::SolverSingularity {
                function: "IRR".into(),
                iteration: i,
            });
        }

        let new_rate = match npv.checked_div(dnpv).and_then(|step| rate.checked_sub(step)) {
            Some(r) => r,
            None => {
                return Ok(IrrSolution {
                    rate,
                    converged: false,
                    iterations: i,
                });
            }
        };

        if (new_rate - rate).abs() < CONVERGENCE_THRESHOLD {
            return Ok(IrrSolution {
                rate: new_rate,
                converged: true,
                iterations: i + 1,
            });
        }

        rate = clamp_rate(new_rate);
    }

    Ok(IrrSolution {
        rate,
        converged: false,
        iterations: MAX_ITERATIONS,
    })
}

/// NPV(r) and d(NPV)/dr in one pass, building discount factors iteratively.
/// None when any term leaves Decimal range (e.g. 1/(1+r)^t near r = -1).
fn npv_and_derivative(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut npv = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE; // 1/(1+r)^0

    for (t, cf) in cash_flows.iter().enumerate() {
        npv = npv.checked_add(cf.checked_mul(discount)?)?;
        if t > 0 {
            // d/dr of cf/(1+r)^t = -t * cf / (1+r)^(t+1)
            let term = Decimal::from(t as i64)
                .checked_mul(*cf)?
                .checked_mul(discount)?
                .checked_div(one_plus_r)?;
            dnpv = dnpv.checked_sub(term)?;
        }
        discount = discount.checked_div(one_plus_r)?;
    }

    Some((npv, dnpv))
}

/// Keep 1+r strictly positive and the step bounded when the iteration
/// overshoots.
fn clamp_rate(rate: Rate) -> Rate {
    if rate < dec!(-0.99) {
        dec!(-0.99)
    } else if rate > dec!(10.0) {
        dec!(10.0)
    } else {
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_two_point_flow_is_exact() {
        // Invest 100, receive 110 one year later: the single root is 10%
        let solution = solve_irr(&[dec!(-100), dec!(110)], DEFAULT_GUESS).unwrap();
        assert!(solution.converged);
        let diff = (solution.rate - dec!(0.10)).abs();
        assert!(diff < dec!(0.00001), "IRR {} off by {diff}", solution.rate);
    }

    #[test]
    fn test_level_annuity_flow() {
        // Invest 1000, receive 300/year for 5 years: IRR ~15.24%
        let cfs = [
            dec!(-1000),
            dec!(300),
            dec!(300),
            dec!(300),
            dec!(300),
            dec!(300),
        ];
        let solution = solve_irr(&cfs, DEFAULT_GUESS).unwrap();
        assert!(solution.converged);
        assert!(
            solution.rate > dec!(0.15) && solution.rate < dec!(0.16),
            "expected ~15.2%, got {}",
            solution.rate
        );
    }

    #[test]
    fn test_negative_irr() {
        // Invest 100, receive 90: IRR = -10%
        let solution = solve_irr(&[dec!(-100), dec!(90)], DEFAULT_GUESS).unwrap();
        assert!(solution.converged);
        let diff = (solution.rate - dec!(-0.10)).abs();
        assert!(diff < dec!(0.0001), "IRR {} off by {diff}", solution.rate);
    }

    #[test]
    fn test_guess_is_returned_when_already_a_root() {
        // NPV(0.10) is already zero, so the first step is a no-op
        let solution = solve_irr(&[dec!(-100), dec!(110)], dec!(0.10)).unwrap();
        assert!((solution.rate - dec!(0.10)).abs() < dec!(0.0000000001));
        assert_eq!(solution.iterations, 1);
    }

    #[test]
    fn test_near_total_loss_series_is_tagged_not_a_panic() {
        // 100k out, a trickle back: the root sits near -100%, where the
        // discount factors outgrow Decimal range on a 20-period series
        let mut cfs = vec![dec!(-100000)];
        cfs.extend(vec![dec!(1); 20]);

        let solution = solve_irr(&cfs, DEFAULT_GUESS).unwrap();
        assert!(!solution.converged);
    }

    #[test]
    fn test_rootless_series_exhausts_budget_unconverged() {
        // Zero outlay followed by positive flows: NPV is positive at every
        // rate, so there is no root to find
        let solution = solve_irr(&[Decimal::ZERO, dec!(100), dec!(100)], DEFAULT_GUESS).unwrap();
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 1000);
    }

    #[test]
    fn test_too_few_cash_flows_rejected() {
        let result = solve_irr(&[dec!(-100)], DEFAULT_GUESS);
        assert!(matches!(
            result,
            Err(DealMetricsError::InvalidInput { ref field, .. }) if field == "cash_flows"
        ));
    }

    #[test]
    fn test_singular_derivative_is_a_hard_failure() {
        // A zero flow after t=0 makes the NPV derivative identically zero
        let result = solve_irr(&[dec!(100), dec!(0)], DEFAULT_GUESS);
        assert!(matches!(
            result,
            Err(DealMetricsError::SolverSingularity { .. })
        ));
    }
}
