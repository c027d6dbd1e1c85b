//! Deal-level aggregator: validates assumptions, derives financing terms,
//! projects cash flows, solves the IRR, and assembles the metric record
//! consumed by the external caller.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealMetricsError;
use crate::irr::{self, IrrSolution};
use crate::projection;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::{amortization, DealMetricsResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One request's deal assumptions. Field names follow the external JSON
/// contract (camelCase); rates are decimal fractions, periods are years.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealAssumptions {
    /// Acquisition price
    pub purchase_price: Money,
    /// Monthly rent at acquisition
    pub rent: Money,
    /// Up-front rehab / make-ready spend
    pub rehab_cost: Money,
    /// Fraction of price financed, in (0, 1]
    pub loan_to_value: Rate,
    /// Nominal annual mortgage rate
    pub mortgage_rate: Rate,
    /// Mortgage term in years
    pub mortgage_period: u32,
    /// Fraction of gross rent consumed by operating costs, in [0, 1)
    pub operating_expenses: Rate,
    /// Annual growth applied to both property value and rent (may be negative)
    pub appreciation_rate: Rate,
    /// Reserved: accepted for contract compatibility, not consumed by the
    /// current metric set. A non-zero value raises a warning.
    pub exit_cap: Rate,
    /// Holding period in years; must not exceed the mortgage term
    pub holding_period: u32,
}

/// Financing terms derived once per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub down_payment: Money,
    pub loan_amount: Money,
    pub monthly_payment: Money,
}

/// The metric record returned to the external caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentMetrics {
    /// Annualized IRR of the levered cash-flow series, as a decimal fraction
    pub irr: Rate,
    /// False when the solver exhausted its iteration budget; `irr` is then
    /// the last estimate, not a validated root
    pub irr_converged: bool,
    /// Year-1 NOI / purchase price
    pub cap_rate: Rate,
    /// Year-1 net cash flow / total cash invested
    pub cash_on_cash: Rate,
    pub monthly_mortgage: Money,
    /// `holdingPeriod + 1` entries; index 0 is the initial outlay
    pub cash_flows: Vec<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive down payment, loan amount, and the amortizing monthly payment.
pub fn financing_terms(assumptions: &DealAssumptions) -> DealMetricsResult<FinancingTerms> {
    let down_payment = assumptions.purchase_price * (Decimal::ONE - assumptions.loan_to_value);
    let loan_amount = assumptions.purchase_price * assumptions.loan_to_value;
    let monthly_payment = amortization::monthly_payment(
        loan_amount,
        assumptions.mortgage_rate,
        assumptions.mortgage_period,
    )?;

    Ok(FinancingTerms {
        down_payment,
        loan_amount,
        monthly_payment,
    })
}

/// Compute the full metric set for one deal.
///
/// Pure function of its input: no shared state, no I/O. Warnings for
/// advisory conditions (non-convergent IRR, negative year-1 cash flow,
/// unused `exitCap`, aggressive leverage) travel in the output envelope.
pub fn calculate_metrics(
    assumptions: &DealAssumptions,
) -> DealMetricsResult<ComputationOutput<InvestmentMetrics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_assumptions(assumptions, &mut warnings)?;

    let terms = financing_terms(assumptions)?;
    let cash_flows = projection::project_cash_flows(assumptions, &terms)?;

    let IrrSolution {
        rate: irr_rate,
        converged,
        iterations,
    } = irr::solve_irr(&cash_flows, irr::DEFAULT_GUESS)?;

    if !converged {
        warnings.push(format!(
            "IRR did not converge within {iterations} iterations — reported value is the last estimate"
        ));
    }

    let annual_noi =
        assumptions.rent * dec!(12) * (Decimal::ONE - assumptions.operating_expenses);
    let cap_rate = annual_noi / assumptions.purchase_price;

    let cash_invested = terms.down_payment + assumptions.rehab_cost;
    let cash_on_cash = if cash_invested.is_zero() {
        warnings.push("No cash invested (100% LTV, no rehab) — cash-on-cash reported as 0".into());
        Decimal::ZERO
    } else {
        (annual_noi - terms.monthly_payment * dec!(12)) / cash_invested
    };

    if cash_flows.len() > 1 && cash_flows[1] < Decimal::ZERO {
        warnings.push("Year-1 cash flow is negative — deal does not carry itself".into());
    }

    if cap_rate < dec!(0.03) {
        warnings.push(format!("Cap rate {cap_rate:.4} is below 3% — verify rent and price"));
    } else if cap_rate > dec!(0.12) {
        warnings.push(format!(
            "Cap rate {cap_rate:.4} exceeds 12% — may indicate elevated risk"
        ));
    }

    let metrics = InvestmentMetrics {
        irr: irr_rate,
        irr_converged: converged,
        cap_rate,
        cash_on_cash,
        monthly_mortgage: terms.monthly_payment,
        cash_flows,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Single-Property Investment Metrics (Levered Cash Flow)",
        assumptions,
        warnings,
        elapsed,
        metrics,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_assumptions(
    assumptions: &DealAssumptions,
    warnings: &mut Vec<String>,
) -> DealMetricsResult<()> {
    if assumptions.purchase_price <= Decimal::ZERO {
        return Err(invalid("purchasePrice", "Purchase price must be positive"));
    }

    if assumptions.rent <= Decimal::ZERO {
        return Err(invalid("rent", "Monthly rent must be positive"));
    }

    if assumptions.rehab_cost < Decimal::ZERO {
        return Err(invalid("rehabCost", "Rehab cost cannot be negative"));
    }

    if assumptions.loan_to_value <= Decimal::ZERO || assumptions.loan_to_value > Decimal::ONE {
        return Err(invalid(
            "loanToValue",
            "Loan-to-value must be in (0, 1]",
        ));
    }

    if assumptions.mortgage_rate < Decimal::ZERO {
        return Err(invalid("mortgageRate", "Mortgage rate cannot be negative"));
    }

    if assumptions.mortgage_period < 1 {
        return Err(invalid(
            "mortgagePeriod",
            "Mortgage term must be at least 1 year",
        ));
    }

    if assumptions.operating_expenses < Decimal::ZERO
        || assumptions.operating_expenses >= Decimal::ONE
    {
        return Err(invalid(
            "operatingExpenses",
            "Operating expense ratio must be in [0, 1)",
        ));
    }

    if assumptions.holding_period < 1 {
        return Err(invalid(
            "holdingPeriod",
            "Holding period must be at least 1 year",
        ));
    }

    if assumptions.holding_period > assumptions.mortgage_period {
        return Err(invalid(
            "holdingPeriod",
            "Holding period cannot exceed the mortgage term",
        ));
    }

    if !assumptions.exit_cap.is_zero() {
        warnings.push(
            "exitCap is accepted for contract compatibility but not consumed — terminal value uses appreciation compounding".into(),
        );
    }

    if assumptions.loan_to_value > dec!(0.80) {
        warnings.push(format!(
            "LTV of {:.1}% exceeds 80% — high leverage",
            assumptions.loan_to_value * dec!(100)
        ));
    }

    Ok(())
}

fn invalid(field: &str, reason: &str) -> DealMetricsError {
    DealMetricsError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
