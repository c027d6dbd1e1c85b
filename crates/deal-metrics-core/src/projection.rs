//! Year-by-year levered cash-flow projection with terminal sale proceeds.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::amortization;
use crate::metrics::{DealAssumptions, FinancingTerms};
use crate::types::Money;
use crate::DealMetricsResult;

/// Fixed transaction-cost assumption on disposition (broker, transfer, legal).
const SELLING_COST_RATE: Decimal = dec!(0.06);

/// Project the deal's full cash-flow series.
///
/// Index 0 is the initial outlay (negative: down payment + rehab). Years
/// 1..N are NOI minus annual debt service, with rent compounding by the
/// appreciation rate. The terminal year additionally carries net sale
/// proceeds: appreciated value, less 6% selling costs, less the loan payoff.
/// The returned series always has `holding_period + 1` entries.
pub fn project_cash_flows(
    assumptions: &DealAssumptions,
    terms: &FinancingTerms,
) -> DealMetricsResult<Vec<Money>> {
    let n = assumptions.holding_period;
    let growth = Decimal::ONE + assumptions.appreciation_rate;
    let annual_debt_service = terms.monthly_payment * dec!(12);

    let mut flows = Vec::with_capacity(n as usize + 1);
    flows.push(-(terms.down_payment + assumptions.rehab_cost));

    let mut annual_rent = assumptions.rent * dec!(12);
    for year in 1..=n {
        let net_operating_income = annual_rent * (Decimal::ONE - assumptions.operating_expenses);
        let mut year_cash_flow = net_operating_income - annual_debt_service;

        if year == n {
            year_cash_flow += sale_proceeds(assumptions, terms, n)?;
        }

        flows.push(year_cash_flow);
        annual_rent *= growth;
    }

    Ok(flows)
}

/// Net proceeds from the exit-year sale: appreciated property value, less
/// selling costs, less the outstanding loan balance.
fn sale_proceeds(
    assumptions: &DealAssumptions,
    terms: &FinancingTerms,
    exit_year: u32,
) -> DealMetricsResult<Money> {
    let growth = Decimal::ONE + assumptions.appreciation_rate;
    let mut property_value = assumptions.purchase_price;
    for _ in 0..exit_year {
        property_value *= growth;
    }

    let selling_costs = property_value * SELLING_COST_RATE;
    let loan_balance = amortization::remaining_balance(
        terms.loan_amount,
        assumptions.mortgage_rate,
        assumptions.mortgage_period,
        exit_year * 12,
    )?;

    Ok(property_value - selling_costs - loan_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::financing_terms;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_assumptions() -> DealAssumptions {
        DealAssumptions {
            purchase_price: dec!(464400),
            rent: dec!(2460),
            rehab_cost: dec!(3000),
            loan_to_value: dec!(0.7),
            mortgage_rate: dec!(0.04),
            mortgage_period: 30,
            operating_expenses: dec!(0.4),
            appreciation_rate: dec!(0.03),
            exit_cap: dec!(0.06),
            holding_period: 10,
        }
    }

    #[test]
    fn test_series_length_is_holding_period_plus_one() {
        for n in [1u32, 5, 10, 30] {
            let mut a = sample_assumptions();
            a.holding_period = n;
            let terms = financing_terms(&a).unwrap();
            let flows = project_cash_flows(&a, &terms).unwrap();
            assert_eq!(flows.len(), n as usize + 1);
        }
    }

    #[test]
    fn test_initial_outlay() {
        let a = sample_assumptions();
        let terms = financing_terms(&a).unwrap();
        let flows = project_cash_flows(&a, &terms).unwrap();

        // -(464400 * 0.3 + 3000)
        assert_eq!(flows[0], dec!(-142320));
        assert!(flows[0] < Decimal::ZERO);
    }

    #[test]
    fn test_interim_years_are_noi_less_debt_service() {
        let a = sample_assumptions();
        let terms = financing_terms(&a).unwrap();
        let flows = project_cash_flows(&a, &terms).unwrap();

        let year1_expected = dec!(2460) * dec!(12) * dec!(0.6) - terms.monthly_payment * dec!(12);
        assert_eq!(flows[1], year1_expected);

        // Year 2 rent has compounded once
        let year2_expected =
            dec!(2460) * dec!(12) * dec!(1.03) * dec!(0.6) - terms.monthly_payment * dec!(12);
        assert_eq!(flows[2], year2_expected);
    }

    #[test]
    fn test_terminal_year_carries_sale_proceeds() {
        let a = sample_assumptions();
        let terms = financing_terms(&a).unwrap();
        let flows = project_cash_flows(&a, &terms).unwrap();

        // Terminal flow dwarfs an ordinary year: equity comes back at exit
        let ordinary = flows[flows.len() - 2];
        let terminal = flows[flows.len() - 1];
        assert!(terminal > ordinary + dec!(100000));
    }

    #[test]
    fn test_negative_appreciation_shrinks_exit() {
        let up = sample_assumptions();
        let mut down = sample_assumptions();
        down.appreciation_rate = dec!(-0.02);

        let up_flows = project_cash_flows(&up, &financing_terms(&up).unwrap()).unwrap();
        let down_flows = project_cash_flows(&down, &financing_terms(&down).unwrap()).unwrap();

        let last = up_flows.len() - 1;
        assert!(down_flows[last] < up_flows[last]);
    }
}
