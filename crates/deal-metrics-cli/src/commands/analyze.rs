use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use deal_metrics_core::metrics::{self, DealAssumptions};

use crate::input;

/// Arguments for the full deal analysis.
///
/// Flag defaults describe a representative leveraged deal, so a bare
/// `dealm analyze` produces a complete worked example.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Acquisition price
    #[arg(long, default_value_t = dec!(464400))]
    pub purchase_price: Decimal,

    /// Monthly rent at acquisition
    #[arg(long, default_value_t = dec!(2460))]
    pub rent: Decimal,

    /// Up-front rehab spend
    #[arg(long, default_value_t = dec!(3000))]
    pub rehab_cost: Decimal,

    /// Fraction of price financed (0-1]
    #[arg(long, default_value_t = dec!(0.7))]
    pub loan_to_value: Decimal,

    /// Nominal annual mortgage rate (decimal fraction)
    #[arg(long, default_value_t = dec!(0.04))]
    pub mortgage_rate: Decimal,

    /// Mortgage term in years
    #[arg(long, default_value_t = 30)]
    pub mortgage_period: u32,

    /// Operating expense ratio [0-1)
    #[arg(long, default_value_t = dec!(0.4))]
    pub operating_expenses: Decimal,

    /// Annual appreciation / rent growth rate (may be negative)
    #[arg(long, allow_hyphen_values = true, default_value_t = dec!(0.03))]
    pub appreciation_rate: Decimal,

    /// Exit cap rate (reserved field, carried through unchanged)
    #[arg(long, default_value_t = dec!(0.06))]
    pub exit_cap: Decimal,

    /// Holding period in years
    #[arg(long, default_value_t = 10)]
    pub holding_period: u32,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions: DealAssumptions = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        DealAssumptions {
            purchase_price: args.purchase_price,
            rent: args.rent,
            rehab_cost: args.rehab_cost,
            loan_to_value: args.loan_to_value,
            mortgage_rate: args.mortgage_rate,
            mortgage_period: args.mortgage_period,
            operating_expenses: args.operating_expenses,
            appreciation_rate: args.appreciation_rate,
            exit_cap: args.exit_cap,
            holding_period: args.holding_period,
        }
    };

    let result = metrics::calculate_metrics(&assumptions)?;
    Ok(serde_json::to_value(result)?)
}
