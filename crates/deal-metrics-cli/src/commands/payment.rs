use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use deal_metrics_core::amortization;

/// Arguments for the amortization helper
#[derive(Args)]
pub struct PaymentArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Nominal annual rate (decimal fraction)
    #[arg(long)]
    pub annual_rate: Decimal,

    /// Amortization term in years
    #[arg(long)]
    pub term_years: u32,

    /// Also report the balance outstanding after this many payments
    #[arg(long)]
    pub payments_made: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentOutput {
    monthly_payment: Decimal,
    annual_debt_service: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_balance: Option<Decimal>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let monthly_payment =
        amortization::monthly_payment(args.principal, args.annual_rate, args.term_years)?;

    let remaining_balance = match args.payments_made {
        Some(k) => Some(amortization::remaining_balance(
            args.principal,
            args.annual_rate,
            args.term_years,
            k,
        )?),
        None => None,
    };

    let output = PaymentOutput {
        monthly_payment,
        annual_debt_service: monthly_payment * Decimal::from(12),
        remaining_balance,
    };

    Ok(serde_json::to_value(output)?)
}
