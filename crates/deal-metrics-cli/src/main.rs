mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::payment::PaymentArgs;

/// Investment-performance metrics for single-property real estate deals
#[derive(Parser)]
#[command(
    name = "dealm",
    version,
    about = "Investment-performance metrics for single-property real estate deals",
    long_about = "Computes cap rate, cash-on-cash return, IRR, the amortized monthly \
                  mortgage payment, and a year-by-year projected cash-flow series from \
                  a small set of deal assumptions, with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full metric set for one deal
    Analyze(AnalyzeArgs),
    /// Amortization helper: monthly payment and remaining balance
    Payment(PaymentArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Version => {
            println!("dealm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
