use clap::Args;
use serde_json::Value;

use brvm_analytics_core::analysis::analyse_ratios;
use brvm_analytics_core::statements::FinancialStatement;
use brvm_analytics_core::AnalyticsConfig;

use crate::input;

/// Arguments for ratio computation
#[derive(Args)]
pub struct RatiosArgs {
    /// Path to a JSON financial statement (symbol, year, balance_sheet,
    /// income_statement, cash_flow)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_ratios(
    args: RatiosArgs,
    config: &AnalyticsConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let statement: FinancialStatement = input::read_input(args.input.as_deref(), "ratios")?;
    let result = analyse_ratios(&statement, config)?;
    Ok(serde_json::to_value(result)?)
}
