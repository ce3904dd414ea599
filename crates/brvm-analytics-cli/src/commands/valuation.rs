use clap::Args;
use serde_json::Value;

use brvm_analytics_core::analysis::{analyse_valuation, ValuationInput};
use brvm_analytics_core::AnalyticsConfig;

use crate::input;

/// Arguments for peer-multiple valuation
#[derive(Args)]
pub struct ValuationArgs {
    /// Path to a JSON file with the subject statement and stored peer ratios
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_valuation(
    args: ValuationArgs,
    config: &AnalyticsConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let valuation_input: ValuationInput =
        input::read_input(args.input.as_deref(), "valuation")?;
    if valuation_input.peers.is_empty() {
        tracing::warn!("no peers supplied; sector medians cannot be formed");
    }
    let result = analyse_valuation(&valuation_input, config)?;
    Ok(serde_json::to_value(result)?)
}
