use clap::Args;
use serde_json::Value;

use brvm_analytics_core::analysis::{analyse_projection, ProjectionInput};
use brvm_analytics_core::AnalyticsConfig;

use crate::input;

/// Arguments for revenue and net income projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to a JSON file with `history` (year, revenue, net_income)
    #[arg(long)]
    pub input: Option<String>,

    /// Years to project past the last observation (overrides the input file)
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_project(
    args: ProjectArgs,
    config: &AnalyticsConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut projection_input: ProjectionInput =
        input::read_input(args.input.as_deref(), "projection")?;
    if args.years.is_some() {
        projection_input.horizon_years = args.years;
    }
    let result = analyse_projection(&projection_input, config)?;
    Ok(serde_json::to_value(result)?)
}
