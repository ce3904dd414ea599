use clap::Args;
use serde_json::Value;

use brvm_analytics_core::analysis::{analyse_company, AnalysisInput, PeerScope};
use brvm_analytics_core::AnalyticsConfig;

use crate::input;

/// Arguments for the combined company analysis
#[derive(Args)]
pub struct AnalyseArgs {
    /// Path to a JSON file with the subject statement and all stored statements
    #[arg(long)]
    pub input: Option<String>,

    /// Years to project past the last observation (overrides the input file)
    #[arg(long)]
    pub years: Option<u32>,

    /// Ignore the subject's own earlier years when forming sector medians
    #[arg(long)]
    pub other_companies_only: bool,
}

pub fn run_analyse(
    args: AnalyseArgs,
    config: &AnalyticsConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut analysis_input: AnalysisInput =
        input::read_input(args.input.as_deref(), "analysis")?;
    if args.years.is_some() {
        analysis_input.horizon_years = args.years;
    }
    if args.other_companies_only {
        analysis_input.peer_scope = PeerScope::OtherCompanies;
    }
    tracing::info!(
        symbol = %analysis_input.subject.symbol,
        year = analysis_input.subject.year,
        statements = analysis_input.statements.len(),
        "running company analysis"
    );
    let result = analyse_company(&analysis_input, config)?;
    Ok(serde_json::to_value(result)?)
}
