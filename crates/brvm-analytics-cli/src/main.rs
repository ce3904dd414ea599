mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analyse::AnalyseArgs;
use commands::projection::ProjectArgs;
use commands::ratios::RatiosArgs;
use commands::valuation::ValuationArgs;

/// Fundamental analysis of BRVM-listed companies
#[derive(Parser)]
#[command(
    name = "brvm",
    version,
    about = "Fundamental analysis of BRVM-listed companies",
    long_about = "A CLI for fundamental analysis of companies listed on the BRVM \
                  with decimal precision. Computes financial ratios, values a company \
                  against sector median multiples and projects revenue and net income."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a JSON or YAML analytics configuration
    #[arg(long, global = true)]
    config: Option<String>,

    /// Use the narrow peer-multiple sanity bands
    #[arg(long, global = true)]
    strict_bands: bool,

    /// Log engine diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute financial ratios for one company-year
    Ratios(RatiosArgs),
    /// Value a company against sector median multiples
    Valuation(ValuationArgs),
    /// Project revenue and net income from history
    Project(ProjectArgs),
    /// Ratios, peer valuation and projection in one report
    Analyse(AnalyseArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let load_config = || config::load(cli.config.as_deref(), cli.strict_bands);

    let result: Result<Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Ratios(args) => {
            load_config().and_then(|c| commands::ratios::run_ratios(args, &c))
        }
        Commands::Valuation(args) => {
            load_config().and_then(|c| commands::valuation::run_valuation(args, &c))
        }
        Commands::Project(args) => {
            load_config().and_then(|c| commands::projection::run_project(args, &c))
        }
        Commands::Analyse(args) => {
            load_config().and_then(|c| commands::analyse::run_analyse(args, &c))
        }
        Commands::Version => {
            println!("brvm {}", env!("CARGO_PKG_VERSION"));
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
