//! Fundamental analytics for equities listed on the BRVM.
//!
//! Three independent engines operate on caller-supplied data:
//!
//! - [`ratios`] derives profitability, liquidity, leverage, efficiency,
//!   market and cash-flow ratios from one year of statements;
//! - [`valuation`] benchmarks a company against sector-median multiples of
//!   its peers and maps the gap to a five-tier recommendation;
//! - [`projection`] blends a CAGR extrapolation with a linear trend to
//!   forecast revenue and net income.
//!
//! The engines hold no state and perform no I/O.

pub mod config;
pub mod error;
pub mod ratios;
pub mod statements;
mod stats;
pub mod types;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(all(feature = "valuation", feature = "projection"))]
pub mod analysis;

pub use config::AnalyticsConfig;
pub use error::AnalyticsError;
pub use types::*;

/// Standard result type for all analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
