//! Envelope-producing entry points.
//!
//! The engines are pure and return bare results. These functions validate
//! caller input, run the engines and wrap the outcome in a
//! [`ComputationOutput`] with methodology, assumptions and warnings, which is
//! what the CLI prints.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::projection::{self, ProjectionResult};
use crate::ratios::{compute_ratios, RatioSet};
use crate::statements::{FinancialStatement, HistoricalPoint};
use crate::types::{with_metadata, ComputationOutput};
use crate::valuation::{compute_valuation, PeerObservation, PeerUniverse, SubjectProfile, ValuationResult};
use crate::AnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which stored rows count as peers of the subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerScope {
    /// Every row except the subject's own company-year, including the
    /// subject's other fiscal years.
    #[default]
    AllOtherRows,
    /// Rows of other companies only.
    OtherCompanies,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationInput {
    pub subject: FinancialStatement,
    /// Peer ratio sets, already computed and stored by the caller
    pub peers: Vec<PeerObservation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub history: Vec<HistoricalPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u32>,
}

/// Full analysis of one company-year against a set of stored statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub subject: FinancialStatement,
    /// Every other stored statement (any company, any year). Rows sharing the
    /// subject's symbol also provide its projection history.
    #[serde(default)]
    pub statements: Vec<FinancialStatement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u32>,
    #[serde(default)]
    pub peer_scope: PeerScope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub year: i32,
    pub ratios: RatioSet,
    pub valuation: ValuationResult,
    /// Absent when the company has fewer than two usable years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<ProjectionResult>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Ratio set for one statement.
pub fn analyse_ratios(
    statement: &FinancialStatement,
    config: &AnalyticsConfig,
) -> AnalyticsResult<ComputationOutput<RatioSet>> {
    let start = Instant::now();
    config.validate()?;
    statement.validate()?;

    let ratios = compute_ratios(
        &statement.balance_sheet,
        &statement.income_statement,
        &statement.cash_flow,
        &config.ratios,
    );

    let mut warnings = Vec::new();
    if ratios.len() <= crate::ratios::Ratio::DERIVED_SCALARS.len() {
        warnings.push("No ratio could be computed from the supplied statements".to_string());
    }

    Ok(with_metadata(
        "Financial Ratio Analysis",
        &config.ratios,
        warnings,
        start.elapsed().as_micros() as u64,
        ratios,
    ))
}

/// Peer-relative valuation of one statement against precomputed peer ratios.
pub fn analyse_valuation(
    input: &ValuationInput,
    config: &AnalyticsConfig,
) -> AnalyticsResult<ComputationOutput<ValuationResult>> {
    let start = Instant::now();
    config.validate()?;
    input.subject.validate()?;

    let ratios = compute_ratios(
        &input.subject.balance_sheet,
        &input.subject.income_statement,
        &input.subject.cash_flow,
        &config.ratios,
    );
    let subject = SubjectProfile::from_statement(&input.subject, ratios);
    let peers: PeerUniverse = input.peers.iter().cloned().collect();
    let peers = peers.excluding(&subject.symbol, subject.year);

    let result = compute_valuation(&subject, &peers, &config.valuation);
    let warnings = result.warnings.clone();

    Ok(with_metadata(
        "Peer Multiples Valuation (sector medians)",
        &config.valuation,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

/// Revenue and net income projection from a history.
pub fn analyse_projection(
    input: &ProjectionInput,
    config: &AnalyticsConfig,
) -> AnalyticsResult<ComputationOutput<ProjectionResult>> {
    let start = Instant::now();
    config.validate()?;

    let horizon = input
        .horizon_years
        .unwrap_or(config.projection.default_horizon_years);
    let result = projection::project(&input.history, horizon, &config.projection)?;
    let warnings = result.warnings.clone();

    Ok(with_metadata(
        &format!("Financial Projection ({})", result.method),
        &config.projection,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

/// Ratios, peer valuation and projection for one company-year.
///
/// Ratios are computed for every supplied statement so the peer universe is
/// consistent with the subject's ratio definitions. A short history is not an
/// error here: the report simply carries no projection.
pub fn analyse_company(
    input: &AnalysisInput,
    config: &AnalyticsConfig,
) -> AnalyticsResult<ComputationOutput<AnalysisReport>> {
    let start = Instant::now();
    config.validate()?;
    input.subject.validate()?;
    for statement in &input.statements {
        statement.validate().map_err(|e| match e {
            AnalyticsError::InvalidInput { field, reason } => AnalyticsError::InvalidInput {
                field: format!("{} {}: {field}", statement.symbol, statement.year),
                reason,
            },
            other => other,
        })?;
    }

    let subject_key = (input.subject.symbol.as_str(), input.subject.year);
    let mut warnings: Vec<String> = Vec::new();

    // -- Ratios ---------------------------------------------------------------
    let ratios_of = |s: &FinancialStatement| {
        compute_ratios(
            &s.balance_sheet,
            &s.income_statement,
            &s.cash_flow,
            &config.ratios,
        )
    };
    let subject_ratios = ratios_of(&input.subject);

    // -- Valuation ------------------------------------------------------------
    let peers: PeerUniverse = input
        .statements
        .iter()
        .filter(|s| (s.symbol.as_str(), s.year) != subject_key)
        .filter(|s| match input.peer_scope {
            PeerScope::AllOtherRows => true,
            PeerScope::OtherCompanies => s.symbol != input.subject.symbol,
        })
        .map(|s| PeerObservation {
            symbol: s.symbol.clone(),
            year: s.year,
            ratios: ratios_of(s),
        })
        .collect();

    let subject = SubjectProfile::from_statement(&input.subject, subject_ratios.clone());
    let valuation = compute_valuation(&subject, &peers, &config.valuation);
    warnings.extend(valuation.warnings.iter().cloned());

    // -- Projection -----------------------------------------------------------
    let history: Vec<HistoricalPoint> = input
        .statements
        .iter()
        .filter(|s| s.symbol == input.subject.symbol && s.year != input.subject.year)
        .map(FinancialStatement::history_point)
        .chain(std::iter::once(input.subject.history_point()))
        .collect();
    let horizon = input
        .horizon_years
        .unwrap_or(config.projection.default_horizon_years);

    let projection = match projection::project(&history, horizon, &config.projection) {
        Ok(result) => {
            warnings.extend(result.warnings.iter().cloned());
            Some(result)
        }
        Err(AnalyticsError::InsufficientHistory { usable, required }) => {
            tracing::info!(
                symbol = %input.subject.symbol,
                usable,
                "projection skipped: insufficient history"
            );
            warnings.push(format!(
                "Projection skipped: {usable} usable year(s), at least {required} required"
            ));
            None
        }
        Err(e) => return Err(e),
    };

    let report = AnalysisReport {
        symbol: input.subject.symbol.clone(),
        year: input.subject.year,
        ratios: subject_ratios,
        valuation,
        projection,
    };

    Ok(with_metadata(
        "Fundamental Analysis (ratios, peer multiples, blended projection)",
        config,
        warnings,
        start.elapsed().as_micros() as u64,
        report,
    ))
}
