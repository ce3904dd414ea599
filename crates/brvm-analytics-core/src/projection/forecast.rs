use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{CagrPeriods, ProjectionConfig};
use crate::error::AnalyticsError;
use crate::projection::blend::BlendWeights;
use crate::projection::growth::{cagr, compound};
use crate::projection::regression::LinearFit;
use crate::statements::HistoricalPoint;
use crate::types::{Money, Percent};
use crate::AnalyticsResult;

/// Usable observations needed before anything is projected.
pub const MIN_HISTORY_POINTS: usize = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One projected fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastYear {
    pub year: i32,
    /// Blended revenue
    pub revenue: Money,
    /// Blended net income
    pub net_income: Money,
    /// net_income / revenue × 100, zero when revenue is not positive
    pub net_margin: Percent,
    /// Absent when the compounded value is not representable; the blend
    /// then rests on the regression alone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_cagr_value: Option<Money>,
    pub revenue_regression_value: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income_cagr_value: Option<Money>,
    pub net_income_regression_value: Money,
    pub revenue_weights: BlendWeights,
    pub net_income_weights: BlendWeights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Usable history, ascending by year
    pub history: Vec<HistoricalPoint>,
    pub revenue_cagr: Percent,
    /// Computed on absolute values so a sign change does not break the root
    pub net_income_cagr: Percent,
    pub revenue_r_squared: Decimal,
    pub net_income_r_squared: Decimal,
    pub forecasts: Vec<ForecastYear>,
    pub method: String,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project revenue and net income `horizon_years` past the last observation.
///
/// Only observations with positive revenue and non-zero net income are used.
/// When a year appears more than once the later observation wins. Fewer than
/// two usable years yields `AnalyticsError::InsufficientHistory`.
pub fn project(
    history: &[HistoricalPoint],
    horizon_years: u32,
    config: &ProjectionConfig,
) -> AnalyticsResult<ProjectionResult> {
    if horizon_years == 0 || horizon_years > config.max_horizon_years {
        return Err(AnalyticsError::invalid(
            "horizon_years",
            format!(
                "must lie in 1..={} (got {horizon_years})",
                config.max_horizon_years
            ),
        ));
    }

    let mut warnings: Vec<String> = Vec::new();
    let history = usable_history(history, &mut warnings);

    if history.len() < MIN_HISTORY_POINTS {
        return Err(AnalyticsError::InsufficientHistory {
            usable: history.len(),
            required: MIN_HISTORY_POINTS,
        });
    }

    // history is sorted and holds at least two distinct years
    let first = history[0];
    let last = history[history.len() - 1];
    let periods = match config.cagr_periods {
        CagrPeriods::Observations => (history.len() - 1) as u32,
        CagrPeriods::YearSpan => (last.year - first.year).unsigned_abs(),
    };

    let revenue_cagr = cagr(first.revenue, last.revenue, periods);
    let net_income_cagr = cagr(first.net_income.abs(), last.net_income.abs(), periods);

    let revenue_fit = fit_series(&history, |p| p.revenue)?;
    let net_income_fit = fit_series(&history, |p| p.net_income)?;

    if revenue_fit.r_squared < dec!(0.5) {
        warnings.push(format!(
            "Low revenue trend fit (R² = {}); projections are indicative only",
            revenue_fit.r_squared.round_dp(3)
        ));
    }

    let revenue_weights = config.blend.weights(revenue_fit.r_squared);
    let net_income_weights = config.blend.weights(net_income_fit.r_squared);

    let mut forecasts: Vec<ForecastYear> = Vec::with_capacity(horizon_years as usize);
    for i in 1..=horizon_years {
        let year = last.year + i as i32;
        let year_dec = Decimal::from(year);

        let revenue_cagr_value = compound(last.revenue, revenue_cagr, i);
        let revenue_regression_value = revenue_fit.predict(year_dec);
        let net_income_cagr_value = compound(last.net_income, net_income_cagr, i);
        let net_income_regression_value = net_income_fit.predict(year_dec);

        let (year_revenue_weights, revenue) =
            blend(revenue_weights, revenue_cagr_value, revenue_regression_value);
        let (year_net_income_weights, net_income) = blend(
            net_income_weights,
            net_income_cagr_value,
            net_income_regression_value,
        );
        if year_revenue_weights != revenue_weights || year_net_income_weights != net_income_weights
        {
            warnings.push(format!(
                "{year}: compounded growth is not representable; regression used alone"
            ));
        }
        let net_margin = if revenue > Decimal::ZERO {
            net_income
                .checked_div(revenue)
                .and_then(|m| m.checked_mul(dec!(100)))
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        forecasts.push(ForecastYear {
            year,
            revenue,
            net_income,
            net_margin,
            revenue_cagr_value,
            revenue_regression_value,
            net_income_cagr_value,
            net_income_regression_value,
            revenue_weights: year_revenue_weights,
            net_income_weights: year_net_income_weights,
        });
    }

    tracing::debug!(
        points = history.len(),
        horizon_years,
        revenue_cagr = %revenue_cagr.round_dp(4),
        revenue_r_squared = %revenue_fit.r_squared.round_dp(4),
        "projection computed"
    );

    Ok(ProjectionResult {
        history,
        revenue_cagr,
        net_income_cagr,
        revenue_r_squared: revenue_fit.r_squared,
        net_income_r_squared: net_income_fit.r_squared,
        forecasts,
        method: config.blend.label(),
        warnings,
    })
}

/// `project` with the configured default horizon and default settings.
pub fn project_default(history: &[HistoricalPoint]) -> AnalyticsResult<ProjectionResult> {
    let config = ProjectionConfig::default();
    project(history, config.default_horizon_years, &config)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn usable_history(history: &[HistoricalPoint], warnings: &mut Vec<String>) -> Vec<HistoricalPoint> {
    let mut by_year: BTreeMap<i32, HistoricalPoint> = BTreeMap::new();
    let mut dropped = 0usize;

    for point in history {
        if point.revenue <= Decimal::ZERO || point.net_income.is_zero() {
            dropped += 1;
            continue;
        }
        if by_year.insert(point.year, *point).is_some() {
            warnings.push(format!(
                "Duplicate observation for {}; the later entry was used",
                point.year
            ));
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "history points without revenue or net income ignored");
        warnings.push(format!(
            "{dropped} observation(s) ignored: projection needs positive revenue and non-zero net income"
        ));
    }

    by_year.into_values().collect()
}

/// Blend one year's two paths, falling back to regression alone when the
/// CAGR path is unavailable or the weighted sum is not representable.
fn blend(
    weights: BlendWeights,
    cagr_value: Option<Money>,
    regression_value: Money,
) -> (BlendWeights, Money) {
    match cagr_value.and_then(|c| weights.apply(c, regression_value)) {
        Some(blended) => (weights, blended),
        None => (BlendWeights::regression_only(), regression_value),
    }
}

fn fit_series(
    history: &[HistoricalPoint],
    value: impl Fn(&HistoricalPoint) -> Money,
) -> AnalyticsResult<LinearFit> {
    let points: Vec<(Decimal, Decimal)> = history
        .iter()
        .map(|p| (Decimal::from(p.year), value(p)))
        .collect();
    LinearFit::fit(&points).ok_or_else(|| {
        AnalyticsError::invalid("history", "values too large to fit a linear trend")
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
