//! Engine configuration.
//!
//! Several formulas exist in more than one variant in practice (EBITDA with or
//! without a depreciation add-back, loose or strict peer sanity bands, a fixed
//! or R²-weighted projection blend). Each variant is a configuration value here
//! and the defaults reproduce the baseline behaviour.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::types::{Multiple, Percent};
use crate::AnalyticsResult;

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

/// How EBITDA is derived from the income statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EbitdaPolicy {
    /// EBITDA = operating income.
    #[default]
    OperatingIncome,
    /// EBITDA = operating income + depreciation & amortisation.
    AddBackDepreciation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioConfig {
    pub ebitda_policy: EbitdaPolicy,
    /// Multiplier applied to EBIT in ROIC in lieu of an explicit tax rate.
    pub roic_tax_factor: Decimal,
    /// Day count used for days sales outstanding.
    pub days_in_year: Decimal,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            ebitda_policy: EbitdaPolicy::OperatingIncome,
            roic_tax_factor: dec!(0.75),
            days_in_year: dec!(365),
        }
    }
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// Open interval `(lower, upper)` a peer multiple must fall in to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub lower: Multiple,
    pub upper: Multiple,
}

impl Band {
    pub const fn new(lower: Multiple, upper: Multiple) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: Multiple) -> bool {
        value > self.lower && value < self.upper
    }
}

/// Sanity bands excluding outliers and data-entry errors from peer medians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanityBands {
    pub price_earnings: Band,
    pub price_to_book: Band,
    pub ev_ebitda: Band,
    pub ev_sales: Band,
}

impl SanityBands {
    pub const fn loose() -> Self {
        Self {
            price_earnings: Band::new(dec!(0), dec!(100)),
            price_to_book: Band::new(dec!(0), dec!(20)),
            ev_ebitda: Band::new(dec!(0), dec!(50)),
            ev_sales: Band::new(dec!(0), dec!(10)),
        }
    }

    pub const fn strict() -> Self {
        Self {
            price_earnings: Band::new(dec!(5), dec!(30)),
            price_to_book: Band::new(dec!(0.5), dec!(10)),
            ev_ebitda: Band::new(dec!(3), dec!(20)),
            ev_sales: Band::new(dec!(0.5), dec!(5)),
        }
    }

    fn iter(&self) -> [(&'static str, Band); 4] {
        [
            ("price_earnings", self.price_earnings),
            ("price_to_book", self.price_to_book),
            ("ev_ebitda", self.ev_ebitda),
            ("ev_sales", self.ev_sales),
        ]
    }
}

impl Default for SanityBands {
    fn default() -> Self {
        Self::loose()
    }
}

/// Lower bounds (exclusive) of each recommendation tier, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    pub strong_buy: Percent,
    pub buy: Percent,
    pub hold: Percent,
    pub sell: Percent,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            strong_buy: dec!(20),
            buy: dec!(10),
            hold: dec!(-10),
            sell: dec!(-20),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    pub bands: SanityBands,
    /// In-band peer observations required before a sector median is used.
    pub min_peer_observations: usize,
    pub thresholds: RecommendationThresholds,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            bands: SanityBands::loose(),
            min_peer_observations: 2,
            thresholds: RecommendationThresholds::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// How the CAGR and regression extrapolations are combined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BlendPolicy {
    /// Constant weights: `cagr_weight` on CAGR, the rest on regression.
    Fixed { cagr_weight: Decimal },
    /// Regression weighted by its own fit: raw regression weight is
    /// `regression_factor × R²`, raw CAGR weight is `cagr_weight`, and the
    /// pair is normalised to sum to one.
    RSquaredWeighted {
        regression_factor: Decimal,
        cagr_weight: Decimal,
    },
}

impl BlendPolicy {
    pub const fn baseline() -> Self {
        BlendPolicy::Fixed {
            cagr_weight: dec!(0.4),
        }
    }

    pub const fn r_squared_weighted() -> Self {
        BlendPolicy::RSquaredWeighted {
            regression_factor: dec!(0.7),
            cagr_weight: dec!(0.3),
        }
    }
}

impl Default for BlendPolicy {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Number of compounding periods behind the CAGR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CagrPeriods {
    /// Usable observations minus one; a gap year is not compounded.
    #[default]
    Observations,
    /// Calendar years between the first and last usable observation.
    YearSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub default_horizon_years: u32,
    pub max_horizon_years: u32,
    pub blend: BlendPolicy,
    pub cagr_periods: CagrPeriods,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            default_horizon_years: 3,
            max_horizon_years: 5,
            blend: BlendPolicy::baseline(),
            cagr_periods: CagrPeriods::Observations,
        }
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub ratios: RatioConfig,
    pub valuation: ValuationConfig,
    pub projection: ProjectionConfig,
}

impl AnalyticsConfig {
    /// Reject configurations the engines cannot interpret meaningfully.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.ratios.roic_tax_factor < Decimal::ZERO
            || self.ratios.roic_tax_factor > Decimal::ONE
        {
            return Err(AnalyticsError::Config(
                "ratios.roic_tax_factor must lie in [0, 1]".into(),
            ));
        }
        if self.ratios.days_in_year <= Decimal::ZERO {
            return Err(AnalyticsError::Config(
                "ratios.days_in_year must be positive".into(),
            ));
        }

        for (name, band) in self.valuation.bands.iter() {
            if band.lower >= band.upper {
                return Err(AnalyticsError::Config(format!(
                    "valuation.bands.{name}: lower bound {} must be below upper bound {}",
                    band.lower, band.upper
                )));
            }
        }
        if self.valuation.min_peer_observations == 0 {
            return Err(AnalyticsError::Config(
                "valuation.min_peer_observations must be at least 1".into(),
            ));
        }
        let t = &self.valuation.thresholds;
        if !(t.strong_buy > t.buy && t.buy > t.hold && t.hold > t.sell) {
            return Err(AnalyticsError::Config(
                "valuation.thresholds must be strictly descending: strong_buy > buy > hold > sell"
                    .into(),
            ));
        }

        let p = &self.projection;
        if p.max_horizon_years == 0 {
            return Err(AnalyticsError::Config(
                "projection.max_horizon_years must be at least 1".into(),
            ));
        }
        if p.default_horizon_years == 0 || p.default_horizon_years > p.max_horizon_years {
            return Err(AnalyticsError::Config(format!(
                "projection.default_horizon_years must lie in 1..={}",
                p.max_horizon_years
            )));
        }
        match p.blend {
            BlendPolicy::Fixed { cagr_weight } => {
                if cagr_weight < Decimal::ZERO || cagr_weight > Decimal::ONE {
                    return Err(AnalyticsError::Config(
                        "projection.blend.cagr_weight must lie in [0, 1]".into(),
                    ));
                }
            }
            BlendPolicy::RSquaredWeighted {
                regression_factor,
                cagr_weight,
            } => {
                if regression_factor < Decimal::ZERO || cagr_weight <= Decimal::ZERO {
                    return Err(AnalyticsError::Config(
                        "projection.blend needs regression_factor >= 0 and cagr_weight > 0"
                            .into(),
                    ));
                }
            }
        }

        Ok(())
    }
}
