use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::BlendPolicy;

/// Weights applied to the CAGR and regression extrapolations of one series.
/// `cagr + regression == 1` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub cagr: Decimal,
    pub regression: Decimal,
}

impl BlendWeights {
    fn from_cagr(cagr: Decimal) -> Self {
        let cagr = cagr.clamp(Decimal::ZERO, Decimal::ONE);
        Self {
            cagr,
            regression: Decimal::ONE - cagr,
        }
    }

    pub(crate) fn regression_only() -> Self {
        Self::from_cagr(Decimal::ZERO)
    }

    /// Weighted sum of the two extrapolations, `None` on overflow.
    pub fn apply(&self, cagr_value: Decimal, regression_value: Decimal) -> Option<Decimal> {
        self.cagr
            .checked_mul(cagr_value)?
            .checked_add(self.regression.checked_mul(regression_value)?)
    }
}

impl BlendPolicy {
    /// Weights for a series whose regression fit has the given R².
    pub fn weights(&self, r_squared: Decimal) -> BlendWeights {
        match *self {
            BlendPolicy::Fixed { cagr_weight } => BlendWeights::from_cagr(cagr_weight),
            BlendPolicy::RSquaredWeighted {
                regression_factor,
                cagr_weight,
            } => {
                let raw_regression =
                    regression_factor * r_squared.clamp(Decimal::ZERO, Decimal::ONE);
                let total = raw_regression + cagr_weight;
                if total <= Decimal::ZERO {
                    return BlendWeights::from_cagr(Decimal::ONE);
                }
                BlendWeights::from_cagr(cagr_weight / total)
            }
        }
    }

    /// Human-readable description of the blend.
    pub fn label(&self) -> String {
        match *self {
            BlendPolicy::Fixed { cagr_weight } => {
                let cagr_pct = (cagr_weight * dec!(100)).normalize();
                let reg_pct = ((Decimal::ONE - cagr_weight) * dec!(100)).normalize();
                format!("{cagr_pct}% CAGR + {reg_pct}% Linear Regression")
            }
            BlendPolicy::RSquaredWeighted {
                regression_factor,
                cagr_weight,
            } => format!(
                "R²-weighted blend: regression {}×R², CAGR {} (normalised)",
                regression_factor.normalize(),
                cagr_weight.normalize()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_weights() {
        let w = BlendPolicy::baseline().weights(dec!(0.2));
        assert_eq!(w.cagr, dec!(0.4));
        assert_eq!(w.regression, dec!(0.6));
        assert_eq!(w.apply(dec!(100), dec!(200)), Some(dec!(160)));
    }

    #[test]
    fn test_r_squared_weights_sum_to_one() {
        let policy = BlendPolicy::r_squared_weighted();
        for r2 in [dec!(0), dec!(0.35), dec!(0.9), dec!(1)] {
            let w = policy.weights(r2);
            assert_eq!(w.cagr + w.regression, Decimal::ONE, "r2 = {r2}");
        }
    }

    #[test]
    fn test_r_squared_weights_values() {
        let policy = BlendPolicy::r_squared_weighted();
        // Perfect fit: 0.7 vs 0.3
        let w = policy.weights(Decimal::ONE);
        assert_eq!(w.regression, dec!(0.7));
        // No fit: everything on CAGR
        let w = policy.weights(Decimal::ZERO);
        assert_eq!(w.cagr, Decimal::ONE);
        assert_eq!(w.regression, Decimal::ZERO);
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            BlendPolicy::baseline().label(),
            "40% CAGR + 60% Linear Regression"
        );
        assert!(BlendPolicy::r_squared_weighted().label().starts_with("R²-weighted"));
    }
}
