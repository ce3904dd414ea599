use serde::{Deserialize, Serialize};

use crate::config::RecommendationThresholds;
use crate::types::Percent;

/// Closed five-tier recommendation scale, ordered from most bullish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecommendationTier {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl std::fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tier: RecommendationTier,
    pub justification: String,
}

impl RecommendationThresholds {
    /// Map a potential (percent gap to fair value) onto the tier scale.
    /// Each threshold is an exclusive lower bound.
    pub fn tier(&self, potential: Percent) -> RecommendationTier {
        if potential > self.strong_buy {
            RecommendationTier::StrongBuy
        } else if potential > self.buy {
            RecommendationTier::Buy
        } else if potential > self.hold {
            RecommendationTier::Hold
        } else if potential > self.sell {
            RecommendationTier::Sell
        } else {
            RecommendationTier::StrongSell
        }
    }

    pub fn recommend(&self, potential: Percent) -> Recommendation {
        let tier = self.tier(potential);
        let shown = potential.round_dp(1);
        let magnitude = shown.abs();
        let justification = match tier {
            RecommendationTier::StrongBuy => {
                format!("Undervalued by {shown:.1}% relative to peers")
            }
            RecommendationTier::Buy => format!("Upside potential of {shown:.1}%"),
            RecommendationTier::Hold => {
                format!("Valuation close to fair value (gap of {shown:.1}%)")
            }
            RecommendationTier::Sell => format!("Overvalued by {magnitude:.1}%"),
            RecommendationTier::StrongSell => {
                format!("Significantly overvalued by {magnitude:.1}%")
            }
        };
        Recommendation {
            tier,
            justification,
        }
    }
}
