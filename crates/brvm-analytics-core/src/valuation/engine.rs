use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ValuationConfig;
use crate::ratios::Ratio;
use crate::stats;
use crate::types::{Money, Multiple, Percent};
use crate::valuation::peers::{sector_medians, PeerMultiple, PeerUniverse, SectorMedians, SubjectProfile};
use crate::valuation::recommendation::Recommendation;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Relative valuation methods applied to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    PriceEarnings,
    PriceToBook,
    EvEbitda,
}

impl ValuationMethod {
    pub fn multiple(&self) -> PeerMultiple {
        match self {
            ValuationMethod::PriceEarnings => PeerMultiple::PriceEarnings,
            ValuationMethod::PriceToBook => PeerMultiple::PriceToBook,
            ValuationMethod::EvEbitda => PeerMultiple::EvEbitda,
        }
    }
}

impl std::fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.multiple())
    }
}

/// Fair value of the subject under one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodValuation {
    pub method: ValuationMethod,
    /// Sector median multiple applied
    pub sector_multiple: Multiple,
    /// Subject metric the multiple was applied to (EPS, BVPS or EBITDA)
    pub base_metric: Money,
    /// Implied value per share
    pub fair_value: Money,
    /// (fair value − price) / price × 100; absent without a positive price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_pct: Option<Percent>,
}

/// Aggregate of the per-method gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potential {
    pub mean: Percent,
    pub median: Percent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub symbol: String,
    pub year: i32,
    pub current_price: Money,
    pub sector_medians: SectorMedians,
    /// In-band peer observations per multiple
    pub peer_counts: BTreeMap<PeerMultiple, usize>,
    pub methods: Vec<MethodValuation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential: Option<Potential>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    pub warnings: Vec<String>,
}

impl ValuationResult {
    pub fn method(&self, method: ValuationMethod) -> Option<&MethodValuation> {
        self.methods.iter().find(|m| m.method == method)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value the subject against the sector medians of its peers.
///
/// Peer multiples outside the configured sanity bands are dropped before the
/// median is taken. Each method runs independently and is omitted when its
/// inputs are missing; with no method available the result carries no
/// potential and no recommendation. This function never fails.
pub fn compute_valuation(
    subject: &SubjectProfile,
    peers: &PeerUniverse,
    config: &ValuationConfig,
) -> ValuationResult {
    let mut warnings: Vec<String> = Vec::new();
    let subject_key = (subject.symbol.as_str(), subject.year);

    let (medians, counts) = sector_medians(
        peers,
        &config.bands,
        config.min_peer_observations,
        subject_key,
    );

    for (multiple, count) in &counts {
        if *count < config.min_peer_observations {
            warnings.push(format!(
                "{multiple}: {count} in-band peer observation(s), at least {} required",
                config.min_peer_observations
            ));
        }
    }

    let price = subject.share_price;
    if price <= Decimal::ZERO {
        warnings.push("Share price is not positive; gaps to fair value cannot be computed".into());
    }

    let methods: Vec<MethodValuation> = [
        ValuationMethod::PriceEarnings,
        ValuationMethod::PriceToBook,
        ValuationMethod::EvEbitda,
    ]
    .into_iter()
    .filter_map(|method| {
        let sector_multiple = medians.get(method.multiple())?;
        let valued = value_by_method(method, sector_multiple, subject, price);
        if valued.is_none() {
            tracing::debug!(%method, symbol = %subject.symbol, "valuation method skipped: subject metric unavailable");
            warnings.push(format!("{method}: subject lacks the inputs for this method"));
        }
        valued
    })
    .collect();

    let gaps: Vec<Percent> = methods.iter().filter_map(|m| m.gap_pct).collect();
    let potential = match (stats::mean(&gaps), stats::median(&gaps)) {
        (Some(mean), Some(median)) => Some(Potential { mean, median }),
        _ => None,
    };
    let recommendation = potential.map(|p| config.thresholds.recommend(p.median));

    if recommendation.is_none() {
        warnings.push("Insufficient data for a recommendation".into());
    }

    tracing::debug!(
        symbol = %subject.symbol,
        year = subject.year,
        peers = peers.len(),
        methods = methods.len(),
        tier = ?recommendation.as_ref().map(|r| r.tier),
        "valuation computed"
    );

    ValuationResult {
        symbol: subject.symbol.clone(),
        year: subject.year,
        current_price: price,
        sector_medians: medians,
        peer_counts: counts.into_iter().collect(),
        methods,
        potential,
        recommendation,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn value_by_method(
    method: ValuationMethod,
    sector_multiple: Multiple,
    subject: &SubjectProfile,
    price: Money,
) -> Option<MethodValuation> {
    let (base_metric, fair_value) = match method {
        ValuationMethod::PriceEarnings => {
            let eps = subject.eps().filter(|e| *e > Decimal::ZERO)?;
            (eps, sector_multiple.checked_mul(eps)?)
        }
        ValuationMethod::PriceToBook => {
            let bvps = subject.bvps().filter(|b| *b > Decimal::ZERO)?;
            (bvps, sector_multiple.checked_mul(bvps)?)
        }
        ValuationMethod::EvEbitda => {
            let ebitda = subject
                .ratios
                .get(Ratio::Ebitda)
                .filter(|e| *e > Decimal::ZERO)?;
            if subject.shares_outstanding <= Decimal::ZERO {
                return None;
            }
            let implied_ev = sector_multiple.checked_mul(ebitda)?;
            let equity_value = implied_ev - subject.total_debt + subject.cash;
            (ebitda, equity_value.checked_div(subject.shares_outstanding)?)
        }
    };

    Some(MethodValuation {
        method,
        sector_multiple,
        base_metric,
        fair_value,
        gap_pct: gap_to_price(fair_value, price),
    })
}

fn gap_to_price(fair_value: Money, price: Money) -> Option<Percent> {
    if price <= Decimal::ZERO {
        return None;
    }
    (fair_value - price)
        .checked_div(price)
        .and_then(|gap| gap.checked_mul(dec!(100)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::RatioSet;
    use crate::valuation::peers::PeerObservation;
    use crate::valuation::recommendation::RecommendationTier;

    fn peer(symbol: &str, pe: Decimal, pb: Decimal, ev_ebitda: Decimal) -> PeerObservation {
        let ratios: RatioSet = [
            (Ratio::PriceEarnings, pe),
            (Ratio::PriceToBook, pb),
            (Ratio::EvEbitda, ev_ebitda),
            (Ratio::EvSales, dec!(1.5)),
        ]
        .into_iter()
        .collect();
        PeerObservation {
            symbol: symbol.into(),
            year: 2023,
            ratios,
        }
    }

    fn sample_peers() -> PeerUniverse {
        PeerUniverse::new(vec![
            peer("SNTS", dec!(10), dec!(2), dec!(6)),
            peer("ORAC", dec!(12), dec!(3), dec!(8)),
            peer("SGBC", dec!(14), dec!(4), dec!(10)),
        ])
    }

    fn sample_subject(price: Decimal) -> SubjectProfile {
        let ratios: RatioSet = [(Ratio::Ebitda, dec!(200))].into_iter().collect();
        SubjectProfile {
            symbol: "SIBC".into(),
            year: 2023,
            ratios,
            share_price: price,
            shares_outstanding: dec!(100),
            total_debt: dec!(500),
            cash: dec!(100),
            net_income: dec!(150),
            equity: dec!(800),
            earnings_per_share: Decimal::ZERO,
            book_value_per_share: None,
        }
    }

    #[test]
    fn test_sector_medians() {
        let result = compute_valuation(
            &sample_subject(dec!(15)),
            &sample_peers(),
            &ValuationConfig::default(),
        );
        assert_eq!(result.sector_medians.price_earnings, Some(dec!(12)));
        assert_eq!(result.sector_medians.price_to_book, Some(dec!(3)));
        assert_eq!(result.sector_medians.ev_ebitda, Some(dec!(8)));
        assert_eq!(result.sector_medians.ev_sales, Some(dec!(1.5)));
        assert_eq!(result.peer_counts[&PeerMultiple::PriceEarnings], 3);
    }

    #[test]
    fn test_method_fair_values() {
        let result = compute_valuation(
            &sample_subject(dec!(15)),
            &sample_peers(),
            &ValuationConfig::default(),
        );

        // EPS = 150 / 100 = 1.5, fair = 12 * 1.5 = 18, gap = 20%
        let pe = result.method(ValuationMethod::PriceEarnings).unwrap();
        assert_eq!(pe.fair_value, dec!(18));
        assert_eq!(pe.gap_pct, Some(dec!(20)));

        // BVPS = 8, fair = 24, gap = 60%
        let pb = result.method(ValuationMethod::PriceToBook).unwrap();
        assert_eq!(pb.fair_value, dec!(24));
        assert_eq!(pb.gap_pct, Some(dec!(60)));

        // EV = 8 * 200 = 1600, equity = 1600 - 500 + 100 = 1200, per share 12
        let ev = result.method(ValuationMethod::EvEbitda).unwrap();
        assert_eq!(ev.fair_value, dec!(12));
        assert_eq!(ev.gap_pct, Some(dec!(-20)));

        let potential = result.potential.unwrap();
        assert_eq!(potential.median, dec!(20));
        assert_eq!(potential.mean, dec!(20));
        // 20 is not strictly above the strong-buy threshold
        assert_eq!(
            result.recommendation.as_ref().unwrap().tier,
            RecommendationTier::Buy
        );

        // English key; the French "recommandation" is not emitted
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["recommendation"]["tier"], "BUY");
        assert!(json.get("recommandation").is_none());
    }

    #[test]
    fn test_no_gap_without_price() {
        let result = compute_valuation(
            &sample_subject(Decimal::ZERO),
            &sample_peers(),
            &ValuationConfig::default(),
        );
        assert_eq!(result.methods.len(), 3);
        assert!(result.methods.iter().all(|m| m.gap_pct.is_none()));
        assert!(result.potential.is_none());
        assert!(result.recommendation.is_none());
    }

    #[test]
    fn test_loss_maker_skips_pe_method() {
        let mut subject = sample_subject(dec!(15));
        subject.net_income = dec!(-40);
        let result = compute_valuation(&subject, &sample_peers(), &ValuationConfig::default());

        assert!(result.method(ValuationMethod::PriceEarnings).is_none());
        assert!(result.method(ValuationMethod::PriceToBook).is_some());
        assert!(result.warnings.iter().any(|w| w.starts_with("P/E")));
    }

    #[test]
    fn test_empty_universe() {
        let result = compute_valuation(
            &sample_subject(dec!(15)),
            &PeerUniverse::default(),
            &ValuationConfig::default(),
        );
        assert!(result.sector_medians.is_empty());
        assert!(result.methods.is_empty());
        assert!(result.recommendation.is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("recommendation").is_none());
        assert!(json.get("potential").is_none());
    }

    #[test]
    fn test_unrepresentable_gap_is_omitted() {
        // fair value 12 * 1.5 = 18 against a price so small the ratio overflows
        let result = compute_valuation(
            &sample_subject(dec!(0.0000000000000000000000000001)),
            &sample_peers(),
            &ValuationConfig::default(),
        );
        let pe = result.method(ValuationMethod::PriceEarnings).unwrap();
        assert_eq!(pe.fair_value, dec!(18));
        assert!(pe.gap_pct.is_none());
    }
}
