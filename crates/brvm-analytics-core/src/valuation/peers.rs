use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{Band, SanityBands};
use crate::ratios::{Ratio, RatioSet};
use crate::statements::FinancialStatement;
use crate::stats;
use crate::types::{Money, Multiple, Shares};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Precomputed ratios of one comparable company-year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerObservation {
    pub symbol: String,
    pub year: i32,
    pub ratios: RatioSet,
}

/// The comparable set a subject is valued against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerUniverse {
    peers: Vec<PeerObservation>,
}

impl PeerUniverse {
    pub fn new(peers: Vec<PeerObservation>) -> Self {
        Self { peers }
    }

    pub fn push(&mut self, peer: PeerObservation) {
        self.peers.push(peer);
    }

    /// Copy of the universe without the given company-year.
    pub fn excluding(&self, symbol: &str, year: i32) -> Self {
        self.peers
            .iter()
            .filter(|p| !(p.symbol == symbol && p.year == year))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerObservation> {
        self.peers.iter()
    }
}

impl FromIterator<PeerObservation> for PeerUniverse {
    fn from_iter<I: IntoIterator<Item = PeerObservation>>(iter: I) -> Self {
        Self {
            peers: iter.into_iter().collect(),
        }
    }
}

/// Market multiples benchmarked against the sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerMultiple {
    PriceEarnings,
    PriceToBook,
    EvEbitda,
    EvSales,
}

impl PeerMultiple {
    pub const ALL: [PeerMultiple; 4] = [
        PeerMultiple::PriceEarnings,
        PeerMultiple::PriceToBook,
        PeerMultiple::EvEbitda,
        PeerMultiple::EvSales,
    ];

    pub fn ratio(&self) -> Ratio {
        match self {
            PeerMultiple::PriceEarnings => Ratio::PriceEarnings,
            PeerMultiple::PriceToBook => Ratio::PriceToBook,
            PeerMultiple::EvEbitda => Ratio::EvEbitda,
            PeerMultiple::EvSales => Ratio::EvSales,
        }
    }

    pub fn band(&self, bands: &SanityBands) -> Band {
        match self {
            PeerMultiple::PriceEarnings => bands.price_earnings,
            PeerMultiple::PriceToBook => bands.price_to_book,
            PeerMultiple::EvEbitda => bands.ev_ebitda,
            PeerMultiple::EvSales => bands.ev_sales,
        }
    }
}

impl std::fmt::Display for PeerMultiple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerMultiple::PriceEarnings => write!(f, "P/E"),
            PeerMultiple::PriceToBook => write!(f, "P/B"),
            PeerMultiple::EvEbitda => write!(f, "EV/EBITDA"),
            PeerMultiple::EvSales => write!(f, "EV/Sales"),
        }
    }
}

/// Sector median per multiple. A field is `None` when too few peers had an
/// in-band value for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorMedians {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_earnings: Option<Multiple>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_to_book: Option<Multiple>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_ebitda: Option<Multiple>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_sales: Option<Multiple>,
}

impl SectorMedians {
    pub fn get(&self, multiple: PeerMultiple) -> Option<Multiple> {
        match multiple {
            PeerMultiple::PriceEarnings => self.price_earnings,
            PeerMultiple::PriceToBook => self.price_to_book,
            PeerMultiple::EvEbitda => self.ev_ebitda,
            PeerMultiple::EvSales => self.ev_sales,
        }
    }

    fn set(&mut self, multiple: PeerMultiple, value: Multiple) {
        let slot = match multiple {
            PeerMultiple::PriceEarnings => &mut self.price_earnings,
            PeerMultiple::PriceToBook => &mut self.price_to_book,
            PeerMultiple::EvEbitda => &mut self.ev_ebitda,
            PeerMultiple::EvSales => &mut self.ev_sales,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        PeerMultiple::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// Everything the valuation engine needs to know about the company being
/// valued: its ratio set plus the balance-sheet inputs used to convert sector
/// multiples into a per-share value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub symbol: String,
    pub year: i32,
    pub ratios: RatioSet,
    pub share_price: Money,
    pub shares_outstanding: Shares,
    pub total_debt: Money,
    pub cash: Money,
    pub net_income: Money,
    pub equity: Money,
    /// Reported EPS; zero when not reported
    #[serde(default)]
    pub earnings_per_share: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_value_per_share: Option<Money>,
}

impl SubjectProfile {
    pub fn from_statement(statement: &FinancialStatement, ratios: RatioSet) -> Self {
        let bs = &statement.balance_sheet;
        Self {
            symbol: statement.symbol.clone(),
            year: statement.year,
            ratios,
            share_price: bs.share_price,
            shares_outstanding: bs.shares_outstanding,
            total_debt: bs.total_debt,
            cash: bs.cash,
            net_income: statement.income_statement.net_income,
            equity: bs.equity,
            earnings_per_share: statement.income_statement.earnings_per_share,
            book_value_per_share: bs.book_value_per_share,
        }
    }

    /// EPS for the P/E method: ratio set, then reported, then NI / shares.
    pub fn eps(&self) -> Option<Decimal> {
        self.ratios
            .get(Ratio::EarningsPerShare)
            .or_else(|| Some(self.earnings_per_share).filter(|e| !e.is_zero()))
            .or_else(|| self.per_share(self.net_income))
    }

    /// Book value per share for the P/B method: ratio set, then reported,
    /// then equity / shares.
    pub fn bvps(&self) -> Option<Decimal> {
        self.ratios
            .get(Ratio::BookValuePerShare)
            .or(self.book_value_per_share.filter(|b| !b.is_zero()))
            .or_else(|| self.per_share(self.equity))
    }

    fn per_share(&self, amount: Money) -> Option<Decimal> {
        if amount.is_zero() || self.shares_outstanding <= Decimal::ZERO {
            return None;
        }
        amount.checked_div(self.shares_outstanding)
    }
}

// ---------------------------------------------------------------------------
// Sector medians
// ---------------------------------------------------------------------------

/// In-band observations of one multiple, skipping the subject's own row.
pub(crate) fn in_band_values(
    peers: &PeerUniverse,
    multiple: PeerMultiple,
    bands: &SanityBands,
    subject: (&str, i32),
) -> Vec<Multiple> {
    let band = multiple.band(bands);
    peers
        .iter()
        .filter(|p| !(p.symbol == subject.0 && p.year == subject.1))
        .filter_map(|p| p.ratios.get(multiple.ratio()))
        .filter(|v| band.contains(*v))
        .collect()
}

/// Median of each multiple with at least `min_observations` in-band values.
/// Also returns the in-band count per multiple.
pub(crate) fn sector_medians(
    peers: &PeerUniverse,
    bands: &SanityBands,
    min_observations: usize,
    subject: (&str, i32),
) -> (SectorMedians, Vec<(PeerMultiple, usize)>) {
    let mut medians = SectorMedians::default();
    let mut counts = Vec::with_capacity(PeerMultiple::ALL.len());

    for multiple in PeerMultiple::ALL {
        let values = in_band_values(peers, multiple, bands, subject);
        counts.push((multiple, values.len()));
        if values.len() < min_observations {
            continue;
        }
        if let Some(median) = stats::median(&values) {
            medians.set(multiple, median);
        }
    }

    (medians, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn peer(symbol: &str, year: i32, pe: Decimal) -> PeerObservation {
        let mut ratios = RatioSet::new();
        ratios.insert(Ratio::PriceEarnings, pe);
        PeerObservation {
            symbol: symbol.into(),
            year,
            ratios,
        }
    }

    #[test]
    fn test_excluding_drops_only_matching_year() {
        let universe = PeerUniverse::new(vec![
            peer("SNTS", 2022, dec!(12)),
            peer("SNTS", 2023, dec!(14)),
            peer("ORAC", 2023, dec!(9)),
        ]);
        let filtered = universe.excluding("SNTS", 2023);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|p| !(p.symbol == "SNTS" && p.year == 2023)));
    }

    #[test]
    fn test_outlier_excluded_before_median() {
        let universe = PeerUniverse::new(vec![
            peer("A", 2023, dec!(10)),
            peer("B", 2023, dec!(12)),
            peer("C", 2023, dec!(500)),
        ]);
        let (medians, counts) =
            sector_medians(&universe, &SanityBands::loose(), 2, ("X", 2023));
        assert_eq!(medians.price_earnings, Some(dec!(11)));
        assert_eq!(counts[0], (PeerMultiple::PriceEarnings, 2));
    }

    #[test]
    fn test_subject_row_ignored() {
        let universe = PeerUniverse::new(vec![
            peer("A", 2023, dec!(10)),
            peer("X", 2023, dec!(30)),
        ]);
        let values = in_band_values(
            &universe,
            PeerMultiple::PriceEarnings,
            &SanityBands::loose(),
            ("X", 2023),
        );
        assert_eq!(values, vec![dec!(10)]);
    }

    #[test]
    fn test_subject_eps_fallbacks() {
        let mut subject = SubjectProfile {
            symbol: "X".into(),
            year: 2023,
            ratios: RatioSet::new(),
            share_price: dec!(20),
            shares_outstanding: dec!(10),
            total_debt: Decimal::ZERO,
            cash: Decimal::ZERO,
            net_income: dec!(30),
            equity: dec!(150),
            earnings_per_share: Decimal::ZERO,
            book_value_per_share: None,
        };
        assert_eq!(subject.eps(), Some(dec!(3)));
        assert_eq!(subject.bvps(), Some(dec!(15)));

        subject.earnings_per_share = dec!(2.5);
        assert_eq!(subject.eps(), Some(dec!(2.5)));

        subject.ratios.insert(Ratio::EarningsPerShare, dec!(2.8));
        assert_eq!(subject.eps(), Some(dec!(2.8)));

        subject.book_value_per_share = Some(dec!(12));
        assert_eq!(subject.bvps(), Some(dec!(12)));
    }
}
