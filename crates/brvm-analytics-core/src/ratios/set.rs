use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every quantity the ratio engine can publish.
///
/// Declaration order drives the serialized key order, so related ratios stay
/// grouped in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ratio {
    // Profitability (percent)
    NetMargin,
    EbitMargin,
    EbitdaMargin,
    Roe,
    Roa,
    Roic,
    // Liquidity (x)
    CurrentRatio,
    QuickRatio,
    CashRatio,
    // Leverage
    DebtToEquity,
    DebtToAssets,
    EquityToAssets,
    DebtToEbitda,
    InterestCoverage,
    // Efficiency
    AssetTurnover,
    InventoryTurnover,
    DaysSalesOutstanding,
    // Market
    PriceEarnings,
    EarningsPerShare,
    PriceToBook,
    BookValuePerShare,
    EvEbitda,
    EvSales,
    // Cash flow
    EarningsQuality,
    FcfYield,
    FcfToDebt,
    // Derived scalars, always published
    Ebitda,
    Ebit,
    Fcf,
    WorkingCapital,
    EnterpriseValue,
    MarketCap,
}

impl Ratio {
    /// The six intermediates published unconditionally.
    pub const DERIVED_SCALARS: [Ratio; 6] = [
        Ratio::Ebitda,
        Ratio::Ebit,
        Ratio::Fcf,
        Ratio::WorkingCapital,
        Ratio::EnterpriseValue,
        Ratio::MarketCap,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Ratio::NetMargin => "net_margin",
            Ratio::EbitMargin => "ebit_margin",
            Ratio::EbitdaMargin => "ebitda_margin",
            Ratio::Roe => "roe",
            Ratio::Roa => "roa",
            Ratio::Roic => "roic",
            Ratio::CurrentRatio => "current_ratio",
            Ratio::QuickRatio => "quick_ratio",
            Ratio::CashRatio => "cash_ratio",
            Ratio::DebtToEquity => "debt_to_equity",
            Ratio::DebtToAssets => "debt_to_assets",
            Ratio::EquityToAssets => "equity_to_assets",
            Ratio::DebtToEbitda => "debt_to_ebitda",
            Ratio::InterestCoverage => "interest_coverage",
            Ratio::AssetTurnover => "asset_turnover",
            Ratio::InventoryTurnover => "inventory_turnover",
            Ratio::DaysSalesOutstanding => "days_sales_outstanding",
            Ratio::PriceEarnings => "price_earnings",
            Ratio::EarningsPerShare => "earnings_per_share",
            Ratio::PriceToBook => "price_to_book",
            Ratio::BookValuePerShare => "book_value_per_share",
            Ratio::EvEbitda => "ev_ebitda",
            Ratio::EvSales => "ev_sales",
            Ratio::EarningsQuality => "earnings_quality",
            Ratio::FcfYield => "fcf_yield",
            Ratio::FcfToDebt => "fcf_to_debt",
            Ratio::Ebitda => "ebitda",
            Ratio::Ebit => "ebit",
            Ratio::Fcf => "fcf",
            Ratio::WorkingCapital => "working_capital",
            Ratio::EnterpriseValue => "enterprise_value",
            Ratio::MarketCap => "market_cap",
        }
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Named ratios for one company-year. A missing key means the ratio was not
/// computable from the inputs; it is never stored as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioSet {
    values: BTreeMap<Ratio, Decimal>,
}

impl RatioSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ratio: Ratio) -> Option<Decimal> {
        self.values.get(&ratio).copied()
    }

    pub fn contains(&self, ratio: Ratio) -> bool {
        self.values.contains_key(&ratio)
    }

    pub fn insert(&mut self, ratio: Ratio, value: Decimal) {
        self.values.insert(ratio, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ratio, Decimal)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(Ratio, Decimal)> for RatioSet {
    fn from_iter<I: IntoIterator<Item = (Ratio, Decimal)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
