use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::{EbitdaPolicy, RatioConfig};
use crate::ratios::set::{Ratio, RatioSet};
use crate::statements::{BalanceSheet, CashFlowStatement, IncomeStatement};
use crate::types::Money;

const HUNDRED: Decimal = dec!(100);

/// Intermediate scalars shared by many ratios.
#[derive(Debug, Clone, Copy)]
struct Intermediates {
    ebitda: Money,
    ebit: Money,
    fcf: Money,
    working_capital: Money,
    market_cap: Money,
    enterprise_value: Money,
}

impl Intermediates {
    fn from_statements(
        bs: &BalanceSheet,
        is: &IncomeStatement,
        cf: &CashFlowStatement,
        policy: EbitdaPolicy,
    ) -> Self {
        let ebit = is.operating_income;
        let ebitda = match policy {
            EbitdaPolicy::OperatingIncome => is.operating_income,
            EbitdaPolicy::AddBackDepreciation => {
                is.operating_income + is.depreciation_amortisation
            }
        };
        // An unrepresentable product is reported as zero, like a missing input.
        let market_cap = bs.share_price.checked_mul(bs.shares_outstanding);
        let enterprise_value = market_cap
            .and_then(|cap| cap.checked_add(bs.total_debt))
            .and_then(|v| v.checked_sub(bs.cash))
            .unwrap_or(Decimal::ZERO);
        let market_cap = market_cap.unwrap_or(Decimal::ZERO);

        Self {
            ebitda,
            ebit,
            fcf: cf.operating_cash_flow + cf.investing_cash_flow,
            working_capital: bs.current_assets - bs.current_liabilities,
            market_cap,
            enterprise_value,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the full ratio set for one company-year.
///
/// Never fails: a ratio whose operands are missing (zero) or whose
/// denominator is not usable is left out of the result. The six derived
/// scalars (EBITDA, EBIT, FCF, working capital, enterprise value, market cap)
/// are always present because the valuation engine reads them directly.
pub fn compute_ratios(
    bs: &BalanceSheet,
    is: &IncomeStatement,
    cf: &CashFlowStatement,
    config: &RatioConfig,
) -> RatioSet {
    let m = Intermediates::from_statements(bs, is, cf, config.ebitda_policy);
    let mut ratios = RatioSet::new();

    profitability(bs, is, &m, config, &mut ratios);
    liquidity(bs, &mut ratios);
    leverage(bs, is, &m, &mut ratios);
    efficiency(bs, is, config, &mut ratios);
    market(bs, is, &m, &mut ratios);
    cash_flow(bs, is, cf, &m, &mut ratios);

    ratios.insert(Ratio::Ebitda, m.ebitda);
    ratios.insert(Ratio::Ebit, m.ebit);
    ratios.insert(Ratio::Fcf, m.fcf);
    ratios.insert(Ratio::WorkingCapital, m.working_capital);
    ratios.insert(Ratio::EnterpriseValue, m.enterprise_value);
    ratios.insert(Ratio::MarketCap, m.market_cap);

    tracing::debug!(
        computed = ratios.len(),
        ebitda = %m.ebitda,
        enterprise_value = %m.enterprise_value,
        "ratio set computed"
    );

    ratios
}

// ---------------------------------------------------------------------------
// Ratio groups
// ---------------------------------------------------------------------------

fn profitability(
    bs: &BalanceSheet,
    is: &IncomeStatement,
    m: &Intermediates,
    config: &RatioConfig,
    out: &mut RatioSet,
) {
    let revenue = is.revenue;
    let net_income = is.net_income;

    if present(net_income) && present(revenue) {
        put(out, Ratio::NetMargin, percent_of(net_income, revenue));
    }
    if present(m.ebit) && present(revenue) {
        put(out, Ratio::EbitMargin, percent_of(m.ebit, revenue));
    }
    if present(m.ebitda) && present(revenue) {
        put(out, Ratio::EbitdaMargin, percent_of(m.ebitda, revenue));
    }
    if present(net_income) && present(bs.equity) {
        put(out, Ratio::Roe, percent_of(net_income, bs.equity));
    }
    if present(net_income) && present(bs.asset_total) {
        put(out, Ratio::Roa, percent_of(net_income, bs.asset_total));
    }

    // Invested capital approximated as total assets less current liabilities.
    if present(m.ebit) && present(bs.asset_total) {
        let invested = bs.asset_total - bs.current_liabilities;
        if invested > Decimal::ZERO {
            put(
                out,
                Ratio::Roic,
                m.ebit
                    .checked_mul(config.roic_tax_factor)
                    .and_then(|nopat| percent_of(nopat, invested)),
            );
        }
    }
}

fn liquidity(bs: &BalanceSheet, out: &mut RatioSet) {
    let cl = bs.current_liabilities;
    if cl <= Decimal::ZERO {
        return;
    }

    if present(bs.current_assets) {
        put(out, Ratio::CurrentRatio, divide(bs.current_assets, cl));
        put(
            out,
            Ratio::QuickRatio,
            divide(bs.current_assets - bs.inventories, cl),
        );
    }
    if present(bs.cash) {
        put(out, Ratio::CashRatio, divide(bs.cash, cl));
    }
}

fn leverage(bs: &BalanceSheet, is: &IncomeStatement, m: &Intermediates, out: &mut RatioSet) {
    let debt = bs.total_debt;

    if present(debt) && bs.equity > Decimal::ZERO {
        put(out, Ratio::DebtToEquity, percent_of(debt, bs.equity));
    }
    if present(debt) && bs.asset_total > Decimal::ZERO {
        put(out, Ratio::DebtToAssets, percent_of(debt, bs.asset_total));
    }
    if present(bs.equity) && bs.asset_total > Decimal::ZERO {
        put(out, Ratio::EquityToAssets, percent_of(bs.equity, bs.asset_total));
    }
    if present(debt) && m.ebitda > Decimal::ZERO {
        put(out, Ratio::DebtToEbitda, divide(debt, m.ebitda));
    }
    if present(m.ebit) && present(is.financial_expenses) {
        put(
            out,
            Ratio::InterestCoverage,
            divide(m.ebit, is.financial_expenses.abs()),
        );
    }
}

fn efficiency(bs: &BalanceSheet, is: &IncomeStatement, config: &RatioConfig, out: &mut RatioSet) {
    let revenue = is.revenue;
    if !present(revenue) {
        return;
    }

    if bs.asset_total > Decimal::ZERO {
        put(out, Ratio::AssetTurnover, divide(revenue, bs.asset_total));
    }
    if bs.inventories > Decimal::ZERO {
        put(out, Ratio::InventoryTurnover, divide(revenue, bs.inventories));
    }
    if present(bs.receivables) && revenue > Decimal::ZERO {
        put(
            out,
            Ratio::DaysSalesOutstanding,
            divide(bs.receivables, revenue).and_then(|r| r.checked_mul(config.days_in_year)),
        );
    }
}

fn market(bs: &BalanceSheet, is: &IncomeStatement, m: &Intermediates, out: &mut RatioSet) {
    let price = bs.share_price;
    let shares = bs.shares_outstanding;

    // P/E: reported EPS first, otherwise EPS derived from net income.
    if price > Decimal::ZERO {
        if is.earnings_per_share > Decimal::ZERO {
            put(out, Ratio::PriceEarnings, divide(price, is.earnings_per_share));
        } else if present(is.net_income) && shares > Decimal::ZERO {
            if let Some(eps) = divide(is.net_income, shares).filter(|eps| *eps > Decimal::ZERO) {
                out.insert(Ratio::EarningsPerShare, eps);
                put(out, Ratio::PriceEarnings, divide(price, eps));
            }
        }
    }

    // P/B: reported book value per share first, otherwise equity / shares.
    if price > Decimal::ZERO {
        match bs.book_value_per_share.filter(|bvps| *bvps > Decimal::ZERO) {
            Some(bvps) => put(out, Ratio::PriceToBook, divide(price, bvps)),
            None if present(bs.equity) && shares > Decimal::ZERO => {
                if let Some(bvps) = divide(bs.equity, shares).filter(|b| *b > Decimal::ZERO) {
                    out.insert(Ratio::BookValuePerShare, bvps);
                    put(out, Ratio::PriceToBook, divide(price, bvps));
                }
            }
            None => {}
        }
    }

    if present(m.enterprise_value) && m.ebitda > Decimal::ZERO {
        put(out, Ratio::EvEbitda, divide(m.enterprise_value, m.ebitda));
    }
    if present(m.enterprise_value) && is.revenue > Decimal::ZERO {
        put(out, Ratio::EvSales, divide(m.enterprise_value, is.revenue));
    }
}

fn cash_flow(
    bs: &BalanceSheet,
    is: &IncomeStatement,
    cf: &CashFlowStatement,
    m: &Intermediates,
    out: &mut RatioSet,
) {
    if present(cf.operating_cash_flow) && present(is.net_income) {
        put(
            out,
            Ratio::EarningsQuality,
            divide(cf.operating_cash_flow, is.net_income),
        );
    }
    if present(m.fcf) && m.market_cap > Decimal::ZERO {
        put(out, Ratio::FcfYield, percent_of(m.fcf, m.market_cap));
    }
    if present(m.fcf) && bs.total_debt > Decimal::ZERO {
        put(out, Ratio::FcfToDebt, divide(m.fcf, bs.total_debt));
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A line item counts as supplied only when it is non-zero.
fn present(value: Decimal) -> bool {
    !value.is_zero()
}

fn divide(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator.checked_div(denominator)
}

fn percent_of(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    divide(numerator, denominator).and_then(|r| r.checked_mul(HUNDRED))
}

/// Insert only when the arithmetic succeeded.
fn put(out: &mut RatioSet, ratio: Ratio, value: Option<Decimal>) {
    if let Some(v) = value {
        out.insert(ratio, v);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
