//! Typed financial statement records.
//!
//! Every line item defaults to zero when absent from the source data, and
//! unknown keys are ignored, so records can be deserialized straight from
//! whatever the data-entry layer stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::types::{Currency, Money, Shares};
use crate::AnalyticsResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSheet {
    pub asset_total: Money,
    pub current_assets: Money,
    pub inventories: Money,
    pub receivables: Money,
    pub cash: Money,
    pub equity: Money,
    pub total_debt: Money,
    pub current_liabilities: Money,
    /// Share price at the statement date
    pub share_price: Money,
    pub shares_outstanding: Shares,
    /// Reported book value per share, preferred over equity / shares when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_value_per_share: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeStatement {
    pub revenue: Money,
    pub operating_income: Money,
    pub net_income: Money,
    pub financial_expenses: Money,
    pub earnings_per_share: Money,
    /// Only consulted by `EbitdaPolicy::AddBackDepreciation`
    pub depreciation_amortisation: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlowStatement {
    pub operating_cash_flow: Money,
    pub investing_cash_flow: Money,
    pub financing_cash_flow: Money,
}

/// One company's statements for one fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialStatement {
    /// Ticker, e.g. "SNTS"
    pub symbol: String,
    pub year: i32,
    pub currency: Currency,
    pub balance_sheet: BalanceSheet,
    pub income_statement: IncomeStatement,
    pub cash_flow: CashFlowStatement,
}

impl FinancialStatement {
    /// Reject records that cannot come from a real filing. The engines assume
    /// well-typed numbers and never check these themselves.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(AnalyticsError::invalid("symbol", "must not be empty"));
        }

        let bs = &self.balance_sheet;
        let non_negative = [
            ("balance_sheet.asset_total", bs.asset_total),
            ("balance_sheet.current_assets", bs.current_assets),
            ("balance_sheet.inventories", bs.inventories),
            ("balance_sheet.receivables", bs.receivables),
            ("balance_sheet.cash", bs.cash),
            ("balance_sheet.total_debt", bs.total_debt),
            ("balance_sheet.current_liabilities", bs.current_liabilities),
            ("balance_sheet.share_price", bs.share_price),
            ("balance_sheet.shares_outstanding", bs.shares_outstanding),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(AnalyticsError::invalid(
                    field,
                    format!("must not be negative (got {value})"),
                ));
            }
        }
        if let Some(bvps) = bs.book_value_per_share {
            if bvps < Decimal::ZERO {
                return Err(AnalyticsError::invalid(
                    "balance_sheet.book_value_per_share",
                    format!("must not be negative (got {bvps})"),
                ));
            }
        }

        Ok(())
    }

    /// The (year, revenue, net income) observation used for projections.
    pub fn history_point(&self) -> HistoricalPoint {
        HistoricalPoint {
            year: self.year,
            revenue: self.income_statement.revenue,
            net_income: self.income_statement.net_income,
        }
    }
}

/// A single historical observation for the projection engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub year: i32,
    pub revenue: Money,
    pub net_income: Money,
}
