use brvm_analytics_core::analysis::{
    analyse_company, analyse_projection, analyse_ratios, analyse_valuation, AnalysisInput,
    PeerScope, ProjectionInput, ValuationInput,
};
use brvm_analytics_core::config::AnalyticsConfig;
use brvm_analytics_core::ratios::Ratio;
use brvm_analytics_core::statements::{
    BalanceSheet, CashFlowStatement, FinancialStatement, HistoricalPoint, IncomeStatement,
};
use brvm_analytics_core::valuation::PeerObservation;
use brvm_analytics_core::AnalyticsError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn statement(symbol: &str, year: i32, scale: Decimal, price: Decimal) -> FinancialStatement {
    FinancialStatement {
        symbol: symbol.into(),
        year,
        balance_sheet: BalanceSheet {
            asset_total: dec!(1000) * scale,
            current_assets: dec!(400) * scale,
            inventories: dec!(60) * scale,
            receivables: dec!(90) * scale,
            cash: dec!(50) * scale,
            equity: dec!(500) * scale,
            total_debt: dec!(250) * scale,
            current_liabilities: dec!(220) * scale,
            share_price: price,
            shares_outstanding: dec!(10),
            book_value_per_share: None,
        },
        income_statement: IncomeStatement {
            revenue: dec!(900) * scale,
            operating_income: dec!(130) * scale,
            net_income: dec!(70) * scale,
            financial_expenses: dec!(15) * scale,
            ..Default::default()
        },
        cash_flow: CashFlowStatement {
            operating_cash_flow: dec!(110) * scale,
            investing_cash_flow: dec!(-45) * scale,
            financing_cash_flow: dec!(-30) * scale,
        },
        ..Default::default()
    }
}

fn stored_statements() -> Vec<FinancialStatement> {
    vec![
        statement("SNTS", 2023, dec!(3), dec!(250)),
        statement("ORAC", 2023, dec!(2), dec!(130)),
        statement("SGBC", 2023, dec!(1.5), dec!(95)),
        statement("SIBC", 2021, dec!(0.8), dec!(60)),
        statement("SIBC", 2022, dec!(0.9), dec!(66)),
    ]
}

// ===========================================================================
// Full analysis
// ===========================================================================

#[test]
fn test_full_analysis_report() {
    let input = AnalysisInput {
        subject: statement("SIBC", 2023, dec!(1), dec!(70)),
        statements: stored_statements(),
        horizon_years: Some(2),
        peer_scope: PeerScope::AllOtherRows,
    };
    let output = analyse_company(&input, &AnalyticsConfig::default()).unwrap();
    let report = &output.result;

    assert_eq!(report.symbol, "SIBC");
    assert!(report.ratios.contains(Ratio::NetMargin));
    assert!(!report.valuation.sector_medians.is_empty());
    assert!(report.valuation.recommendation.is_some());

    let projection = report.projection.as_ref().unwrap();
    let years: Vec<i32> = projection.history.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2021, 2022, 2023]);
    assert_eq!(projection.forecasts.len(), 2);
    assert_eq!(projection.forecasts[1].year, 2025);

    assert!(output.methodology.starts_with("Fundamental Analysis"));
    assert!(output.assumptions.get("valuation").is_some());
}

#[test]
fn test_other_companies_scope_excludes_own_history() {
    let config = AnalyticsConfig::default();
    let mut input = AnalysisInput {
        subject: statement("SIBC", 2023, dec!(1), dec!(70)),
        statements: stored_statements(),
        horizon_years: None,
        peer_scope: PeerScope::AllOtherRows,
    };
    let all_rows = analyse_company(&input, &config).unwrap();

    input.peer_scope = PeerScope::OtherCompanies;
    let others = analyse_company(&input, &config).unwrap();

    let count = |o: &brvm_analytics_core::ComputationOutput<brvm_analytics_core::analysis::AnalysisReport>| {
        o.result
            .valuation
            .peer_counts
            .values()
            .copied()
            .max()
            .unwrap_or(0)
    };
    assert_eq!(count(&all_rows), 5);
    assert_eq!(count(&others), 3);
    // Projection still draws on the subject's history either way
    assert!(others.result.projection.is_some());
}

#[test]
fn test_short_history_is_reported_not_fatal() {
    let input = AnalysisInput {
        subject: statement("NEWC", 2023, dec!(1), dec!(70)),
        statements: stored_statements(),
        horizon_years: None,
        peer_scope: PeerScope::default(),
    };
    let output = analyse_company(&input, &AnalyticsConfig::default()).unwrap();
    assert!(output.result.projection.is_none());
    assert!(output.warnings.iter().any(|w| w.starts_with("Projection skipped")));

    let json = serde_json::to_value(&output).unwrap();
    assert!(json["result"].get("projection").is_none());
}

#[test]
fn test_invalid_peer_statement_names_its_row() {
    let mut statements = stored_statements();
    statements[1].balance_sheet.cash = dec!(-5);
    let input = AnalysisInput {
        subject: statement("SIBC", 2023, dec!(1), dec!(70)),
        statements,
        horizon_years: None,
        peer_scope: PeerScope::default(),
    };
    match analyse_company(&input, &AnalyticsConfig::default()) {
        Err(AnalyticsError::InvalidInput { field, .. }) => {
            assert_eq!(field, "ORAC 2023: balance_sheet.cash");
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_invalid_config_rejected_before_computation() {
    let mut config = AnalyticsConfig::default();
    config.valuation.min_peer_observations = 0;
    let result = analyse_ratios(&statement("SIBC", 2023, dec!(1), dec!(70)), &config);
    assert!(matches!(result, Err(AnalyticsError::Config(_))));
}

// ===========================================================================
// Single-engine entry points
// ===========================================================================

#[test]
fn test_analyse_ratios_envelope() {
    let output =
        analyse_ratios(&statement("SIBC", 2023, dec!(1), dec!(70)), &AnalyticsConfig::default())
            .unwrap();
    assert_eq!(output.methodology, "Financial Ratio Analysis");
    assert!(output.warnings.is_empty());
    assert_eq!(output.result.get(Ratio::CurrentRatio).map(|r| r.round_dp(4)), Some(dec!(1.8182)));
}

#[test]
fn test_analyse_ratios_warns_when_nothing_computable() {
    let stmt = FinancialStatement {
        symbol: "EMPTY".into(),
        year: 2023,
        ..Default::default()
    };
    let output = analyse_ratios(&stmt, &AnalyticsConfig::default()).unwrap();
    assert_eq!(output.warnings.len(), 1);
}

#[test]
fn test_analyse_valuation_from_stored_peer_ratios() {
    let peers: Vec<PeerObservation> = ["SNTS", "ORAC", "SGBC"]
        .iter()
        .zip([dec!(9), dec!(11), dec!(13)])
        .map(|(symbol, pe)| PeerObservation {
            symbol: (*symbol).into(),
            year: 2023,
            ratios: [(Ratio::PriceEarnings, pe)].into_iter().collect(),
        })
        .collect();
    let input = ValuationInput {
        subject: statement("SIBC", 2023, dec!(1), dec!(70)),
        peers,
    };
    let output = analyse_valuation(&input, &AnalyticsConfig::default()).unwrap();
    // EPS = 70 / 10 = 7, fair value = 11 * 7 = 77, gap = 10%
    assert_eq!(output.result.sector_medians.price_earnings, Some(dec!(11)));
    assert_eq!(output.result.potential.unwrap().median, dec!(10));
}

#[test]
fn test_analyse_projection_uses_default_horizon() {
    let input = ProjectionInput {
        history: vec![
            HistoricalPoint {
                year: 2021,
                revenue: dec!(100),
                net_income: dec!(10),
            },
            HistoricalPoint {
                year: 2022,
                revenue: dec!(121),
                net_income: dec!(12.1),
            },
        ],
        horizon_years: None,
    };
    let output = analyse_projection(&input, &AnalyticsConfig::default()).unwrap();
    assert_eq!(output.result.forecasts.len(), 3);
    assert!(output.methodology.contains("40% CAGR"));
}

#[test]
fn test_analysis_input_from_json() {
    let json = r#"{
        "subject": {
            "symbol": "SIBC",
            "year": 2023,
            "balance_sheet": { "share_price": 70, "shares_outstanding": 10, "equity": 500 },
            "income_statement": { "revenue": 900, "net_income": 70 }
        },
        "statements": []
    }"#;
    let input: AnalysisInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.peer_scope, PeerScope::AllOtherRows);
    let output = analyse_company(&input, &AnalyticsConfig::default()).unwrap();
    assert!(output.result.valuation.recommendation.is_none());
    assert!(output.result.projection.is_none());
}
