use screener_core::{FinancialSnapshot, RawFundamentals, ScreenError};

fn incomplete(symbol: &str, reason: &str) -> ScreenError {
    ScreenError::IncompleteFinancials {
        symbol: symbol.to_string(),
        reason: reason.to_string(),
    }
}

/// Optional line items degrade to 0 rather than failing the company.
fn line_or_zero(symbol: &str, field: &str, value: Option<f64>) -> f64 {
    match value {
        Some(v) => v,
        None => {
            tracing::debug!("{}: {} missing, defaulting to 0", symbol, field);
            0.0
        }
    }
}

/// Build the canonical snapshot from one company's raw provider fields.
///
/// Requires two fiscal periods reporting both revenue and net income, plus
/// a cash-flow statement; everything else has a safe default. Periods are
/// re-sorted by fiscal date descending, so caller ordering never matters.
pub fn normalize(raw: &RawFundamentals) -> Result<FinancialSnapshot, ScreenError> {
    let symbol = raw.symbol.as_str();

    let mut periods = raw.income.clone();
    periods.sort_by(|a, b| b.period_end.cmp(&a.period_end));

    // Revenue and net income must be compared within the same fiscal
    // periods, so a period missing either value cannot anchor the
    // current/prior pair.
    let complete: Vec<(f64, f64)> = periods
        .iter()
        .filter_map(|p| p.revenue.zip(p.net_income))
        .collect();

    if complete.len() < 2 {
        let revenues = periods.iter().filter(|p| p.revenue.is_some()).count();
        let net_incomes = periods.iter().filter(|p| p.net_income.is_some()).count();
        let reason = if revenues < 2 {
            "fewer than two periods of revenue history"
        } else if net_incomes < 2 {
            "fewer than two periods of net-income history"
        } else {
            "fewer than two periods reporting both revenue and net income"
        };
        return Err(incomplete(symbol, reason));
    }
    let cash_flow = raw
        .cash_flow
        .as_ref()
        .ok_or_else(|| incomplete(symbol, "cash-flow statement missing"))?;

    let (revenue_current, net_income_current) = complete[0];
    let (revenue_prior, net_income_prior) = complete[1];

    let operating_cash_flow =
        line_or_zero(symbol, "operating cash flow", cash_flow.operating_cash_flow);
    // Capex is an outflow magnitude regardless of the provider's sign convention.
    let capital_expenditure =
        line_or_zero(symbol, "capital expenditure", cash_flow.capital_expenditure).abs();
    let free_cash_flow = operating_cash_flow - capital_expenditure;

    let market_cap = line_or_zero(symbol, "market cap", raw.profile.market_cap);
    let total_debt = line_or_zero(symbol, "total debt", raw.profile.total_debt);
    let current_ratio = line_or_zero(symbol, "current ratio", raw.profile.current_ratio);

    let margin = if revenue_current != 0.0 {
        net_income_current / revenue_current * 100.0
    } else {
        0.0
    };

    // Prefer the provider multiple; recompute from market cap when it is
    // absent or zero. The recomputation keeps the sign so a loss-maker shows
    // a negative multiple instead of disappearing behind "N/A".
    let trailing_pe = match raw.profile.trailing_pe {
        Some(pe) if pe != 0.0 => Some(pe),
        _ if net_income_current != 0.0 => Some(market_cap / net_income_current),
        _ => None,
    };

    let price_to_fcf = if free_cash_flow != 0.0 {
        Some(market_cap / free_cash_flow)
    } else {
        None
    };

    let debt_to_market = if market_cap > 0.0 {
        total_debt / market_cap * 100.0
    } else {
        0.0
    };

    let dividends_paid = cash_flow.dividends_paid.unwrap_or(0.0).abs();
    let dividend_to_fcf = if free_cash_flow > 0.0 {
        Some(dividends_paid / free_cash_flow * 100.0)
    } else {
        None
    };

    Ok(FinancialSnapshot {
        symbol: raw.symbol.clone(),
        revenue_current,
        revenue_prior,
        net_income_current,
        net_income_prior,
        operating_cash_flow,
        capital_expenditure,
        free_cash_flow,
        market_cap,
        total_debt,
        current_ratio,
        margin,
        trailing_pe,
        price_to_fcf,
        debt_to_market,
        dividend_yield: line_or_zero(symbol, "dividend yield", raw.profile.dividend_yield),
        payout_ratio: line_or_zero(symbol, "payout ratio", raw.profile.payout_ratio),
        dividend_to_fcf,
        shares_outstanding: raw.profile.shares_outstanding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use screener_core::{CashFlowStatement, CompanyProfile, FiscalPeriod};

    fn period(y: i32, revenue: f64, net_income: f64) -> FiscalPeriod {
        FiscalPeriod {
            period_end: NaiveDate::from_ymd_opt(y, 12, 31).unwrap(),
            revenue: Some(revenue),
            net_income: Some(net_income),
        }
    }

    fn raw_two_periods() -> RawFundamentals {
        RawFundamentals {
            symbol: "TEST".to_string(),
            income: vec![period(2023, 100.0, 15.0), period(2024, 110.0, 20.0)],
            cash_flow: Some(CashFlowStatement {
                operating_cash_flow: Some(30.0),
                capital_expenditure: Some(-5.0),
                dividends_paid: Some(-6.0),
            }),
            profile: CompanyProfile {
                market_cap: Some(300.0),
                total_debt: Some(20.0),
                current_ratio: Some(1.5),
                trailing_pe: Some(15.0),
                dividend_yield: Some(2.0),
                payout_ratio: Some(0.4),
                shares_outstanding: Some(10.0),
            },
        }
    }

    #[test]
    fn sorts_periods_before_indexing() {
        // Oldest first on purpose; "current" must still be 2024.
        let snapshot = normalize(&raw_two_periods()).unwrap();
        assert_eq!(snapshot.revenue_current, 110.0);
        assert_eq!(snapshot.revenue_prior, 100.0);
        assert_eq!(snapshot.net_income_current, 20.0);
        assert_eq!(snapshot.net_income_prior, 15.0);
    }

    #[test]
    fn derives_fcf_and_ratios() {
        let snapshot = normalize(&raw_two_periods()).unwrap();
        // Capex arrives negative from the provider and is taken as magnitude.
        assert_eq!(snapshot.capital_expenditure, 5.0);
        assert_eq!(snapshot.free_cash_flow, 25.0);
        assert!((snapshot.margin - 18.18).abs() < 0.01);
        assert_eq!(snapshot.trailing_pe, Some(15.0));
        assert_eq!(snapshot.price_to_fcf, Some(12.0));
        assert!((snapshot.debt_to_market - 6.666).abs() < 0.01);
        assert_eq!(snapshot.dividend_to_fcf, Some(24.0));
    }

    #[test]
    fn rejects_single_period_history() {
        let mut raw = raw_two_periods();
        raw.income.truncate(1);
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, ScreenError::IncompleteFinancials { .. }));
    }

    #[test]
    fn rejects_gappy_net_income_history() {
        let mut raw = raw_two_periods();
        raw.income[0].net_income = None;
        let err = normalize(&raw).unwrap_err();
        assert!(err.to_string().contains("net-income"));
    }

    #[test]
    fn gap_period_does_not_misalign_series() {
        // 2024 reported revenue but no net income yet; both series must
        // anchor on 2023/2022 instead of pairing 2024 revenue with 2023
        // income.
        let mut raw = raw_two_periods();
        raw.income = vec![
            FiscalPeriod {
                period_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                revenue: Some(200.0),
                net_income: None,
            },
            period(2023, 100.0, 10.0),
            period(2022, 90.0, 8.0),
        ];
        let snapshot = normalize(&raw).unwrap();
        assert_eq!(snapshot.revenue_current, 100.0);
        assert_eq!(snapshot.net_income_current, 10.0);
        assert_eq!(snapshot.revenue_prior, 90.0);
        assert_eq!(snapshot.net_income_prior, 8.0);
        assert_eq!(snapshot.margin, 10.0);
    }

    #[test]
    fn rejects_when_only_one_period_has_both_values() {
        // Two revenue values and two net-income values, but they only line
        // up within a single fiscal period.
        let mut raw = raw_two_periods();
        raw.income = vec![
            FiscalPeriod {
                period_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                revenue: Some(200.0),
                net_income: None,
            },
            period(2023, 100.0, 10.0),
            FiscalPeriod {
                period_end: NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
                revenue: None,
                net_income: Some(8.0),
            },
        ];
        let err = normalize(&raw).unwrap_err();
        assert!(err.to_string().contains("both revenue and net income"));
    }

    #[test]
    fn rejects_missing_cash_flow_statement() {
        let mut raw = raw_two_periods();
        raw.cash_flow = None;
        let err = normalize(&raw).unwrap_err();
        assert!(err.to_string().contains("cash-flow"));
    }

    #[test]
    fn missing_cash_flow_lines_default_to_zero() {
        let mut raw = raw_two_periods();
        raw.cash_flow = Some(CashFlowStatement {
            operating_cash_flow: Some(30.0),
            capital_expenditure: None,
            dividends_paid: None,
        });
        let snapshot = normalize(&raw).unwrap();
        assert_eq!(snapshot.free_cash_flow, 30.0);
        assert_eq!(snapshot.dividend_to_fcf, Some(0.0));
    }

    #[test]
    fn missing_scalars_default_to_zero() {
        let mut raw = raw_two_periods();
        raw.profile.total_debt = None;
        raw.profile.current_ratio = None;
        raw.profile.dividend_yield = None;
        raw.profile.payout_ratio = None;
        let snapshot = normalize(&raw).unwrap();
        assert_eq!(snapshot.total_debt, 0.0);
        assert_eq!(snapshot.current_ratio, 0.0);
        assert_eq!(snapshot.dividend_yield, 0.0);
        assert_eq!(snapshot.payout_ratio, 0.0);
    }

    #[test]
    fn pe_fallback_preserves_loss_sign() {
        let mut raw = raw_two_periods();
        raw.profile.trailing_pe = None;
        raw.profile.market_cap = Some(1000.0);
        raw.income[1].net_income = Some(-100.0); // current period after sorting
        let snapshot = normalize(&raw).unwrap();
        assert_eq!(snapshot.trailing_pe, Some(-10.0));
    }

    #[test]
    fn pe_undefined_when_income_is_zero() {
        let mut raw = raw_two_periods();
        raw.profile.trailing_pe = None;
        raw.income[1].net_income = Some(0.0);
        let snapshot = normalize(&raw).unwrap();
        assert_eq!(snapshot.trailing_pe, None);
    }

    #[test]
    fn zero_provider_pe_triggers_recompute() {
        let mut raw = raw_two_periods();
        raw.profile.trailing_pe = Some(0.0);
        let snapshot = normalize(&raw).unwrap();
        assert_eq!(snapshot.trailing_pe, Some(300.0 / 20.0));
    }

    #[test]
    fn price_to_fcf_undefined_on_zero_fcf() {
        let mut raw = raw_two_periods();
        raw.cash_flow = Some(CashFlowStatement {
            operating_cash_flow: Some(5.0),
            capital_expenditure: Some(5.0),
            dividends_paid: None,
        });
        let snapshot = normalize(&raw).unwrap();
        assert_eq!(snapshot.price_to_fcf, None);
        assert_eq!(snapshot.dividend_to_fcf, None);
    }
}
