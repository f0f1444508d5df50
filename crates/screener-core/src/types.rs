use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One fiscal reporting period from the income statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalPeriod {
    pub period_end: NaiveDate,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
}

/// Latest-period cash-flow statement lines. Missing lines default to 0
/// during normalization; a missing statement is fatal for the company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub operating_cash_flow: Option<f64>,
    pub capital_expenditure: Option<f64>,
    pub dividends_paid: Option<f64>,
}

/// Scalar fundamentals bundle as reported by the data provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub market_cap: Option<f64>,
    pub total_debt: Option<f64>,
    pub current_ratio: Option<f64>,
    pub trailing_pe: Option<f64>,
    /// Percent yield, e.g. 2.0 for 2%.
    pub dividend_yield: Option<f64>,
    /// Fraction of earnings paid out, e.g. 0.4 for 40%.
    pub payout_ratio: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

/// Raw per-company field mapping returned by a fundamentals provider.
/// Any field may be absent; the normalizer decides what is fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFundamentals {
    pub symbol: String,
    /// Income statement history in arbitrary order, possibly with gaps.
    pub income: Vec<FiscalPeriod>,
    pub cash_flow: Option<CashFlowStatement>,
    pub profile: CompanyProfile,
}

/// Canonical normalized view of one company's fundamentals.
///
/// All ratio fields are derived by the normalizer, never provider-supplied.
/// `trailing_pe`, `price_to_fcf` and `dividend_to_fcf` are `None` when the
/// denominator makes them undefined; zero is a legitimate value elsewhere
/// (zero debt is real data, not a gap) so absence stays explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub symbol: String,
    pub revenue_current: f64,
    pub revenue_prior: f64,
    pub net_income_current: f64,
    pub net_income_prior: f64,
    pub operating_cash_flow: f64,
    /// Outflow magnitude, always non-negative.
    pub capital_expenditure: f64,
    pub free_cash_flow: f64,
    pub market_cap: f64,
    pub total_debt: f64,
    pub current_ratio: f64,
    /// Net margin in percent.
    pub margin: f64,
    /// Negative for loss-makers; sign distinguishes losses from overvaluation.
    pub trailing_pe: Option<f64>,
    pub price_to_fcf: Option<f64>,
    /// Total debt as percent of market cap.
    pub debt_to_market: f64,
    pub dividend_yield: f64,
    pub payout_ratio: f64,
    /// Cash dividends paid as percent of free cash flow.
    pub dividend_to_fcf: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

/// Business-economics stage a company is scored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessMode {
    /// Positive net income in the latest period.
    Profitable,
    /// Unprofitable but revenue is expanding.
    Growth,
    /// Unprofitable and shrinking; residual risk bucket.
    Venture,
}

impl BusinessMode {
    pub fn name(&self) -> &'static str {
        match self {
            BusinessMode::Profitable => "Profitable",
            BusinessMode::Growth => "Growth",
            BusinessMode::Venture => "Venture",
        }
    }
}

/// Discrete investment signal derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Watch,
    Pass,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Signal::Buy => "Buy",
            Signal::Watch => "Watch",
            Signal::Pass => "Pass",
        }
    }
}

/// Per-company screening output handed to presentation/export layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyReport {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub mode: BusinessMode,
    pub signal: Signal,
    pub score: i32,
    pub margin: f64,
    pub trailing_pe: Option<f64>,
    pub price_to_fcf: Option<f64>,
    pub debt_to_market: f64,
    pub dividend_yield: f64,
    pub dividend_to_fcf: Option<f64>,
    pub current_ratio: f64,
    pub free_cash_flow: f64,
    pub shares_outstanding: Option<f64>,
    pub revenue_growing: bool,
    pub net_income_growing: bool,
    /// Fired scoring rules, "+"/"-" prefixed, comma separated.
    pub reason: String,
}
