use screener_core::{BusinessMode, FinancialSnapshot, Signal};
use serde::{Deserialize, Serialize};

/// Tunable policy constants for the scoring engine.
///
/// The liquidity threshold has floated between 1.1 and 1.2 across screening
/// policy iterations, so it is configuration rather than a constant; the
/// signal bucket boundaries are exposed the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub current_ratio_min: f64,
    pub debt_to_market_max: f64,
    /// Minimum score mapped to `Signal::Buy`.
    pub buy_score: i32,
    /// Minimum score mapped to `Signal::Watch`.
    pub watch_score: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            current_ratio_min: 1.2,
            debt_to_market_max: 30.0,
            buy_score: 7,
            watch_score: 5,
        }
    }
}

/// Outcome of scoring one snapshot: composite score, signal bucket, and the
/// rules that fired (label plus signed delta).
#[derive(Debug, Clone)]
pub struct Scorecard {
    pub score: i32,
    pub signal: Signal,
    pub hits: Vec<(&'static str, i32)>,
}

impl Scorecard {
    /// Human-readable summary of fired rules, "+"/"-" prefixed.
    pub fn reason(&self) -> String {
        self.hits
            .iter()
            .map(|(label, delta)| format!("{} {}", if *delta >= 0 { "+" } else { "-" }, label))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn map_signal(score: i32, config: &ScoringConfig) -> Signal {
    if score >= config.buy_score {
        Signal::Buy
    } else if score >= config.watch_score {
        Signal::Watch
    } else {
        Signal::Pass
    }
}

/// Apply the common rules plus the mode's rule table to a snapshot.
///
/// Every entry is (label, delta, fired); flat mode bonuses are always-true
/// rules so the tables stay uniform. The score is an unclamped integer sum
/// of the fired deltas.
pub fn score(snapshot: &FinancialSnapshot, mode: BusinessMode, config: &ScoringConfig) -> Scorecard {
    let s = snapshot;
    let pe = s.trailing_pe;

    let mut rules: Vec<(&'static str, i32, bool)> = vec![
        ("Revenue growing", 1, s.revenue_current > s.revenue_prior),
        ("Healthy liquidity", 1, s.current_ratio > config.current_ratio_min),
        ("Low debt vs market cap", 1, s.debt_to_market < config.debt_to_market_max),
    ];

    match mode {
        BusinessMode::Profitable => {
            rules.push(("Profitable", 2, true));
            rules.push(("Net income growing", 1, s.net_income_current > s.net_income_prior));
            rules.push(("Positive free cash flow", 1, s.free_cash_flow > 0.0));
            rules.push((
                "Reasonable P/E",
                1,
                matches!(pe, Some(pe) if pe > 0.0 && pe <= 25.0),
            ));
            rules.push((
                "Extreme or negative P/E",
                -2,
                matches!(pe, Some(pe) if pe > 50.0 || pe < 0.0),
            ));
            rules.push(("Strong margin", 1, s.margin > 15.0));
            let pays_dividend = s.dividend_yield > 0.0;
            rules.push(("Pays a dividend", 1, pays_dividend));
            if pays_dividend {
                rules.push((
                    "Sustainable payout",
                    1,
                    s.payout_ratio > 0.0 && s.payout_ratio < 0.7,
                ));
                rules.push(("Payout exceeds earnings", -2, s.payout_ratio > 1.0));
            }
        }
        BusinessMode::Growth => {
            rules.push(("Growth stage", 1, true));
            rules.push(("Positive free cash flow", 2, s.free_cash_flow > 0.0));
            rules.push(("Contained losses", 1, s.margin > -20.0));
        }
        BusinessMode::Venture => {
            rules.push(("Speculative stage", -1, true));
            rules.push(("Generating revenue", 1, s.revenue_current > 0.0));
            rules.push(("Debt free", 1, s.total_debt == 0.0));
        }
    }

    let hits: Vec<(&'static str, i32)> = rules
        .into_iter()
        .filter(|(_, _, fired)| *fired)
        .map(|(label, delta, _)| (label, delta))
        .collect();
    let score: i32 = hits.iter().map(|(_, delta)| delta).sum();

    Scorecard {
        score,
        signal: map_signal(score, config),
        hits,
    }
}
