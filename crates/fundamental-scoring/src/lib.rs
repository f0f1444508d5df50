use chrono::Utc;
use screener_core::{CompanyReport, RawFundamentals, ScreenError};

pub mod classifier;
pub mod normalizer;
pub mod scoring;

pub use scoring::{Scorecard, ScoringConfig};

/// The screening pipeline over one company: normalize the raw provider
/// fields, classify the business mode, score it under that mode's rule
/// table, and shape the result for presentation. Pure per company; a batch
/// of companies can run any number of these concurrently.
#[derive(Debug, Clone, Default)]
pub struct FundamentalScoringEngine {
    config: ScoringConfig,
}

impl FundamentalScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn evaluate(&self, raw: &RawFundamentals) -> Result<CompanyReport, ScreenError> {
        let snapshot = normalizer::normalize(raw)?;
        let mode = classifier::classify(&snapshot);
        let card = scoring::score(&snapshot, mode, &self.config);

        tracing::debug!(
            "{}: mode={} score={} signal={}",
            snapshot.symbol,
            mode.name(),
            card.score,
            card.signal.label()
        );

        Ok(CompanyReport {
            symbol: snapshot.symbol,
            timestamp: Utc::now(),
            mode,
            signal: card.signal,
            score: card.score,
            margin: snapshot.margin,
            trailing_pe: snapshot.trailing_pe,
            price_to_fcf: snapshot.price_to_fcf,
            debt_to_market: snapshot.debt_to_market,
            dividend_yield: snapshot.dividend_yield,
            dividend_to_fcf: snapshot.dividend_to_fcf,
            current_ratio: snapshot.current_ratio,
            free_cash_flow: snapshot.free_cash_flow,
            shares_outstanding: snapshot.shares_outstanding,
            revenue_growing: snapshot.revenue_current > snapshot.revenue_prior,
            net_income_growing: snapshot.net_income_current > snapshot.net_income_prior,
            reason: card.reason(),
        })
    }
}
