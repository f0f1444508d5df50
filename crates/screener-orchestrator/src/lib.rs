use chrono::{DateTime, Utc};
use fundamental_scoring::FundamentalScoringEngine;
use screener_core::{BusinessMode, CompanyReport, FundamentalsProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Symbol set to screen.
#[derive(Debug, Clone)]
pub enum Universe {
    Custom(Vec<String>),
    DefaultPortfolio,
}

impl Universe {
    pub fn symbols(&self) -> Vec<String> {
        match self {
            Universe::Custom(symbols) => symbols.clone(),
            Universe::DefaultPortfolio => vec!["AAPL", "MSFT", "NVDA", "KO", "INTC", "PYPL"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Presentation-level post-processing; the per-company scoring contract is
/// unaffected by any of these.
#[derive(Debug, Clone)]
pub struct ScreenFilters {
    pub mode: Option<BusinessMode>,
    pub limit: usize,
}

impl Default for ScreenFilters {
    fn default() -> Self {
        Self {
            mode: None,
            limit: 25,
        }
    }
}

/// A company excluded from the batch, with the reason surfaced to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedCompany {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenResult {
    pub reports: Vec<CompanyReport>,
    pub skipped: Vec<SkippedCompany>,
    pub total_requested: usize,
    pub timestamp: DateTime<Utc>,
}

/// Batch driver: fetches each symbol's fundamentals through the provider
/// seam and evaluates them concurrently. Companies are independent, so a
/// provider failure or incomplete filing skips that one symbol and the rest
/// of the batch proceeds.
pub struct StockScreener {
    provider: Arc<dyn FundamentalsProvider>,
    engine: FundamentalScoringEngine,
}

impl StockScreener {
    pub fn new(provider: Arc<dyn FundamentalsProvider>) -> Self {
        Self {
            provider,
            engine: FundamentalScoringEngine::new(),
        }
    }

    pub fn with_engine(provider: Arc<dyn FundamentalsProvider>, engine: FundamentalScoringEngine) -> Self {
        Self { provider, engine }
    }

    pub async fn screen(
        &self,
        universe: Universe,
        filters: ScreenFilters,
    ) -> Result<ScreenResult, anyhow::Error> {
        let symbols = universe.symbols();
        let total_requested = symbols.len();

        tracing::info!("Screening {} symbols", total_requested);

        // Handles stay keyed by symbol so every requested company lands in
        // either `reports` or `skipped`, even if its task panics.
        let mut tasks = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let provider = Arc::clone(&self.provider);
            let engine = self.engine.clone();
            let task_symbol = symbol.clone();
            let handle = tokio::spawn(async move {
                match provider.fetch_fundamentals(&task_symbol).await {
                    Ok(raw) => engine.evaluate(&raw),
                    Err(e) => Err(e),
                }
            });
            tasks.push((symbol, handle));
        }

        let mut reports = Vec::new();
        let mut skipped = Vec::new();

        for (symbol, handle) in tasks {
            match handle.await {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(e)) => {
                    tracing::warn!("Skipping {}: {}", symbol, e);
                    skipped.push(SkippedCompany {
                        symbol,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!("Screening task for {} failed: {}", symbol, e);
                    skipped.push(SkippedCompany {
                        symbol,
                        reason: format!("screening task failed: {}", e),
                    });
                }
            }
        }

        if let Some(mode) = filters.mode {
            reports.retain(|r| r.mode == mode);
        }

        // Best score first; symbol breaks ties so output order is stable.
        reports.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.symbol.cmp(&b.symbol)));
        reports.truncate(filters.limit);

        tracing::info!(
            "Screen complete: {} reports, {} skipped of {} requested",
            reports.len(),
            skipped.len(),
            total_requested
        );

        Ok(ScreenResult {
            reports,
            skipped,
            total_requested,
            timestamp: Utc::now(),
        })
    }
}
