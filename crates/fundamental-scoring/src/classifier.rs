use screener_core::{BusinessMode, FinancialSnapshot};

/// Assign the business mode for a snapshot. First match wins: profitability
/// dominates growth even when revenue is shrinking, and
/// unprofitable-and-shrinking falls through to the venture bucket.
pub fn classify(snapshot: &FinancialSnapshot) -> BusinessMode {
    if snapshot.net_income_current > 0.0 {
        BusinessMode::Profitable
    } else if snapshot.revenue_current > snapshot.revenue_prior {
        BusinessMode::Growth
    } else {
        BusinessMode::Venture
    }
}
