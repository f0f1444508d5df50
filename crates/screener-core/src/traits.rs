use crate::{RawFundamentals, ScreenError};
use async_trait::async_trait;

/// Trait for fundamentals data providers.
///
/// Acquisition concerns (network I/O, rate limits, retries, caching) live
/// behind this seam; the screening core only ever sees a complete
/// `RawFundamentals` record or a failure for that one symbol.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<RawFundamentals, ScreenError>;
}
