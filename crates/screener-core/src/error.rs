use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("Incomplete financials for {symbol}: {reason}")]
    IncompleteFinancials { symbol: String, reason: String },

    #[error("Provider error: {0}")]
    Provider(String),
}
