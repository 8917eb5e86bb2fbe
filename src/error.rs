use thiserror::Error;
use tomox::Side;

#[derive(Debug, Error)]
pub enum MmError {
    #[error("relayer error: {0}")]
    Tomox(#[from] tomox::TomoxError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("reference price unavailable for {0}")]
    PriceUnavailable(String),

    #[error("no free {side} price level within {attempts} steps; step size too coarse for the book")]
    LadderExhausted { side: Side, attempts: u32 },

    #[error("book too thin for a crossing trade: need level {needed}, have {asks} asks / {bids} bids")]
    BookTooThin { needed: usize, asks: usize, bids: usize },

    #[error("relayer returned {results} results for {orders} orders")]
    BatchMismatch { orders: usize, results: usize },

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
