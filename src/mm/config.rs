//! Market maker configuration.

/// All tuneable parameters for one pair's market-making loop.
///
/// Use [`Default::default()`] for sensible defaults, then set the pair,
/// tokens and key before passing to the bot.
#[derive(Debug, Clone)]
pub struct MarketMakerConfig {
    /// Pair symbol (e.g. "BTC-TOMO"); quote-side `BTC` selects the BTC sizing rules.
    pub pair: String,
    /// Symbol used to query the reference ticker (e.g. "btc_tomo").
    pub ticker_symbol: String,
    /// Base token contract address.
    pub base_token: String,
    /// Quote token contract address.
    pub quote_token: String,
    /// Hex-encoded signing key for the pair's account.
    pub private_key: String,
    /// Target number of resting orders per side.
    pub orderbook_length: usize,
    /// Delay between iterations in milliseconds.
    pub speed_ms: u64,
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            pair: String::new(),
            ticker_symbol: String::new(),
            base_token: String::new(),
            quote_token: String::new(),
            private_key: String::new(),
            orderbook_length: 5,
            speed_ms: 50_000,
        }
    }
}

/// Derive the reference ticker symbol from a pair symbol.
///
/// `"BTC-TOMO"` → `"btc_tomo"`.
pub fn derive_ticker_symbol(pair: &str) -> String {
    pair.to_lowercase().replace('-', "_")
}
