//! Config file loading.
//!
//! The file is JSON with global defaults and one section per pair:
//!
//! ```json
//! {
//!   "relayerUrl": "https://dex.tomochain.com",
//!   "orderbookLength": 5,
//!   "speed": 50000,
//!   "xt": { "url": "https://api.xt.com" },
//!   "pairs": {
//!     "BTC-TOMO": { "baseToken": "0x...", "quoteToken": "0x...", "pkey": "0x..." }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::MmError;
use crate::mm::config::{derive_ticker_symbol, MarketMakerConfig};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.json";
pub const DEFAULT_XT_URL: &str = "https://api.xt.com";
const DEFAULT_ORDERBOOK_LENGTH: usize = 5;
const DEFAULT_SPEED_MS: u64 = 50_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub relayer_url: String,
    #[serde(default)]
    pub orderbook_length: Option<usize>,
    #[serde(default)]
    pub speed: Option<u64>,
    #[serde(default)]
    pub xt: XtConfig,
    #[serde(default)]
    pub pairs: BTreeMap<String, PairConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairConfig {
    pub base_token: String,
    pub quote_token: String,
    #[serde(default)]
    pub pkey: Option<String>,
    #[serde(default)]
    pub orderbook_length: Option<usize>,
    #[serde(default)]
    pub speed: Option<u64>,
    #[serde(default)]
    pub ticker_symbol: Option<String>,
}

/// Reference venue settings; keys are only needed for balance queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XtConfig {
    #[serde(default = "default_xt_url")]
    pub url: String,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl Default for XtConfig {
    fn default() -> Self {
        Self {
            url: default_xt_url(),
            access_key: None,
            secret_key: None,
        }
    }
}

fn default_xt_url() -> String {
    DEFAULT_XT_URL.to_string()
}

impl FileConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, MmError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MmError::Config(format!("cannot read config {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, MmError> {
        let config: Self = serde_json::from_str(raw)?;
        if config.relayer_url.trim().is_empty() {
            return Err(MmError::Config("relayerUrl is empty".into()));
        }
        Ok(config)
    }

    /// Resolve the settings for `pair`, with per-pair values overriding
    /// globals. `env_private_key` is used when the pair has no `pkey`.
    pub fn market_maker_config(
        &self,
        pair: &str,
        env_private_key: Option<String>,
    ) -> Result<MarketMakerConfig, MmError> {
        let section = self.pairs.get(pair).ok_or_else(|| {
            let available: Vec<_> = self.pairs.keys().map(String::as_str).collect();
            MmError::Config(format!(
                "pair \"{pair}\" not configured. Available: {}",
                available.join(", ")
            ))
        })?;

        let private_key = section
            .pkey
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or(env_private_key)
            .ok_or_else(|| {
                MmError::Config(format!("no pkey for {pair} and PRIVATE_KEY is not set"))
            })?;

        let orderbook_length = section
            .orderbook_length
            .or(self.orderbook_length)
            .unwrap_or(DEFAULT_ORDERBOOK_LENGTH);
        if orderbook_length == 0 {
            return Err(MmError::Config(format!("orderbookLength for {pair} must be > 0")));
        }

        Ok(MarketMakerConfig {
            pair: pair.to_string(),
            ticker_symbol: section
                .ticker_symbol
                .clone()
                .unwrap_or_else(|| derive_ticker_symbol(pair)),
            base_token: section.base_token.clone(),
            quote_token: section.quote_token.clone(),
            private_key,
            orderbook_length,
            speed_ms: section.speed.or(self.speed).unwrap_or(DEFAULT_SPEED_MS),
        })
    }
}
