use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Relayer-wide information returned by `/api/info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub exchange_address: String,
    #[serde(default)]
    pub fee: Option<Decimal>,
}

/// Token metadata returned by `/api/tokens/{address}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub address: String,
    /// Missing on some tokens; callers fall back to 18.
    #[serde(default)]
    pub decimals: Option<u32>,
}

/// A registered trading pair returned by `/api/pair`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    #[serde(default)]
    pub pair_name: String,
    pub base_token_address: String,
    pub quote_token_address: String,
    #[serde(default)]
    pub base_token_decimals: Option<u32>,
    #[serde(default)]
    pub quote_token_decimals: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
}
