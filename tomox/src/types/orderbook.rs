use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order book snapshot for one pair, each side sorted best-price-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    #[serde(default)]
    pub pair_name: Option<String>,
    #[serde(default)]
    pub asks: Vec<BookLevel>,
    #[serde(default)]
    pub bids: Vec<BookLevel>,
}

/// One aggregated price level.
///
/// `pricepoint` is the integer price scaled by `10^quoteDecimals` and
/// `amount` the integer size scaled by `10^baseDecimals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookLevel {
    pub pricepoint: Decimal,
    #[serde(default)]
    pub amount: Decimal,
}

impl OrderBook {
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.pricepoint)
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.pricepoint)
    }
}
