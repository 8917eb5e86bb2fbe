//! Seams between the market-making core and the outside world.
//!
//! The core only sees these two traits; `tomox::Tomox` and [`XtClient`]
//! implement them for production and tests supply in-memory doubles.
//!
//! [`XtClient`]: crate::price::XtClient

use async_trait::async_trait;
use rust_decimal::Decimal;
use tomox::{NewOrder, OrderBook, OrderInfo, PlacedOrder, TokenInfo, Tomox, TomoxError};

/// Exchange trading gateway scoped to a base/quote pair per call.
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Book snapshot, `None` while the pair has no book.
    async fn get_order_book(&self, base_token: &str, quote_token: &str)
        -> Result<Option<OrderBook>, TomoxError>;

    /// Open orders of the bot's account on the pair.
    async fn get_orders(&self, base_token: &str, quote_token: &str)
        -> Result<Vec<OrderInfo>, TomoxError>;

    async fn create_order(&self, order: &NewOrder) -> Result<PlacedOrder, TomoxError>;

    /// Results are positional: `result[i]` belongs to `orders[i]`.
    async fn create_many_orders(&self, orders: &[NewOrder])
        -> Result<Vec<PlacedOrder>, TomoxError>;

    async fn cancel_order(&self, hash: &str, nonce: u64) -> Result<(), TomoxError>;

    async fn cancel_many_orders(&self, hashes: &[String]) -> Result<(), TomoxError>;

    async fn get_token_info(&self, token: &str) -> Result<TokenInfo, TomoxError>;
}

/// Source of the last traded price for a pair.
///
/// Never fails past its boundary: any failure is reported as `None`.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn latest_price(&self, symbol: &str) -> Option<Decimal>;
}

#[async_trait]
impl ExchangeGateway for Tomox {
    async fn get_order_book(
        &self,
        base_token: &str,
        quote_token: &str,
    ) -> Result<Option<OrderBook>, TomoxError> {
        Tomox::get_order_book(self, base_token, quote_token).await
    }

    async fn get_orders(
        &self,
        base_token: &str,
        quote_token: &str,
    ) -> Result<Vec<OrderInfo>, TomoxError> {
        Tomox::get_orders(self, base_token, quote_token).await
    }

    async fn create_order(&self, order: &NewOrder) -> Result<PlacedOrder, TomoxError> {
        Tomox::create_order(self, order).await
    }

    async fn create_many_orders(
        &self,
        orders: &[NewOrder],
    ) -> Result<Vec<PlacedOrder>, TomoxError> {
        Tomox::create_many_orders(self, orders).await
    }

    async fn cancel_order(&self, hash: &str, nonce: u64) -> Result<(), TomoxError> {
        Tomox::cancel_order(self, hash, nonce).await
    }

    async fn cancel_many_orders(&self, hashes: &[String]) -> Result<(), TomoxError> {
        Tomox::cancel_many_orders(self, hashes).await
    }

    async fn get_token_info(&self, token: &str) -> Result<TokenInfo, TomoxError> {
        Tomox::get_token_info(self, token).await
    }
}
