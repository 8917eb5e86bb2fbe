//! Stale order reaper.
//!
//! A SELL is stale once priced above `reference + minimum_step * orderbook_length`,
//! a BUY once priced below `reference - minimum_step * orderbook_length`. Both
//! the band and the reference are compared in token units, the scale the
//! relayer reports pricepoints in.

use tomox::{OrderInfo, OrderStatus, Side};
use tracing::{info, warn};

use crate::error::MmError;
use crate::mm::params::MarketParameters;
use crate::mm::PairContext;
use crate::units::{ExchangeUnits, TokenUnits};

/// Width of the keep band on either side of the reference.
pub fn staleness_band(params: &MarketParameters) -> Result<TokenUnits, MmError> {
    let levels = u32::try_from(params.orderbook_length)
        .map_err(|_| MmError::Config(format!("orderbook length {} too large", params.orderbook_length)))?;
    params
        .minimum_step
        .checked_times(levels)?
        .to_token(params.token_decimals)
}

/// Order still resting on the book and therefore cancellable.
fn is_live(order: &OrderInfo) -> bool {
    matches!(
        order.status,
        OrderStatus::New | OrderStatus::Open | OrderStatus::PartialFilled
    )
}

/// Hashes of live SELLs strictly above `reference + band` and live BUYs
/// strictly below `reference - band`.
pub fn stale_hashes(orders: &[OrderInfo], reference: TokenUnits, band: TokenUnits) -> Vec<String> {
    let upper = reference.raw() + band.raw();
    let lower = reference.raw() - band.raw();
    orders
        .iter()
        .filter(|o| is_live(o))
        .filter(|o| match o.side {
            Side::Sell => o.pricepoint > upper,
            Side::Buy => o.pricepoint < lower,
        })
        .map(|o| o.hash.clone())
        .collect()
}

/// Cancel the bot's open orders that drifted out of the band.
///
/// Returns the number of orders sent for cancellation. A missing reference
/// price skips the pass.
pub async fn reap_stale_orders(ctx: &PairContext<'_>) -> Result<usize, MmError> {
    let config = ctx.config;
    let orders = ctx
        .gateway
        .get_orders(&config.base_token, &config.quote_token)
        .await?;

    let Some(price) = ctx.prices.latest_price(&config.ticker_symbol).await else {
        warn!(pair = %config.pair, "reference unavailable, skipping stale order check");
        return Ok(0);
    };
    let reference = ExchangeUnits::from_price(price)?.to_token(ctx.params.token_decimals)?;
    let band = staleness_band(ctx.params)?;

    let stale = stale_hashes(&orders, reference, band);
    if stale.is_empty() {
        return Ok(0);
    }

    ctx.gateway.cancel_many_orders(&stale).await?;
    info!(pair = %config.pair, count = stale.len(), hashes = ?stale, "CANCEL");
    Ok(stale.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mm::testing::{self, open_order, MockGateway, MockPrices};
    use rust_decimal_macros::dec;
    use std::sync::atomic::Ordering;

    fn token(price: rust_decimal::Decimal) -> TokenUnits {
        TokenUnits::from_price(price, testing::TOKEN_DECIMALS).unwrap()
    }

    #[test]
    fn test_band_is_step_times_length_in_token_units() {
        let band = staleness_band(&testing::params(5)).unwrap();
        assert_eq!(band, token(dec!(5)));
    }

    #[test]
    fn test_stale_boundary_is_exclusive() {
        let orders = vec![
            open_order("0xlow_edge", Side::Buy, dec!(95)),
            open_order("0xhigh_edge", Side::Sell, dec!(105)),
            open_order("0xbelow", Side::Buy, dec!(94.99)),
            open_order("0xabove", Side::Sell, dec!(105.01)),
            open_order("0xinside", Side::Sell, dec!(101)),
            // Far from the reference but on the passive side of it.
            open_order("0xcheap_sell", Side::Sell, dec!(90)),
            open_order("0xrich_buy", Side::Buy, dec!(110)),
        ];
        let stale = stale_hashes(&orders, token(dec!(100)), token(dec!(5)));
        assert_eq!(stale, ["0xbelow", "0xabove"]);
    }

    #[tokio::test]
    async fn test_reap_cancels_out_of_band_orders() {
        let gw = MockGateway::default();
        *gw.orders.lock().unwrap() = vec![
            open_order("0xa", Side::Buy, dec!(90)),
            open_order("0xb", Side::Buy, dec!(99)),
            open_order("0xc", Side::Sell, dec!(110)),
        ];
        let prices = MockPrices::fixed(dec!(100));
        let (config, params) = (testing::config(5), testing::params(5));
        let ctx = PairContext {
            gateway: &gw,
            prices: &prices,
            config: &config,
            params: &params,
        };

        assert_eq!(reap_stale_orders(&ctx).await.unwrap(), 2);
        assert_eq!(gw.cancels(), vec![vec!["0xa".to_string(), "0xc".to_string()]]);
    }

    #[test]
    fn test_settled_orders_are_never_stale() {
        let mut filled = open_order("0xfilled", Side::Sell, dec!(150));
        filled.status = OrderStatus::Filled;
        let mut cancelled = open_order("0xcancelled", Side::Buy, dec!(10));
        cancelled.status = OrderStatus::Cancelled;
        let mut partial = open_order("0xpartial", Side::Buy, dec!(10));
        partial.status = OrderStatus::PartialFilled;

        let orders = vec![filled, cancelled, partial];
        let stale = stale_hashes(&orders, token(dec!(100)), token(dec!(5)));
        assert_eq!(stale, ["0xpartial"]);
    }

    #[tokio::test]
    async fn test_reap_skips_settled_orders() {
        let gw = MockGateway::default();
        let mut filled = open_order("0xfilled", Side::Sell, dec!(150));
        filled.status = OrderStatus::Filled;
        let mut cancelled = open_order("0xcancelled", Side::Buy, dec!(10));
        cancelled.status = OrderStatus::Cancelled;
        *gw.orders.lock().unwrap() = vec![filled, cancelled, open_order("0xopen", Side::Sell, dec!(150))];
        let prices = MockPrices::fixed(dec!(100));
        let (config, params) = (testing::config(5), testing::params(5));
        let ctx = PairContext {
            gateway: &gw,
            prices: &prices,
            config: &config,
            params: &params,
        };

        assert_eq!(reap_stale_orders(&ctx).await.unwrap(), 1);
        assert_eq!(gw.cancels(), vec![vec!["0xopen".to_string()]]);
    }

    #[tokio::test]
    async fn test_reap_nothing_stale_skips_cancel() {
        let gw = MockGateway::default();
        *gw.orders.lock().unwrap() = vec![open_order("0xb", Side::Buy, dec!(99))];
        let prices = MockPrices::fixed(dec!(100));
        let (config, params) = (testing::config(5), testing::params(5));
        let ctx = PairContext {
            gateway: &gw,
            prices: &prices,
            config: &config,
            params: &params,
        };

        assert_eq!(reap_stale_orders(&ctx).await.unwrap(), 0);
        assert!(gw.cancels().is_empty());
    }

    #[tokio::test]
    async fn test_reap_skipped_without_reference() {
        let gw = MockGateway::default();
        *gw.orders.lock().unwrap() = vec![open_order("0xa", Side::Buy, dec!(1))];
        let prices = MockPrices::unavailable();
        let (config, params) = (testing::config(5), testing::params(5));
        let ctx = PairContext {
            gateway: &gw,
            prices: &prices,
            config: &config,
            params: &params,
        };

        assert_eq!(reap_stale_orders(&ctx).await.unwrap(), 0);
        assert!(gw.cancels().is_empty());
        assert_eq!(gw.order_queries.load(Ordering::SeqCst), 1);
    }
}
