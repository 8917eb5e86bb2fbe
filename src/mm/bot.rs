//! Market maker orchestrator.
//!
//! One pair, one sequential loop: fetch the book, then either cross the
//! spread (both sides saturated) or top up the ladder and reap stale orders,
//! then sleep.

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tomox::{OrderBook, Side, DEFAULT_TOKEN_DECIMALS};
use tracing::{debug, error, info, warn};

use crate::error::MmError;
use crate::gateway::{ExchangeGateway, PriceSource};
use crate::mm::balancer::{fill_side, PlacementCursor};
use crate::mm::config::MarketMakerConfig;
use crate::mm::crossing::trigger_cross;
use crate::mm::draws::Draws;
use crate::mm::ladder::LadderState;
use crate::mm::params::{calibrate, MarketParameters};
use crate::mm::reaper::reap_stale_orders;
use crate::mm::PairContext;
use crate::units::{ExchangeUnits, TokenUnits};

/// What one iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// The relayer has no book for the pair yet.
    NoBook,
    /// The book could not be fetched.
    BookUnavailable,
    /// Both sides were saturated; a crossing trade was attempted.
    Crossed { placed: bool },
    /// Ladder top-up and stale reaping ran.
    ToppedUp {
        buys: usize,
        sells: usize,
        cancelled: usize,
    },
}

/// Single-pair market maker.
pub struct MarketMaker<G, P> {
    config: MarketMakerConfig,
    params: MarketParameters,
    gateway: G,
    prices: P,
    draws: Box<dyn Draws>,
}

// ---------------------------------------------------------------------------
// Helpers (pure, testable)
// ---------------------------------------------------------------------------

/// Both sides hold at least `orderbook_length` levels.
pub fn is_saturated(book: &OrderBook, orderbook_length: usize) -> bool {
    book.asks.len() >= orderbook_length && book.bids.len() >= orderbook_length
}

/// Levels missing on each side, `(buys, sells)`.
pub fn missing_levels(book: &OrderBook, orderbook_length: usize) -> (usize, usize) {
    (
        orderbook_length.saturating_sub(book.bids.len()),
        orderbook_length.saturating_sub(book.asks.len()),
    )
}

/// Stand-in reference for a side when no fresh price is available: the best
/// price on the opposite side, the tightest level that does not cross.
pub fn fallback_anchor(book: &OrderBook, side: Side, token_decimals: u32) -> Option<ExchangeUnits> {
    let pricepoint = match side {
        Side::Buy => book.best_ask(),
        Side::Sell => book.best_bid(),
    }?;
    Some(TokenUnits::new(pricepoint).to_exchange(token_decimals))
}

impl<G: ExchangeGateway, P: PriceSource> MarketMaker<G, P> {
    /// Calibrate the pair and return a ready market maker.
    ///
    /// Fails when the quote token's metadata or the reference price cannot
    /// be fetched; the loop must not start without them.
    pub async fn start(
        config: MarketMakerConfig,
        gateway: G,
        prices: P,
        draws: Box<dyn Draws>,
    ) -> Result<Self, MmError> {
        info!(pair = %config.pair, "starting market maker");

        let token = gateway.get_token_info(&config.quote_token).await?;
        let token_decimals = token.decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS);

        let reference = prices
            .latest_price(&config.ticker_symbol)
            .await
            .ok_or_else(|| MmError::PriceUnavailable(config.ticker_symbol.clone()))?;

        let params = calibrate(&config.pair, reference, token_decimals, config.orderbook_length)?;

        info!(
            pair = %config.pair,
            ticker = %config.ticker_symbol,
            reference = %reference,
            default_amount = %params.default_amount,
            minimum_step = %params.minimum_step.to_price(),
            amount_decimals = params.amount_decimals,
            price_decimals = params.price_decimals,
            orderbook_length = params.orderbook_length,
            token_decimals,
            speed_ms = config.speed_ms,
            "CONFIG"
        );

        Ok(Self {
            config,
            params,
            gateway,
            prices,
            draws,
        })
    }

    #[cfg(test)]
    pub fn params(&self) -> &MarketParameters {
        &self.params
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run iterations until `cancel` fires.
    ///
    /// An iteration in flight always completes; cancellation is observed
    /// between iterations and during the sleep. Resting orders are left on
    /// the book.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let speed = Duration::from_millis(self.config.speed_ms);
        while !cancel.is_cancelled() {
            let outcome = self.run_iteration().await;
            debug!(pair = %self.config.pair, ?outcome, "iteration done");

            tokio::select! {
                _ = time::sleep(speed) => {}
                _ = cancel.cancelled() => break,
            }
        }
        info!(pair = %self.config.pair, "shutting down, resting orders left on book");
    }

    /// One pass of the state machine. Never fails: every error is logged
    /// and the remaining work of its branch is dropped.
    pub async fn run_iteration(&mut self) -> IterationOutcome {
        let ctx = PairContext {
            gateway: &self.gateway,
            prices: &self.prices,
            config: &self.config,
            params: &self.params,
        };
        let draws = self.draws.as_mut();
        let pair = &self.config.pair;

        let book = match ctx
            .gateway
            .get_order_book(&self.config.base_token, &self.config.quote_token)
            .await
        {
            Ok(Some(book)) => book,
            Ok(None) => {
                debug!(%pair, "no order book yet");
                return IterationOutcome::NoBook;
            }
            Err(e) => {
                error!(%pair, error = %e, "order book fetch failed");
                return IterationOutcome::BookUnavailable;
            }
        };

        let length = self.params.orderbook_length;
        if is_saturated(&book, length) {
            let placed = match trigger_cross(&ctx, &book, draws).await {
                Ok(_) => true,
                Err(e) => {
                    error!(%pair, error = %e, "crossing trade failed");
                    false
                }
            };
            return IterationOutcome::Crossed { placed };
        }

        let (missing_buys, missing_sells) = missing_levels(&book, length);
        info!(
            %pair,
            bids = book.bids.len(),
            asks = book.asks.len(),
            missing_buys,
            missing_sells,
            "TOP-UP"
        );

        let token_decimals = self.params.token_decimals;
        let mut ladder = LadderState::from_book(&book, &self.params);

        let mut cursor = PlacementCursor::default();
        let mut buys = 0;
        let buy_anchor = fallback_anchor(&book, Side::Buy, token_decimals);
        match fill_side(&ctx, &mut ladder, draws, Side::Buy, missing_buys, cursor.clone(), buy_anchor).await {
            Ok(fill) => {
                buys = fill.placed.len();
                cursor = fill.cursor;
            }
            Err(e) => error!(%pair, side = %Side::Buy, error = %e, "top-up failed"),
        }

        let mut sells = 0;
        let sell_anchor = fallback_anchor(&book, Side::Sell, token_decimals);
        match fill_side(&ctx, &mut ladder, draws, Side::Sell, missing_sells, cursor, sell_anchor).await {
            Ok(fill) => sells = fill.placed.len(),
            Err(e) => error!(%pair, side = %Side::Sell, error = %e, "top-up failed"),
        }

        let cancelled = match reap_stale_orders(&ctx).await {
            Ok(n) => n,
            Err(e) => {
                warn!(%pair, error = %e, "stale order check failed");
                0
            }
        };

        IterationOutcome::ToppedUp {
            buys,
            sells,
            cancelled,
        }
    }
}
