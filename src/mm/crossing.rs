//! Crossing-trade trigger for a saturated book.

use rust_decimal::Decimal;
use tomox::{NewOrder, OrderBook, PlacedOrder, Side};
use tracing::{info, warn};

use crate::error::MmError;
use crate::mm::balancer::log_order;
use crate::mm::draws::Draws;
use crate::mm::params::MarketParameters;
use crate::mm::PairContext;
use crate::units::{format_fixed, ExchangeUnits, TokenUnits};

/// A single aggressive order, priced and sized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossPlan {
    pub side: Side,
    pub price: String,
    pub amount: String,
    /// Price the order was pushed away from.
    pub trigger: TokenUnits,
}

/// Price a crossing trade against `book`.
///
/// With a reference price, the side is BUY when it is at or above the best
/// ask, SELL otherwise, and the reference is the trigger. Without one the
/// trigger is the boundary level at `orderbook_length - 1`: the bid for an
/// odd `multiplier`, the ask for an even one. The price is pushed
/// `multiplier` steps past the trigger in the crossing direction and the
/// amount is `multiplier * default_amount`.
///
/// A SELL pushed to zero or below fails with [`MmError::LadderExhausted`].
pub fn plan_cross(
    book: &OrderBook,
    reference: Option<TokenUnits>,
    multiplier: u32,
    params: &MarketParameters,
) -> Result<CrossPlan, MmError> {
    let thin = || MmError::BookTooThin {
        needed: params.orderbook_length,
        asks: book.asks.len(),
        bids: book.bids.len(),
    };
    let best_ask = book.best_ask().map(TokenUnits::new).ok_or_else(thin)?;

    let trigger = match reference.filter(|r| r.raw() > Decimal::ZERO) {
        Some(reference) => reference,
        None => {
            let boundary = params.orderbook_length.checked_sub(1).ok_or_else(thin)?;
            let levels = if multiplier % 2 == 1 { &book.bids } else { &book.asks };
            levels
                .get(boundary)
                .map(|l| TokenUnits::new(l.pricepoint))
                .ok_or_else(thin)?
        }
    };

    let side = if trigger >= best_ask { Side::Buy } else { Side::Sell };
    let push = params.minimum_step.checked_times(multiplier)?;
    let anchor = trigger.to_exchange(params.token_decimals);
    let price = match side {
        Side::Buy => anchor + push,
        Side::Sell => anchor - push,
    };
    if !price.is_positive() {
        return Err(MmError::LadderExhausted {
            side,
            attempts: multiplier,
        });
    }
    let amount = params.default_amount * Decimal::from(multiplier);

    Ok(CrossPlan {
        side,
        price: format_fixed(price.to_price(), params.price_decimals),
        amount: format_fixed(amount, params.amount_decimals),
        trigger,
    })
}

/// Place one crossing order. The relayer assigns its nonce.
pub async fn trigger_cross(
    ctx: &PairContext<'_>,
    book: &OrderBook,
    draws: &mut dyn Draws,
) -> Result<PlacedOrder, MmError> {
    let config = ctx.config;
    let reference = match ctx.prices.latest_price(&config.ticker_symbol).await {
        Some(price) => Some(ExchangeUnits::from_price(price)?.to_token(ctx.params.token_decimals)?),
        None => {
            warn!(pair = %config.pair, "reference unavailable, crossing from boundary level");
            None
        }
    };
    let multiplier = draws.step_multiplier();
    let plan = plan_cross(book, reference, multiplier, ctx.params)?;

    let order = NewOrder {
        base_token: config.base_token.clone(),
        quote_token: config.quote_token.clone(),
        price: plan.price,
        amount: plan.amount,
        side: plan.side,
        nonce: None,
    };
    let placed = ctx.gateway.create_order(&order).await?;
    info!(pair = %config.pair, side = %order.side, multiplier, "CROSS");
    log_order(&config.pair, &order, &placed);
    Ok(placed)
}
