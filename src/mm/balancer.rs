//! Orderbook balancer: tops one side of the book back up to the target depth.

use tomox::{NewOrder, PlacedOrder, Side};
use tracing::{error, info, warn};

use crate::error::MmError;
use crate::mm::draws::Draws;
use crate::mm::ladder::LadderState;
use crate::mm::PairContext;
use crate::units::{format_fixed, ExchangeUnits};

/// Nonce and hash of the last placed order, carried from one placement
/// step to the next.
///
/// A zero nonce means "unknown"; the relayer then assigns nonces itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementCursor {
    pub nonce: u64,
    pub hash: Option<String>,
}

impl PlacementCursor {
    fn nonce_for(&self, index: usize) -> Option<u64> {
        (self.nonce != 0).then(|| self.nonce + index as u64)
    }
}

/// Result of one [`fill_side`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    pub cursor: PlacementCursor,
    /// Each submitted order with the result at the same batch position.
    pub placed: Vec<(NewOrder, PlacedOrder)>,
}

/// Reference for a ladder walk: a fresh price, else the book anchor.
async fn ladder_reference(
    ctx: &PairContext<'_>,
    side: Side,
    anchor: Option<ExchangeUnits>,
) -> Result<ExchangeUnits, MmError> {
    if let Some(price) = ctx.prices.latest_price(&ctx.config.ticker_symbol).await {
        return ExchangeUnits::from_price(price);
    }
    match anchor {
        Some(anchor) => {
            warn!(pair = %ctx.config.pair, %side, price = %anchor.to_price(), "reference unavailable, anchoring to opposite best");
            Ok(anchor)
        }
        None => Err(MmError::PriceUnavailable(ctx.config.ticker_symbol.clone())),
    }
}

/// Place `missing` orders on `side`, each on the next free ladder level.
///
/// The reference price is fetched again right before pricing; `anchor` (the
/// best price on the opposite side) stands in when it is unavailable. Each
/// order size is jittered independently. All orders go out in one batch and
/// results are matched back to orders by position.
pub async fn fill_side(
    ctx: &PairContext<'_>,
    ladder: &mut LadderState,
    draws: &mut dyn Draws,
    side: Side,
    missing: usize,
    cursor: PlacementCursor,
    anchor: Option<ExchangeUnits>,
) -> Result<FillOutcome, MmError> {
    if missing == 0 {
        return Ok(FillOutcome {
            cursor,
            placed: Vec::new(),
        });
    }

    let params = ctx.params;
    let reference = ladder_reference(ctx, side, anchor).await?;

    let mut orders = Vec::with_capacity(missing);
    for index in 0..missing {
        let price = ladder.next_price(side, reference, params)?;
        let amount = params.default_amount * draws.size_multiplier();
        orders.push(NewOrder {
            base_token: ctx.config.base_token.clone(),
            quote_token: ctx.config.quote_token.clone(),
            price: format_fixed(price.to_price(), params.price_decimals),
            amount: format_fixed(amount, params.amount_decimals),
            side,
            nonce: cursor.nonce_for(index),
        });
    }

    let results = ctx.gateway.create_many_orders(&orders).await?;
    if results.len() != orders.len() {
        for (order, placed) in orders.iter().zip(&results) {
            log_order(&ctx.config.pair, order, placed);
        }
        error!(
            pair = %ctx.config.pair,
            %side,
            orders = orders.len(),
            results = results.len(),
            "batch result count mismatch"
        );
        return Err(MmError::BatchMismatch {
            orders: orders.len(),
            results: results.len(),
        });
    }

    let placed: Vec<_> = orders.into_iter().zip(results).collect();
    for (order, result) in &placed {
        log_order(&ctx.config.pair, order, result);
    }

    let cursor = match placed.last() {
        Some((_, last)) => PlacementCursor {
            nonce: last.nonce + 1,
            hash: Some(last.hash.clone()),
        },
        None => cursor,
    };
    Ok(FillOutcome { cursor, placed })
}

pub(crate) fn log_order(pair: &str, order: &NewOrder, placed: &PlacedOrder) {
    info!(
        side = %order.side,
        pair,
        price = %order.price,
        amount = %order.amount,
        hash = %placed.hash,
        nonce = placed.nonce,
        "ORDER"
    );
}
