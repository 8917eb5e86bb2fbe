//! Per-pair market parameters, calibrated once at startup from the
//! reference price and the quote token's decimals.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::MmError;
use crate::units::ExchangeUnits;

/// Amount precision for small default sizes.
const FINE_AMOUNT_DECIMALS: u32 = 5;
/// Amount precision once the default size exceeds one unit.
const COARSE_AMOUNT_DECIMALS: u32 = 2;
const FINE_PRICE_DECIMALS: u32 = 7;
const COARSE_PRICE_DECIMALS: u32 = 2;
/// Largest quote-token decimals the scaled types can carry safely.
const MAX_TOKEN_DECIMALS: u32 = 24;

/// Sizing and precision for one pair. Read-only after [`calibrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct MarketParameters {
    /// Base amount of one ladder order before size jitter.
    pub default_amount: Decimal,
    /// Distance between ladder levels.
    pub minimum_step: ExchangeUnits,
    /// Fractional digits of submitted amounts.
    pub amount_decimals: u32,
    /// Fractional digits of submitted (and de-duplicated) prices.
    pub price_decimals: u32,
    /// Target resting orders per side.
    pub orderbook_length: usize,
    /// Decimals of the quote token (scale of relayer pricepoints).
    pub token_decimals: u32,
}

/// Derive [`MarketParameters`] from the reference price.
///
/// Pairs quoted in BTC use a wider step (1% of price) and a tiny notional
/// (0.001 BTC); everything else uses a 0.01% step and a notional of 100 quote
/// units. Precision coarsens for large sizes and for steps above one quote
/// unit.
pub fn calibrate(
    pair: &str,
    reference_price: Decimal,
    token_decimals: u32,
    orderbook_length: usize,
) -> Result<MarketParameters, MmError> {
    if reference_price <= Decimal::ZERO {
        return Err(MmError::Config(format!(
            "reference price for {pair} must be positive, got {reference_price}"
        )));
    }
    if token_decimals > MAX_TOKEN_DECIMALS {
        return Err(MmError::Config(format!(
            "quote token decimals {token_decimals} exceed {MAX_TOKEN_DECIMALS}"
        )));
    }
    if orderbook_length == 0 {
        return Err(MmError::Config("orderbook length must be > 0".into()));
    }

    let price = ExchangeUnits::from_price(reference_price)?;

    let (notional, step_divisor) = if pair.to_uppercase().ends_with("BTC") {
        (dec!(0.001), dec!(100))
    } else {
        (dec!(100), dec!(10000))
    };

    let default_amount = (notional / reference_price)
        .round_dp_with_strategy(FINE_AMOUNT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    if default_amount.is_zero() {
        return Err(MmError::Config(format!(
            "default amount for {pair} rounds to zero at price {reference_price}"
        )));
    }
    let minimum_step = ExchangeUnits::new(price.raw() / step_divisor);

    let amount_decimals = if default_amount > Decimal::ONE {
        COARSE_AMOUNT_DECIMALS
    } else {
        FINE_AMOUNT_DECIMALS
    };
    // One whole quote unit in exchange scale.
    let price_decimals = if minimum_step > ExchangeUnits::from_price(Decimal::ONE)? {
        COARSE_PRICE_DECIMALS
    } else {
        FINE_PRICE_DECIMALS
    };

    Ok(MarketParameters {
        default_amount,
        minimum_step,
        amount_decimals,
        price_decimals,
        orderbook_length,
        token_decimals,
    })
}
