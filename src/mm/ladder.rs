//! Price ladder engine.
//!
//! Walks outward from a reference price one step at a time until it finds a
//! level whose display price is not yet used on that side. Used levels are
//! compared as fixed-precision strings, so two raw prices that round to the
//! same display price count as the same level.

use std::collections::BTreeSet;

use tomox::{OrderBook, Side};

use crate::error::MmError;
use crate::mm::params::MarketParameters;
use crate::units::{format_fixed, ExchangeUnits, TokenUnits};

/// Upper bound on steps tried for one level. Hitting it means the step is
/// too fine for the display precision or the book is absurdly deep.
pub const MAX_LADDER_STEPS: u32 = 10_000;

/// Display prices already taken on each side, rebuilt every iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LadderState {
    buy_prices: BTreeSet<String>,
    sell_prices: BTreeSet<String>,
}

impl LadderState {
    /// Seed the used levels from a book snapshot: bids are used BUY levels,
    /// asks are used SELL levels.
    pub fn from_book(book: &OrderBook, params: &MarketParameters) -> Self {
        let display = |pricepoint| {
            let price = TokenUnits::new(pricepoint).to_price(params.token_decimals);
            format_fixed(price, params.price_decimals)
        };
        Self {
            buy_prices: book.bids.iter().map(|l| display(l.pricepoint)).collect(),
            sell_prices: book.asks.iter().map(|l| display(l.pricepoint)).collect(),
        }
    }

    /// Used display prices on `side`.
    #[cfg(test)]
    pub fn used(&self, side: Side) -> &BTreeSet<String> {
        match side {
            Side::Buy => &self.buy_prices,
            Side::Sell => &self.sell_prices,
        }
    }

    fn used_mut(&mut self, side: Side) -> &mut BTreeSet<String> {
        match side {
            Side::Buy => &mut self.buy_prices,
            Side::Sell => &mut self.sell_prices,
        }
    }

    /// Next free level on `side`, `i` steps away from `reference` for the
    /// smallest `i >= 1` whose display price is unused.
    ///
    /// The level is marked used and the raw (unrounded) candidate returned.
    ///
    /// # Errors
    ///
    /// [`MmError::LadderExhausted`] when no free level exists within
    /// [`MAX_LADDER_STEPS`] or a BUY candidate would reach zero.
    pub fn next_price(
        &mut self,
        side: Side,
        reference: ExchangeUnits,
        params: &MarketParameters,
    ) -> Result<ExchangeUnits, MmError> {
        let step = params.minimum_step;
        if !step.is_positive() {
            return Err(MmError::Config(format!("minimum step must be positive, got {step:?}")));
        }

        for i in 1..=MAX_LADDER_STEPS {
            let candidate = match side {
                Side::Buy => reference - step * i,
                Side::Sell => reference + step * i,
            };
            if !candidate.is_positive() {
                return Err(MmError::LadderExhausted { side, attempts: i });
            }

            let display = format_fixed(candidate.to_price(), params.price_decimals);
            let used = self.used_mut(side);
            if !used.contains(&display) {
                used.insert(display);
                return Ok(candidate);
            }
        }

        Err(MmError::LadderExhausted {
            side,
            attempts: MAX_LADDER_STEPS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tomox::BookLevel;

    fn params(step: Decimal, price_decimals: u32) -> MarketParameters {
        MarketParameters {
            default_amount: dec!(1),
            minimum_step: ExchangeUnits::from_price(step).unwrap(),
            amount_decimals: 5,
            price_decimals,
            orderbook_length: 5,
            token_decimals: 18,
        }
    }

    fn ex(price: Decimal) -> ExchangeUnits {
        ExchangeUnits::from_price(price).unwrap()
    }

    fn level(price: Decimal) -> BookLevel {
        BookLevel {
            pricepoint: TokenUnits::from_price(price, 18).unwrap().raw(),
            amount: dec!(1),
        }
    }

    #[test]
    fn test_from_book_formats_levels() {
        let book = OrderBook {
            pair_name: None,
            asks: vec![level(dec!(101)), level(dec!(102.5))],
            bids: vec![level(dec!(99))],
        };
        let ladder = LadderState::from_book(&book, &params(dec!(1), 2));
        assert!(ladder.used(Side::Sell).contains("101.00"));
        assert!(ladder.used(Side::Sell).contains("102.50"));
        assert!(ladder.used(Side::Buy).contains("99.00"));
        assert_eq!(ladder.used(Side::Buy).len(), 1);
    }

    #[test]
    fn test_first_free_level_is_one_step_out() {
        let p = params(dec!(1), 2);
        let mut ladder = LadderState::default();
        assert_eq!(ladder.next_price(Side::Buy, ex(dec!(100)), &p).unwrap(), ex(dec!(99)));
        assert_eq!(ladder.next_price(Side::Sell, ex(dec!(100)), &p).unwrap(), ex(dec!(101)));
    }

    #[test]
    fn test_skips_levels_present_in_book() {
        let p = params(dec!(1), 2);
        let book = OrderBook {
            pair_name: None,
            asks: vec![],
            bids: vec![level(dec!(99)), level(dec!(98))],
        };
        let mut ladder = LadderState::from_book(&book, &p);
        assert_eq!(ladder.next_price(Side::Buy, ex(dec!(100)), &p).unwrap(), ex(dec!(97)));
        assert!(ladder.used(Side::Buy).contains("97.00"));
    }

    #[test]
    fn test_returned_levels_unique_and_moving_outward() {
        let p = params(dec!(0.5), 7);
        let mut ladder = LadderState::default();
        let reference = ex(dec!(100));

        let mut last_buy = reference;
        let mut last_sell = reference;
        let mut seen = BTreeSet::new();
        for _ in 0..25 {
            let b = ladder.next_price(Side::Buy, reference, &p).unwrap();
            let s = ladder.next_price(Side::Sell, reference, &p).unwrap();
            assert!(b < last_buy);
            assert!(s > last_sell);
            last_buy = b;
            last_sell = s;
            assert!(seen.insert(format_fixed(b.to_price(), 7)));
        }
        assert_eq!(ladder.used(Side::Buy).len(), 25);
        assert_eq!(ladder.used(Side::Sell).len(), 25);
    }

    #[test]
    fn test_dedup_uses_rounded_display_price() {
        // Step finer than display precision: 99.999 and 99.995 both show as "100.00".
        let p = params(dec!(0.001), 2);
        let mut ladder = LadderState::default();
        let reference = ex(dec!(100));

        let first = ladder.next_price(Side::Buy, reference, &p).unwrap();
        assert_eq!(first, ex(dec!(99.999)));

        let second = ladder.next_price(Side::Buy, reference, &p).unwrap();
        assert_eq!(second, ex(dec!(99.994)));
        assert!(ladder.used(Side::Buy).contains("99.99"));
    }

    #[test]
    fn test_returns_raw_candidate_not_rounded() {
        let p = params(dec!(0.333), 2);
        let mut ladder = LadderState::default();
        let price = ladder.next_price(Side::Sell, ex(dec!(10)), &p).unwrap();
        assert_eq!(price.to_price(), dec!(10.333));
    }

    #[test]
    fn test_buy_side_stops_before_zero() {
        let p = params(dec!(0.1), 2);
        let mut ladder = LadderState::default();
        for _ in 0..4 {
            ladder.next_price(Side::Buy, ex(dec!(0.5)), &p).unwrap();
        }
        let err = ladder.next_price(Side::Buy, ex(dec!(0.5)), &p).unwrap_err();
        assert!(matches!(
            err,
            MmError::LadderExhausted {
                side: Side::Buy,
                ..
            }
        ));
    }

    #[test]
    fn test_exhaustion_bounded_by_max_steps() {
        // 10_000 steps of 0.000001 never leave "100.00"/"100.01".
        let p = params(dec!(0.000001), 2);
        let book = OrderBook {
            pair_name: None,
            asks: vec![level(dec!(100)), level(dec!(100.01))],
            bids: vec![],
        };
        let mut ladder = LadderState::from_book(&book, &p);
        let err = ladder.next_price(Side::Sell, ex(dec!(100)), &p).unwrap_err();
        assert!(matches!(
            err,
            MmError::LadderExhausted {
                side: Side::Sell,
                attempts: MAX_LADDER_STEPS
            }
        ));
    }
}
