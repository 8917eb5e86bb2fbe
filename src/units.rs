//! Scaled price units.
//!
//! Two scales meet in the bot. Exchange units are a price times `1e8` and
//! carry all ladder arithmetic (reference price, step size, candidates).
//! Token units are a price times `10^quoteDecimals` and are what the relayer
//! reports as `pricepoint`. Each scale has its own type and every crossing
//! between them goes through a named conversion.

use std::ops::{Add, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::MmError;

/// Decimals of the exchange-internal price scale.
pub const EXCHANGE_DECIMALS: u32 = 8;

/// Largest power of ten a `Decimal` can hold.
const MAX_DECIMALS: u32 = 28;

fn pow10(decimals: u32) -> Decimal {
    Decimal::from_i128_with_scale(10_i128.pow(decimals.min(MAX_DECIMALS)), 0)
}

/// Price scaled by `10^EXCHANGE_DECIMALS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ExchangeUnits(Decimal);

/// Price scaled by `10^token_decimals` (the relayer's pricepoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenUnits(Decimal);

impl ExchangeUnits {
    pub fn new(raw: Decimal) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> Decimal {
        self.0
    }

    /// Scale a human-readable price up to exchange units.
    pub fn from_price(price: Decimal) -> Result<Self, MmError> {
        price
            .checked_mul(pow10(EXCHANGE_DECIMALS))
            .map(Self)
            .ok_or_else(|| MmError::Overflow(format!("{price} * 1e{EXCHANGE_DECIMALS}")))
    }

    /// Human-readable price.
    pub fn to_price(self) -> Decimal {
        self.0 / pow10(EXCHANGE_DECIMALS)
    }

    /// Re-scale to token units for a quote token with `token_decimals`.
    pub fn to_token(self, token_decimals: u32) -> Result<TokenUnits, MmError> {
        if token_decimals >= EXCHANGE_DECIMALS {
            self.0
                .checked_mul(pow10(token_decimals - EXCHANGE_DECIMALS))
                .map(TokenUnits)
                .ok_or_else(|| MmError::Overflow(format!("{} to token scale 1e{token_decimals}", self.0)))
        } else {
            Ok(TokenUnits(self.0 / pow10(EXCHANGE_DECIMALS - token_decimals)))
        }
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// `self * n`, checked.
    pub fn checked_times(self, n: u32) -> Result<Self, MmError> {
        self.0
            .checked_mul(Decimal::from(n))
            .map(Self)
            .ok_or_else(|| MmError::Overflow(format!("{} * {n}", self.0)))
    }
}

impl TokenUnits {
    pub fn new(raw: Decimal) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> Decimal {
        self.0
    }

    /// Scale a human-readable price up to token units.
    #[cfg(test)]
    pub fn from_price(price: Decimal, token_decimals: u32) -> Result<Self, MmError> {
        price
            .checked_mul(pow10(token_decimals))
            .map(Self)
            .ok_or_else(|| MmError::Overflow(format!("{price} * 1e{token_decimals}")))
    }

    /// Human-readable price.
    pub fn to_price(self, token_decimals: u32) -> Decimal {
        self.0 / pow10(token_decimals)
    }

    /// Re-scale to exchange units.
    pub fn to_exchange(self, token_decimals: u32) -> ExchangeUnits {
        if token_decimals >= EXCHANGE_DECIMALS {
            ExchangeUnits(self.0 / pow10(token_decimals - EXCHANGE_DECIMALS))
        } else {
            ExchangeUnits(self.0 * pow10(EXCHANGE_DECIMALS - token_decimals))
        }
    }

}

impl Add for ExchangeUnits {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for ExchangeUnits {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for ExchangeUnits {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

/// Format `value` with exactly `dp` fractional digits, rounding half away
/// from zero (`toFixed` semantics).
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let mut v = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    v.rescale(dp);
    v.to_string()
}
