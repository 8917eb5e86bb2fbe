use std::str::FromStr;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;

use crate::error::{Result, TomoxError};

/// `10^decimals` as a `Decimal`.
///
/// # Errors
///
/// Returns `TomoxError::Overflow` when `decimals` exceeds the 28 digits a
/// `Decimal` can hold.
pub fn pow10(decimals: u32) -> Result<Decimal> {
    10_i128
        .checked_pow(decimals)
        .filter(|_| decimals <= 28)
        .map(|v| Decimal::from_i128_with_scale(v, 0))
        .ok_or_else(|| TomoxError::Overflow(format!("10^{decimals}")))
}

/// Convert a human-readable decimal string to an integer scaled by
/// `10^decimals`, truncating any remaining fraction.
///
/// # Errors
///
/// Returns `TomoxError::Validation` for an unparsable or negative value and
/// `TomoxError::Overflow` if the scaled value does not fit.
pub fn to_scaled_integer(value: &str, decimals: u32) -> Result<U256> {
    let x = Decimal::from_str(value.trim())
        .map_err(|e| TomoxError::Validation(format!("invalid decimal {value:?}: {e}")))?;
    if x.is_sign_negative() {
        return Err(TomoxError::Validation(format!("negative value {value}")));
    }
    let scaled = x
        .checked_mul(pow10(decimals)?)
        .ok_or_else(|| TomoxError::Overflow(format!("to_scaled_integer: {value} * 10^{decimals}")))?
        .trunc();
    U256::from_str(&scaled.to_string())
        .map_err(|e| TomoxError::Overflow(format!("to_scaled_integer: {scaled}: {e}")))
}

/// Parse a `0x`-prefixed hex address.
///
/// # Errors
///
/// Returns `TomoxError::Validation` if the address is malformed.
pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|e| TomoxError::Validation(format!("invalid address {value:?}: {e}")))
}

/// Decode a hex string (with optional `0x` prefix) to bytes.
///
/// # Errors
///
/// Returns `TomoxError::Validation` if the hex string is invalid.
pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(stripped).map_err(|e| TomoxError::Validation(format!("invalid hex string: {e}")))
}

/// Hex-encode bytes with a `0x` prefix.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
