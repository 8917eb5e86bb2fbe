pub mod signing;

use std::str::FromStr;

use alloy_primitives::{Address, B256, U256};
use alloy_signer_local::PrivateKeySigner;

use crate::error::{Result, TomoxError};
use crate::types::{NewOrder, OrderStatus, OrderType, SignedCancel, SignedOrder};
use crate::utils::{encode_hex, parse_address, to_scaled_integer};

use self::signing::{cancel_hash, order_hash, sign_hash, OrderFields};

/// Parse a hex-encoded secp256k1 private key (with or without `0x`).
pub fn signer_from_private_key(private_key: &str) -> Result<PrivateKeySigner> {
    PrivateKeySigner::from_str(private_key.trim())
        .map_err(|e| TomoxError::Signing(format!("invalid private key: {e}")))
}

/// Convert, hash and sign a [`NewOrder`] whose nonce is already assigned.
pub fn build_signed_order(
    order: &NewOrder,
    exchange: Address,
    signer: &PrivateKeySigner,
    base_decimals: u32,
    quote_decimals: u32,
) -> Result<SignedOrder> {
    let nonce = order
        .nonce
        .ok_or_else(|| TomoxError::Validation("order nonce not assigned".into()))?;
    let amount = to_scaled_integer(&order.amount, base_decimals)?;
    let pricepoint = to_scaled_integer(&order.price, quote_decimals)?;
    if amount.is_zero() || pricepoint.is_zero() {
        return Err(TomoxError::Validation(format!(
            "order rounds to zero: price={} amount={}",
            order.price, order.amount
        )));
    }

    let user = signer.address();
    let hash = order_hash(&OrderFields {
        exchange,
        user,
        base_token: parse_address(&order.base_token)?,
        quote_token: parse_address(&order.quote_token)?,
        amount,
        pricepoint,
        side: order.side,
        nonce: U256::from(nonce),
    });
    let signature = sign_hash(&hash, signer)?;

    Ok(SignedOrder {
        exchange_address: exchange.to_checksum(None),
        user_address: user.to_checksum(None),
        base_token: order.base_token.clone(),
        quote_token: order.quote_token.clone(),
        side: order.side,
        order_type: OrderType::Limit,
        status: OrderStatus::New,
        amount: amount.to_string(),
        pricepoint: pricepoint.to_string(),
        nonce: nonce.to_string(),
        hash: encode_hex(hash.as_slice()),
        signature,
    })
}

/// Hash and sign a cancellation of `order_hash` using `nonce`.
pub fn build_signed_cancel(
    order_hash: &str,
    nonce: u64,
    signer: &PrivateKeySigner,
) -> Result<SignedCancel> {
    let order_hash_bytes = B256::from_str(order_hash.trim())
        .map_err(|e| TomoxError::Validation(format!("invalid order hash {order_hash:?}: {e}")))?;
    let user = signer.address();
    let hash = cancel_hash(order_hash_bytes, U256::from(nonce), user);
    let signature = sign_hash(&hash, signer)?;

    Ok(SignedCancel {
        order_hash: encode_hex(order_hash_bytes.as_slice()),
        user_address: user.to_checksum(None),
        nonce: nonce.to_string(),
        hash: encode_hex(hash.as_slice()),
        signature,
    })
}
