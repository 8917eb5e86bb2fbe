//! Order and cancellation hashing plus EIP-191 signing.
//!
//! Hashes are keccak-256 over the tightly packed fields (addresses as 20
//! bytes, integers as 32-byte big-endian words). The hash itself is signed as
//! an Ethereum personal message, so the relayer can recover the user address.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::error::{Result, TomoxError};
use crate::types::{Side, Signature};
use crate::utils::encode_hex;

/// Fields that identify an order on the exchange.
#[derive(Debug, Clone, Copy)]
pub struct OrderFields {
    pub exchange: Address,
    pub user: Address,
    pub base_token: Address,
    pub quote_token: Address,
    pub amount: U256,
    pub pricepoint: U256,
    pub side: Side,
    pub nonce: U256,
}

/// keccak-256 of the packed order fields.
pub fn order_hash(fields: &OrderFields) -> B256 {
    let mut buf = Vec::with_capacity(4 * 20 + 4 * 32);
    buf.extend_from_slice(fields.exchange.as_slice());
    buf.extend_from_slice(fields.user.as_slice());
    buf.extend_from_slice(fields.base_token.as_slice());
    buf.extend_from_slice(fields.quote_token.as_slice());
    buf.extend_from_slice(&fields.amount.to_be_bytes::<32>());
    buf.extend_from_slice(&fields.pricepoint.to_be_bytes::<32>());
    buf.extend_from_slice(&U256::from(fields.side.as_u8()).to_be_bytes::<32>());
    buf.extend_from_slice(&fields.nonce.to_be_bytes::<32>());
    keccak256(&buf)
}

/// keccak-256 of `order_hash || nonce || user`.
pub fn cancel_hash(order_hash: B256, nonce: U256, user: Address) -> B256 {
    let mut buf = Vec::with_capacity(32 + 32 + 20);
    buf.extend_from_slice(order_hash.as_slice());
    buf.extend_from_slice(&nonce.to_be_bytes::<32>());
    buf.extend_from_slice(user.as_slice());
    keccak256(&buf)
}

/// Sign a 32-byte hash as a personal message and split the signature.
pub fn sign_hash(hash: &B256, signer: &PrivateKeySigner) -> Result<Signature> {
    let sig = signer
        .sign_message_sync(hash.as_slice())
        .map_err(|e| TomoxError::Signing(e.to_string()))?;
    let bytes = sig.as_bytes();
    Ok(Signature {
        r: encode_hex(&bytes[..32]),
        s: encode_hex(&bytes[32..64]),
        v: bytes[64],
    })
}
