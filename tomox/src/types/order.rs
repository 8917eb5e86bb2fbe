use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderStatus, OrderType, Side};

/// A limit order as the caller describes it: human-readable decimal strings.
///
/// `price` and `amount` are already formatted to the pair's display
/// precision. `nonce` is assigned by the client when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub base_token: String,
    pub quote_token: String,
    pub price: String,
    pub amount: String,
    pub side: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

/// Signed order payload posted to `/api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrder {
    pub exchange_address: String,
    pub user_address: String,
    pub base_token: String,
    pub quote_token: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Integer amount in base-token units.
    pub amount: String,
    /// Integer price in quote-token units.
    pub pricepoint: String,
    pub nonce: String,
    pub hash: String,
    pub signature: Signature,
}

/// Secp256k1 signature split into its components, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub r: String,
    pub s: String,
    pub v: u8,
}

/// Signed cancellation payload posted to `/api/orders/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedCancel {
    pub order_hash: String,
    pub user_address: String,
    pub nonce: String,
    pub hash: String,
    pub signature: Signature,
}

/// Result of creating one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub hash: String,
    #[serde(with = "nonce_format")]
    pub nonce: u64,
}

/// An open order owned by the configured account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    pub hash: String,
    pub side: Side,
    pub pricepoint: Decimal,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub filled_amount: Decimal,
    #[serde(default = "default_status")]
    pub status: OrderStatus,
    #[serde(default)]
    pub base_token: String,
    #[serde(default)]
    pub quote_token: String,
}

fn default_status() -> OrderStatus {
    OrderStatus::Open
}

/// Relayers report nonces either as JSON numbers or as decimal strings.
pub mod nonce_format {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(nonce: &u64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(*nonce)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        struct NonceVisitor;

        impl Visitor<'_> for NonceVisitor {
            type Value = u64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a nonce as an integer or decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
                u64::try_from(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
                v.trim().parse().map_err(E::custom)
            }
        }

        d.deserialize_any(NonceVisitor)
    }
}
