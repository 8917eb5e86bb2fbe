//! Async client for the TomoX relayer REST API.
//!
//! Covers what a market maker needs: order book and open-order queries,
//! token and pair metadata, nonce lookup, and signed order creation and
//! cancellation (single and batched).

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod rest;
pub mod types;
pub mod utils;

// ---- Top-level re-exports for ergonomic usage ----

pub use client::{Tomox, DEFAULT_TOKEN_DECIMALS};
pub use config::TomoxConfig;
pub use error::{Result, TomoxError};
pub use rest::RelayerHttpClient;

pub use types::{
    BookLevel, ExchangeInfo, NewOrder, OrderBook, OrderInfo, OrderStatus, OrderType, PairInfo,
    PlacedOrder, Side, SignedCancel, SignedOrder, Signature, TokenInfo,
};
