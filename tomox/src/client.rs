use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use tracing::{debug, info};

use crate::actions::{build_signed_cancel, build_signed_order, signer_from_private_key};
use crate::config::TomoxConfig;
use crate::error::{Result, TomoxError};
use crate::rest::RelayerHttpClient;
use crate::types::*;
use crate::utils::parse_address;

/// Decimals assumed for tokens whose metadata omits them.
pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

/// Authenticated client for one account on a TomoX relayer.
pub struct Tomox {
    /// HTTP client.
    pub http_client: RelayerHttpClient,
    /// Exchange (relayer coinbase) address orders are signed against.
    pub exchange_address: Address,
    signer: PrivateKeySigner,
    /// Token address (lower-case) -> decimals.
    decimals_cache: Mutex<HashMap<String, u32>>,
}

impl Tomox {
    /// Build a client for `private_key`, fetching the exchange address from
    /// the relayer unless it is configured.
    pub async fn connect(config: TomoxConfig, private_key: &str) -> Result<Self> {
        let http_client = RelayerHttpClient::new(&config.relayer_url, config.timeout)?;
        let signer = signer_from_private_key(private_key)?;

        let exchange_address = match config.exchange_address.as_deref() {
            Some(addr) => parse_address(addr)?,
            None => parse_address(&http_client.get_info().await?.exchange_address)?,
        };

        info!(
            relayer = http_client.base_url(),
            exchange = %exchange_address,
            address = %signer.address(),
            "relayer connected"
        );

        Ok(Self {
            http_client,
            exchange_address,
            signer,
            decimals_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Address of the signing account.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    fn address_string(&self) -> String {
        self.address().to_checksum(None)
    }

    // --- Market data ---

    /// Order book snapshot, `None` if the relayer has no book for the pair.
    pub async fn get_order_book(&self, base_token: &str, quote_token: &str) -> Result<Option<OrderBook>> {
        self.http_client.get_order_book(base_token, quote_token).await
    }

    /// Open orders of this account on a pair.
    pub async fn get_orders(&self, base_token: &str, quote_token: &str) -> Result<Vec<OrderInfo>> {
        self.http_client
            .get_orders(&self.address_string(), base_token, quote_token)
            .await
    }

    /// Registered pair for the given tokens.
    pub async fn get_pair(&self, base_token: &str, quote_token: &str) -> Result<Option<PairInfo>> {
        self.http_client.get_pair(base_token, quote_token).await
    }

    /// Token metadata (uncached).
    pub async fn get_token_info(&self, token: &str) -> Result<TokenInfo> {
        self.http_client.get_token(token).await
    }

    /// Token decimals, cached for the lifetime of the client.
    pub async fn token_decimals(&self, token: &str) -> Result<u32> {
        let key = token.to_lowercase();
        if let Some(d) = self.cached_decimals(&key) {
            return Ok(d);
        }
        let decimals = self
            .get_token_info(token)
            .await?
            .decimals
            .unwrap_or(DEFAULT_TOKEN_DECIMALS);
        if let Ok(mut cache) = self.decimals_cache.lock() {
            cache.insert(key, decimals);
        }
        Ok(decimals)
    }

    fn cached_decimals(&self, key: &str) -> Option<u32> {
        self.decimals_cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(key).copied())
    }

    /// Next order nonce of this account.
    pub async fn get_nonce(&self) -> Result<u64> {
        self.http_client.get_order_nonce(&self.address_string()).await
    }

    // --- Orders ---

    /// Sign and submit a single order.
    pub async fn create_order(&self, order: &NewOrder) -> Result<PlacedOrder> {
        let mut orders = self.create_many_orders(std::slice::from_ref(order)).await?;
        if orders.len() != 1 {
            return Err(TomoxError::Validation(format!(
                "expected 1 order result, got {}",
                orders.len()
            )));
        }
        Ok(orders.remove(0))
    }

    /// Sign and submit a batch of orders in one request.
    ///
    /// Orders without a nonce get consecutive nonces starting at the
    /// relayer's next nonce. Results come back in submission order.
    pub async fn create_many_orders(&self, orders: &[NewOrder]) -> Result<Vec<PlacedOrder>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let mut next_nonce = if orders.iter().any(|o| o.nonce.is_none()) {
            Some(self.get_nonce().await?)
        } else {
            None
        };

        let mut signed = Vec::with_capacity(orders.len());
        for order in orders {
            let base_decimals = self.token_decimals(&order.base_token).await?;
            let quote_decimals = self.token_decimals(&order.quote_token).await?;

            let mut order = order.clone();
            if order.nonce.is_none() {
                if let Some(n) = next_nonce.as_mut() {
                    order.nonce = Some(*n);
                    *n += 1;
                }
            }
            signed.push(build_signed_order(
                &order,
                self.exchange_address,
                &self.signer,
                base_decimals,
                quote_decimals,
            )?);
        }

        debug!(count = signed.len(), "submitting orders");
        if signed.len() == 1 {
            Ok(vec![self.http_client.post_order(&signed[0]).await?])
        } else {
            self.http_client.post_orders(&signed).await
        }
    }

    /// Cancel one order using an explicit nonce.
    pub async fn cancel_order(&self, hash: &str, nonce: u64) -> Result<()> {
        let cancel = build_signed_cancel(hash, nonce, &self.signer)?;
        self.http_client.post_cancel(&cancel).await?;
        Ok(())
    }

    /// Cancel several orders in one request, with sequential nonces.
    pub async fn cancel_many_orders(&self, hashes: &[String]) -> Result<()> {
        if hashes.is_empty() {
            return Ok(());
        }
        let nonce = self.get_nonce().await?;
        let cancels = hashes
            .iter()
            .zip(nonce..)
            .map(|(hash, n)| build_signed_cancel(hash, n, &self.signer))
            .collect::<Result<Vec<_>>>()?;
        self.http_client.post_cancels(&cancels).await?;
        Ok(())
    }
}
