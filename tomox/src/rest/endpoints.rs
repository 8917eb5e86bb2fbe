use serde::Deserialize;

use crate::error::Result;
use crate::rest::RelayerHttpClient;
use crate::types::*;

#[derive(Deserialize)]
#[serde(transparent)]
struct NonceValue(#[serde(with = "crate::types::nonce_format")] u64);

impl RelayerHttpClient {
    // --- Relayer ---

    /// GET /api/info - Exchange address and fee.
    pub async fn get_info(&self) -> Result<ExchangeInfo> {
        self.get("/api/info", &[]).await
    }

    /// GET /api/pair - Registered pair for a token combination, if any.
    pub async fn get_pair(&self, base_token: &str, quote_token: &str) -> Result<Option<PairInfo>> {
        self.get_optional(
            "/api/pair",
            &[("baseToken", base_token), ("quoteToken", quote_token)],
        )
        .await
    }

    /// GET /api/tokens/{address} - Token metadata.
    pub async fn get_token(&self, address: &str) -> Result<TokenInfo> {
        self.get(&format!("/api/tokens/{address}"), &[]).await
    }

    // --- Market data ---

    /// GET /api/orderbook - Aggregated book; `None` until the pair has one.
    pub async fn get_order_book(
        &self,
        base_token: &str,
        quote_token: &str,
    ) -> Result<Option<OrderBook>> {
        self.get_optional(
            "/api/orderbook",
            &[("baseToken", base_token), ("quoteToken", quote_token)],
        )
        .await
    }

    // --- Orders ---

    /// GET /api/orders - Open orders of `address` on a pair.
    pub async fn get_orders(
        &self,
        address: &str,
        base_token: &str,
        quote_token: &str,
    ) -> Result<Vec<OrderInfo>> {
        let orders: Option<Vec<OrderInfo>> = self
            .get_optional(
                "/api/orders",
                &[
                    ("address", address),
                    ("baseToken", base_token),
                    ("quoteToken", quote_token),
                ],
            )
            .await?;
        Ok(orders.unwrap_or_default())
    }

    /// GET /api/orders/nonce - Next order nonce for `address`.
    pub async fn get_order_nonce(&self, address: &str) -> Result<u64> {
        let nonce: NonceValue = self
            .get("/api/orders/nonce", &[("address", address)])
            .await?;
        Ok(nonce.0)
    }

    /// POST /api/orders - Submit one signed order.
    pub async fn post_order(&self, order: &SignedOrder) -> Result<PlacedOrder> {
        self.post("/api/orders", order).await
    }

    /// POST /api/orders/bulk - Submit signed orders; results are positional.
    pub async fn post_orders(&self, orders: &[SignedOrder]) -> Result<Vec<PlacedOrder>> {
        self.post("/api/orders/bulk", orders).await
    }

    /// POST /api/orders/cancel - Submit one signed cancellation.
    pub async fn post_cancel(&self, cancel: &SignedCancel) -> Result<serde_json::Value> {
        self.post("/api/orders/cancel", cancel).await
    }

    /// POST /api/orders/cancel/bulk - Submit signed cancellations.
    pub async fn post_cancels(&self, cancels: &[SignedCancel]) -> Result<serde_json::Value> {
        self.post("/api/orders/cancel/bulk", cancels).await
    }
}
