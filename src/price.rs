//! XT reference price source and account balance query.
//!
//! The ticker is polled over REST once per use; there is no stream. Failures
//! never escape [`PriceSource::latest_price`]: they are logged and reported
//! as an unavailable price.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, warn};

use crate::error::MmError;
use crate::gateway::PriceSource;

/// Client-side timeout for every XT request.
const HTTP_TIMEOUT: Duration = Duration::from_millis(2500);

#[derive(Debug, Deserialize)]
struct TickerMsg {
    price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct BalanceMsg {
    #[serde(default)]
    data: Option<BTreeMap<String, AssetBalance>>,
    #[serde(default)]
    info: Option<String>,
}

/// Spot balance of one asset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetBalance {
    pub available: Decimal,
    pub freeze: Decimal,
}

/// REST client for the XT public ticker and signed account endpoints.
#[derive(Debug, Clone)]
pub struct XtClient {
    client: reqwest::Client,
    base_url: String,
    access_key: Option<String>,
    secret_key: Option<String>,
}

impl XtClient {
    pub fn new(
        base_url: &str,
        access_key: Option<String>,
        secret_key: Option<String>,
    ) -> Result<Self, MmError> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
            secret_key,
        })
    }

    /// Last traded price of `market` (e.g. `"btc_usdt"`).
    pub async fn get_latest_price(&self, market: &str) -> Result<Decimal, MmError> {
        let url = format!("{}/data/api/v1/getTicker", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("market", market)])
            .send()
            .await?
            .error_for_status()?;
        let ticker: TickerMsg = resp.json().await?;
        ticker
            .price
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| MmError::PriceUnavailable(market.to_string()))
    }

    /// Spot balances keyed by lower-case asset symbol.
    pub async fn get_balance(&self) -> Result<BTreeMap<String, AssetBalance>, MmError> {
        let (access_key, secret_key) = match (&self.access_key, &self.secret_key) {
            (Some(a), Some(s)) => (a, s),
            _ => {
                return Err(MmError::Config(
                    "XT access key and secret key are required for balance queries".into(),
                ))
            }
        };

        let mut params = vec![
            ("accessKey", access_key.clone()),
            ("nonce", epoch_ms().to_string()),
        ];
        let signature = sign_params(&params, secret_key)?;
        params.push(("signature", signature));

        let url = format!("{}/trade/api/v1/getBalance", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        let msg: BalanceMsg = resp.json().await?;
        msg.data.ok_or_else(|| {
            MmError::Config(format!(
                "balance query rejected: {}",
                msg.info.unwrap_or_else(|| "no data".into())
            ))
        })
    }
}

#[async_trait]
impl PriceSource for XtClient {
    async fn latest_price(&self, symbol: &str) -> Option<Decimal> {
        match self.get_latest_price(symbol).await {
            Ok(price) => {
                debug!(symbol, %price, "reference price");
                Some(price)
            }
            Err(e) => {
                warn!(symbol, error = %e, "reference price unavailable");
                None
            }
        }
    }
}

/// Hex HMAC-SHA256 over `k1=v1&k2=v2...` in the given order.
pub fn sign_params(params: &[(&str, String)], secret_key: &str) -> Result<String, MmError> {
    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut mac = Hmac::<Sha256>::new_from_slice(secret_key.as_bytes())
        .map_err(|e| MmError::Config(format!("invalid XT secret key: {e}")))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_sign_params_deterministic_and_keyed() {
        let params = vec![("accessKey", "abc".to_string()), ("nonce", "1".to_string())];
        let sig = sign_params(&params, "secret").unwrap();
        assert_eq!(sig.len(), 64);
        assert_eq!(sig, sign_params(&params, "secret").unwrap());
        assert_ne!(sig, sign_params(&params, "other").unwrap());
    }

    #[tokio::test]
    async fn test_latest_price_parses_number_and_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/api/v1/getTicker"))
            .and(query_param("market", "btc_usdt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"price": 61000})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/api/v1/getTicker"))
            .and(query_param("market", "tomo_usdt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"price": "0.3512"})))
            .mount(&server)
            .await;

        let xt = XtClient::new(&server.uri(), None, None).unwrap();
        assert_eq!(xt.latest_price("btc_usdt").await, Some(dec!(61000)));
        assert_eq!(xt.latest_price("tomo_usdt").await, Some(dec!(0.3512)));
    }

    #[tokio::test]
    async fn test_latest_price_failure_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/api/v1/getTicker"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let xt = XtClient::new(&server.uri(), None, None).unwrap();
        assert_eq!(xt.latest_price("btc_usdt").await, None);
    }

    #[tokio::test]
    async fn test_latest_price_zero_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/api/v1/getTicker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"price": 0})))
            .mount(&server)
            .await;

        let xt = XtClient::new(&server.uri(), None, None).unwrap();
        assert_eq!(xt.latest_price("btc_usdt").await, None);
    }

    #[tokio::test]
    async fn test_balance_requires_keys() {
        let xt = XtClient::new("http://127.0.0.1:1", None, None).unwrap();
        assert!(matches!(xt.get_balance().await, Err(MmError::Config(_))));
    }

    #[tokio::test]
    async fn test_balance_signed_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trade/api/v1/getBalance"))
            .and(query_param("accessKey", "ak"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 200,
                "data": {
                    "usdt": {"available": "150", "freeze": "0"},
                    "btc": {"available": "0.001", "freeze": "0"}
                }
            })))
            .mount(&server)
            .await;

        let xt = XtClient::new(&server.uri(), Some("ak".into()), Some("sk".into())).unwrap();
        let balances = xt.get_balance().await.unwrap();
        assert_eq!(balances["usdt"].available, dec!(150));
        assert_eq!(balances["btc"].available, dec!(0.001));

        let requests = server.received_requests().await.unwrap();
        let query: BTreeMap<_, _> = requests[0].url.query_pairs().into_owned().collect();
        let expected = sign_params(
            &[("accessKey", "ak".to_string()), ("nonce", query["nonce"].clone())],
            "sk",
        )
        .unwrap();
        assert_eq!(query["signature"], expected);
    }
}
