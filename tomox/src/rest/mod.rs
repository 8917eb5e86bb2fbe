pub mod endpoints;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TomoxError};

/// Every relayer response is wrapped as `{"data": ..., "error": ...}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<String>,
}

/// HTTP client wrapper for the TomoX relayer REST API.
#[derive(Debug, Clone)]
pub struct RelayerHttpClient {
    client: Client,
    base_url: String,
}

impl RelayerHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a resource whose `data` may legitimately be null.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).query(query).send().await?;
        unwrap_envelope(resp).await
    }

    /// GET a resource that must carry `data`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        self.get_optional(path, query)
            .await?
            .ok_or_else(|| TomoxError::MissingData(path.to_string()))
    }

    /// POST a JSON body and decode the `data` field of the response.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url).json(body).send().await?;
        unwrap_envelope(resp)
            .await?
            .ok_or_else(|| TomoxError::MissingData(path.to_string()))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

async fn unwrap_envelope<T: DeserializeOwned>(resp: Response) -> Result<Option<T>> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(TomoxError::Http {
            status,
            message: body,
        });
    }

    let body = resp.bytes().await?;
    let envelope: Envelope<T> = serde_json::from_slice(&body)?;
    if let Some(err) = envelope.error {
        return Err(TomoxError::Relayer(err));
    }
    Ok(envelope.data)
}
