use std::time::Duration;

/// Configuration for the TomoX relayer client.
#[derive(Debug, Clone)]
pub struct TomoxConfig {
    /// Base URL of the relayer (e.g. `https://dex.tomochain.com`).
    pub relayer_url: String,
    /// Exchange (relayer coinbase) address; fetched from `/api/info` if not set.
    pub exchange_address: Option<String>,
    /// Client-side timeout applied to every HTTP request.
    pub timeout: Duration,
}

impl TomoxConfig {
    pub fn new(relayer_url: impl Into<String>) -> Self {
        Self {
            relayer_url: relayer_url.into(),
            exchange_address: None,
            timeout: Duration::from_secs(10),
        }
    }
}
