//! Relayer client factory.
//!
//! Wraps the `tomox` SDK initialisation into a single
//! [`create_relayer_client`] call and checks that the configured pair is
//! tradable before the loop starts.

use tomox::{Tomox, TomoxConfig};
use tracing::{info, warn};

use crate::error::MmError;
use crate::mm::config::MarketMakerConfig;

/// Connect to the relayer at `relayer_url` with the pair's signing key.
///
/// # Errors
///
/// Returns [`MmError::Tomox`] when the key is invalid or the relayer's
/// exchange address cannot be fetched.
pub async fn create_relayer_client(relayer_url: &str, private_key: &str) -> Result<Tomox, MmError> {
    info!(relayer = relayer_url, "connecting to relayer");
    let client = Tomox::connect(TomoxConfig::new(relayer_url), private_key).await?;
    info!(address = %client.address(), "wallet loaded");
    Ok(client)
}

/// Confirm the relayer lists the configured pair.
///
/// A pair the relayer reports as absent is a configuration error. A failed
/// lookup is only logged; the loop copes with a missing book on its own.
pub async fn verify_pair(client: &Tomox, config: &MarketMakerConfig) -> Result<(), MmError> {
    match client.get_pair(&config.base_token, &config.quote_token).await {
        Ok(Some(pair)) => {
            if pair.active == Some(false) {
                warn!(pair = %pair.pair_name, "pair is registered but inactive");
            } else {
                info!(pair = %pair.pair_name, "pair found");
            }
            Ok(())
        }
        Ok(None) => Err(MmError::Config(format!(
            "relayer has no pair for {} ({}/{})",
            config.pair, config.base_token, config.quote_token
        ))),
        Err(e) => {
            warn!(pair = %config.pair, error = %e, "pair lookup failed, continuing");
            Ok(())
        }
    }
}
