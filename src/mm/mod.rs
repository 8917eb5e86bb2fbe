pub mod balancer;
pub mod bot;
pub mod config;
pub mod crossing;
pub mod draws;
pub mod ladder;
pub mod params;
pub mod reaper;

use crate::gateway::{ExchangeGateway, PriceSource};
use crate::mm::config::MarketMakerConfig;
use crate::mm::params::MarketParameters;

/// Read-only view of one pair shared by the core steps of an iteration.
#[derive(Clone, Copy)]
pub struct PairContext<'a> {
    pub gateway: &'a dyn ExchangeGateway,
    pub prices: &'a dyn PriceSource,
    pub config: &'a MarketMakerConfig,
    pub params: &'a MarketParameters,
}
