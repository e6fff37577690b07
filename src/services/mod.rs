//! Services for fetching, normalizing and composing war status data

pub mod aggregator;
pub mod clock;
pub mod config;
pub mod fallback;
pub mod fetcher;
pub mod filters;
pub mod normalizer;
pub mod orchestrator;
pub mod payload;
pub mod rate_limiter;

#[cfg(test)]
pub(crate) mod stub;

pub use aggregator::{Aggregator, EndpointOutcomes};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, Overrides};
pub use fetcher::{Fetch, HttpFetcher};
pub use orchestrator::Orchestrator;
pub use rate_limiter::RateLimiter;

use std::sync::Arc;

/// Wire up the production pipeline from a config
pub fn build_orchestrator(config: &Config) -> crate::types::Result<Orchestrator> {
    config.validate()?;
    let limiter = Arc::new(RateLimiter::new(
        config.max_calls,
        config.window(),
        config.buffer(),
    ));
    let fetcher = Arc::new(HttpFetcher::new(config)?);
    Ok(Orchestrator::new(
        Aggregator::new(fetcher, limiter),
        Arc::new(SystemClock),
    ))
}
