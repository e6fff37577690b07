//! Settle-all fan-out over the seven upstream endpoints

use crate::services::{Fetch, RateLimiter};
use crate::types::{Endpoint, Result, WarStatusError};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Settled result of one endpoint call: fulfilled payload or rejection
pub type Outcome = Result<Value>;

/// Fixed-size outcome table keyed by endpoint, independent of completion order
pub struct EndpointOutcomes {
    slots: [Option<Outcome>; Endpoint::COUNT],
}

impl EndpointOutcomes {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn insert(&mut self, endpoint: Endpoint, outcome: Outcome) {
        self.slots[endpoint.index()] = Some(outcome);
    }

    /// Remove and return the outcome for `endpoint`
    pub fn take(&mut self, endpoint: Endpoint) -> Option<Outcome> {
        self.slots[endpoint.index()].take()
    }

    /// Endpoints whose call rejected
    pub fn rejected(&self) -> Vec<Endpoint> {
        Endpoint::ALL
            .iter()
            .copied()
            .filter(|e| matches!(self.slots[e.index()], Some(Err(_))))
            .collect()
    }

    #[cfg(test)]
    fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

impl Default for EndpointOutcomes {
    fn default() -> Self {
        Self::new()
    }
}

/// Issues one rate-limited fetch per endpoint concurrently and waits for all of them
pub struct Aggregator {
    fetcher: Arc<dyn Fetch>,
    limiter: Arc<RateLimiter>,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn Fetch>, limiter: Arc<RateLimiter>) -> Self {
        Self { fetcher, limiter }
    }

    /// Fan out, then fan in once every call has settled.
    ///
    /// Endpoint rejections are recorded in the table and never cut the batch
    /// short. Only a crashed fetch task surfaces as `Orchestration`, after all
    /// siblings have settled.
    pub async fn collect(&self) -> Result<EndpointOutcomes> {
        let handles: Vec<_> = Endpoint::ALL
            .iter()
            .map(|&endpoint| {
                let fetcher = Arc::clone(&self.fetcher);
                let limiter = Arc::clone(&self.limiter);
                let handle = tokio::spawn(async move {
                    limiter.admit().await;
                    let started = Instant::now();
                    let outcome = fetcher.fetch(endpoint).await;
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    match &outcome {
                        Ok(_) => info!(%endpoint, elapsed_ms, "endpoint fulfilled"),
                        Err(e) => warn!(%endpoint, elapsed_ms, error = %e, "endpoint rejected"),
                    }
                    outcome
                });
                (endpoint, handle)
            })
            .collect();

        let mut outcomes = EndpointOutcomes::new();
        let mut crashed = None;
        for (endpoint, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.insert(endpoint, outcome),
                Err(e) => {
                    if crashed.is_none() {
                        crashed = Some(format!("fetch task for {} failed: {}", endpoint, e));
                    }
                }
            }
        }

        match crashed {
            Some(reason) => Err(WarStatusError::Orchestration(reason)),
            None => Ok(outcomes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stub::StubFetcher;
    use serde_json::json;
    use std::time::Duration;

    fn permissive_limiter() -> Arc<RateLimiter> {
        Arc::new(RateLimiter::new(100, Duration::from_secs(1), Duration::ZERO))
    }

    // ========== EndpointOutcomes ==========

    #[test]
    fn test_outcomes_keyed_by_endpoint() {
        let mut outcomes = EndpointOutcomes::new();
        outcomes.insert(Endpoint::Planets, Ok(json!([1])));
        outcomes.insert(
            Endpoint::War,
            Err(WarStatusError::Transport("timeout".into())),
        );

        assert_eq!(outcomes.rejected(), vec![Endpoint::War]);
        assert!(!outcomes.is_complete());
        assert_eq!(outcomes.take(Endpoint::Planets).unwrap().unwrap(), json!([1]));
        assert!(outcomes.take(Endpoint::Planets).is_none());
    }

    // ========== collect() ==========

    #[tokio::test]
    async fn test_collect_calls_every_endpoint_once() {
        let stub = Arc::new(StubFetcher::new());
        let aggregator = Aggregator::new(stub.clone(), permissive_limiter());

        let outcomes = aggregator.collect().await.unwrap();

        assert!(outcomes.is_complete());
        assert!(outcomes.rejected().is_empty());
        assert_eq!(stub.calls(), Endpoint::COUNT);
    }

    #[tokio::test]
    async fn test_collect_isolates_rejections() {
        let stub = Arc::new(
            StubFetcher::new()
                .failing(Endpoint::War)
                .failing(Endpoint::Dispatches)
                .failing(Endpoint::SteamNews)
                .with_payload(Endpoint::Planets, json!([{"index": 1}])),
        );
        let aggregator = Aggregator::new(stub.clone(), permissive_limiter());

        let mut outcomes = aggregator.collect().await.unwrap();

        assert!(outcomes.is_complete());
        assert_eq!(
            outcomes.rejected(),
            vec![Endpoint::War, Endpoint::Dispatches, Endpoint::SteamNews]
        );
        assert_eq!(
            outcomes.take(Endpoint::Planets).unwrap().unwrap(),
            json!([{"index": 1}])
        );
        assert_eq!(stub.calls(), Endpoint::COUNT);
    }

    #[tokio::test]
    async fn test_collect_crashed_task_is_orchestration_error() {
        let stub = Arc::new(StubFetcher::new().panicking(Endpoint::Campaigns));
        let aggregator = Aggregator::new(stub.clone(), permissive_limiter());

        let err = aggregator.collect().await.err().unwrap();

        assert!(matches!(err, WarStatusError::Orchestration(_)));
        // Siblings still ran to completion
        assert_eq!(stub.calls(), Endpoint::COUNT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_waits_for_rate_limited_endpoints() {
        let stub = Arc::new(StubFetcher::new());
        let aggregator = Aggregator::new(stub.clone(), Arc::new(RateLimiter::default()));
        let start = tokio::time::Instant::now();

        let outcomes = aggregator.collect().await.unwrap();

        // 7 endpoints against 5 slots: the last two wait out the window
        assert!(outcomes.is_complete());
        assert!(tokio::time::Instant::now().duration_since(start) >= Duration::from_secs(11));
    }
}
