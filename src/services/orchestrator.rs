//! Composes one `AggregateSnapshot` per polling cycle
//!
//! Aggregator fan-out, then each endpoint outcome independently goes
//! through its normalizer and filter, or is replaced by fallback data when
//! it rejected.

use crate::services::aggregator::{EndpointOutcomes, Outcome};
use crate::services::{fallback, filters, normalizer, Aggregator, Clock};
use crate::types::{AggregateSnapshot, Endpoint, Result, WarStatusError};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

pub struct Orchestrator {
    aggregator: Aggregator,
    clock: Arc<dyn Clock>,
    last_stamp: Mutex<Option<DateTime<Utc>>>,
}

impl Orchestrator {
    pub fn new(aggregator: Aggregator, clock: Arc<dyn Clock>) -> Self {
        Self {
            aggregator,
            clock,
            last_stamp: Mutex::new(None),
        }
    }

    /// Run one full cycle.
    ///
    /// Endpoint failures never fail this call; only a pipeline defect
    /// returns `WarStatusError::Orchestration`.
    pub async fn snapshot(&self) -> Result<AggregateSnapshot> {
        let outcomes = self.aggregator.collect().await.inspect_err(|e| {
            error!(error = %e, "aggregation failed");
        })?;

        let now = self.stamp();
        let rejected = outcomes.rejected();

        let snapshot = tokio::task::spawn_blocking(move || assemble(outcomes, now))
            .await
            .map_err(|e| WarStatusError::Orchestration(format!("snapshot assembly failed: {}", e)))
            .and_then(|r| r)
            .inspect_err(|e| error!(error = %e, "snapshot assembly failed"))?;

        info!(
            fallback_categories = rejected.len(),
            planets = snapshot.planets.len(),
            dispatches = snapshot.dispatches.len(),
            "snapshot ready"
        );
        Ok(snapshot)
    }

    /// Current time, never earlier than the previous stamp
    fn stamp(&self) -> DateTime<Utc> {
        let now = self.clock.now();
        let mut last = self.last_stamp.lock().unwrap_or_else(|e| e.into_inner());
        let stamp = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

/// Apply the per-category pipeline to every endpoint outcome
pub fn assemble(mut outcomes: EndpointOutcomes, now: DateTime<Utc>) -> Result<AggregateSnapshot> {
    let mut snapshot = AggregateSnapshot::empty(now);

    for endpoint in Endpoint::ALL {
        let outcome = outcomes.take(endpoint).ok_or_else(|| {
            WarStatusError::Orchestration(format!("no outcome recorded for {}", endpoint))
        })?;
        apply(&mut snapshot, endpoint, outcome, now);
    }

    Ok(snapshot)
}

fn apply(snapshot: &mut AggregateSnapshot, endpoint: Endpoint, outcome: Outcome, now: DateTime<Utc>) {
    let payload = match outcome {
        Ok(payload) => payload,
        Err(e) => {
            warn!(%endpoint, error = %e, "using fallback data");
            substitute(snapshot, endpoint, now);
            return;
        }
    };

    match endpoint {
        Endpoint::War => snapshot.war_stats = normalizer::war_statistics(&payload),
        Endpoint::Assignments => snapshot.assignments = normalizer::assignments(&payload),
        Endpoint::Planets => snapshot.planets = normalizer::planets(&payload),
        Endpoint::Campaigns => snapshot.campaigns = normalizer::campaigns(&payload),
        Endpoint::Dispatches => {
            snapshot.dispatches = filters::recent_dispatches(normalizer::dispatches(&payload), now)
        }
        Endpoint::SteamNews => {
            snapshot.steam_news = filters::recent_news(normalizer::steam_news(&payload), now)
        }
        Endpoint::SpaceStations => snapshot.space_stations = normalizer::space_stations(&payload),
    }
}

fn substitute(snapshot: &mut AggregateSnapshot, endpoint: Endpoint, now: DateTime<Utc>) {
    match endpoint {
        Endpoint::War => snapshot.war_stats = fallback::war_statistics(),
        Endpoint::Assignments => snapshot.assignments = fallback::assignments(now),
        Endpoint::Planets => snapshot.planets = fallback::planets(),
        Endpoint::Campaigns => snapshot.campaigns = fallback::campaigns(),
        Endpoint::Dispatches => snapshot.dispatches = fallback::dispatches(now),
        Endpoint::SteamNews => snapshot.steam_news = fallback::steam_news(now),
        Endpoint::SpaceStations => snapshot.space_stations = fallback::space_stations(now),
    }
}

/// Normalize a payload that arrived outside the fan-out (e.g. a saved response)
pub fn normalize_single(endpoint: Endpoint, payload: Value, now: DateTime<Utc>) -> AggregateSnapshot {
    let mut snapshot = AggregateSnapshot::empty(now);
    apply(&mut snapshot, endpoint, Ok(payload), now);
    snapshot
}
