//! Canned `Fetch` implementation for service tests

use crate::services::Fetch;
use crate::types::{Endpoint, Result, WarStatusError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct StubFetcher {
    payloads: HashMap<Endpoint, Value>,
    failing: HashSet<Endpoint>,
    panicking: HashSet<Endpoint>,
    calls: AtomicUsize,
}

impl StubFetcher {
    /// Every endpoint answers with an empty list (`{}` for the war summary)
    pub fn new() -> Self {
        let payloads = Endpoint::ALL
            .iter()
            .map(|&e| {
                let empty = if e == Endpoint::War { json!({}) } else { json!([]) };
                (e, empty)
            })
            .collect();
        Self {
            payloads,
            failing: HashSet::new(),
            panicking: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_payload(mut self, endpoint: Endpoint, payload: Value) -> Self {
        self.payloads.insert(endpoint, payload);
        self
    }

    /// Endpoint answers HTTP 503
    pub fn failing(mut self, endpoint: Endpoint) -> Self {
        self.failing.insert(endpoint);
        self
    }

    /// Endpoint handler panics (pipeline defect)
    pub fn panicking(mut self, endpoint: Endpoint) -> Self {
        self.panicking.insert(endpoint);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking.contains(&endpoint) {
            panic!("stub handler for {} exploded", endpoint);
        }
        if self.failing.contains(&endpoint) {
            return Err(WarStatusError::Network {
                endpoint: endpoint.path().to_string(),
                status: 503,
            });
        }
        Ok(self.payloads.get(&endpoint).cloned().unwrap_or(Value::Null))
    }
}
