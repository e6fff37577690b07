//! Sliding-window admission control shared by every outbound request
//!
//! Admission is serialized behind a mutex: the prune, count and record steps
//! run as one critical section, so concurrent callers on a multi-threaded
//! runtime can never both take the last free slot. Waiting happens outside
//! the lock and is followed by a fresh check.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

/// Default maximum call-starts per window
pub const DEFAULT_MAX_CALLS: usize = 5;

/// Default window length
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(10_000);

/// Extra wait added on top of the computed delay to absorb clock/latency skew
pub const DEFAULT_BUFFER: Duration = Duration::from_millis(1_000);

pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    buffer: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, window: Duration, buffer: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            window,
            buffer,
            calls: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    /// Suspend until one more call-start fits in the trailing window, then record it.
    pub async fn admit(&self) {
        loop {
            let wait = match self.try_admit(Instant::now()) {
                None => return,
                Some(wait) => wait,
            };
            debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting");
            sleep(wait).await;
        }
    }

    /// Record an admission at `now` if a slot is free; otherwise return how long to wait.
    fn try_admit(&self, now: Instant) -> Option<Duration> {
        let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());

        while let Some(&oldest) = calls.front() {
            if now.duration_since(oldest) >= self.window {
                calls.pop_front();
            } else {
                break;
            }
        }

        if calls.len() < self.max_calls {
            calls.push_back(now);
            return None;
        }

        // History is pushed in admission order, so the front is the oldest
        let oldest = calls.front().copied().unwrap_or(now);
        let elapsed = now.duration_since(oldest);
        Some(self.window.saturating_sub(elapsed) + self.buffer)
    }

    /// Admissions currently inside the window
    #[cfg(test)]
    fn in_flight(&self) -> usize {
        let now = Instant::now();
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls
            .iter()
            .filter(|&&t| now.duration_since(t) < self.window)
            .count()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CALLS, DEFAULT_WINDOW, DEFAULT_BUFFER)
    }
}
