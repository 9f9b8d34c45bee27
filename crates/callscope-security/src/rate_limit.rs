//! In-memory sliding-window rate limiting keyed by client identity.
//!
//! Each client owns a queue of admission instants. A check prunes instants
//! older than the window, rejects when the remaining count has reached the
//! maximum, and otherwise records the new admission. The whole sequence runs
//! while holding the map entry, so concurrent checks for one client are
//! serialized. At most once per window, clients with no live admissions are
//! dropped from the map. State is process-local and resets on restart.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_MAX_REQUESTS: usize = 20;
pub const DEFAULT_WINDOW_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rate limit exceeded (max {limit} requests/{window_secs}s)")]
pub struct RateLimitExceeded {
    pub limit: usize,
    pub window_secs: u64,
}

pub struct RateLimiter {
    buckets: DashMap<String, VecDeque<Instant>>,
    config: RateLimitConfig,
    /// Reference point for `last_sweep_ms`
    epoch: Instant,
    last_sweep_ms: AtomicU64,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
            epoch: Instant::now(),
            last_sweep_ms: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Admit one request for `client_key`, or fail without recording it
    pub fn admit(&self, client_key: &str) -> Result<(), RateLimitExceeded> {
        self.sweep_stale(Instant::now());

        let mut bucket = self.buckets.entry(client_key.to_string()).or_default();
        // Read the clock under the entry lock so each queue stays in time order
        let now = Instant::now();
        self.check_and_record(&mut bucket, now)
    }

    /// Check + record with explicit timestamp
    pub fn admit_at(&self, client_key: &str, now: Instant) -> Result<(), RateLimitExceeded> {
        self.sweep_stale(now);

        let mut bucket = self.buckets.entry(client_key.to_string()).or_default();
        self.check_and_record(&mut bucket, now)
    }

    /// Number of clients currently holding state
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    fn check_and_record(
        &self,
        bucket: &mut VecDeque<Instant>,
        now: Instant,
    ) -> Result<(), RateLimitExceeded> {
        let cfg = self.config;

        prune_window(bucket, now, cfg.window);
        if bucket.len() >= cfg.max_requests {
            return Err(RateLimitExceeded {
                limit: cfg.max_requests,
                window_secs: cfg.window.as_secs(),
            });
        }

        bucket.push_back(now);
        Ok(())
    }

    /// Drop clients whose admissions have all expired, at most once per window.
    /// Must not be called while holding an entry guard.
    fn sweep_stale(&self, now: Instant) {
        let elapsed_ms = now.saturating_duration_since(self.epoch).as_millis() as u64;
        let window_ms = self.config.window.as_millis() as u64;
        let last = self.last_sweep_ms.load(Ordering::Relaxed);

        if elapsed_ms.saturating_sub(last) < window_ms.max(1) {
            return;
        }
        if self
            .last_sweep_ms
            .compare_exchange(last, elapsed_ms, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            // Another caller is sweeping
            return;
        }

        let window = self.config.window;
        self.buckets.retain(|_, bucket| {
            prune_window(bucket, now, window);
            !bucket.is_empty()
        });
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    deque.retain(|&at| now.saturating_duration_since(at) <= window);
}
