//! Fixed-window request counting per client key.
//!
//! The limiter is an owned component of the suggestion engine rather than
//! process-global state, so tests construct their own instances and drive
//! the clock explicitly through `admit`. Entries are kept for the process
//! lifetime; with IP-derived keys the map grows with the distinct client
//! population, which is acceptable for this advisory, non-security use.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Counter state for one client key.
struct Window {
    count: u32,
    started: Instant,
}

/// Fixed-window rate limiter keyed by client identity.
pub struct RateLimiter {
    quota: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// Creates a limiter admitting `quota` requests per `window` per key.
    #[must_use]
    pub fn new(quota: u32, window: Duration) -> Self {
        Self {
            quota,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Admits or denies a request from `key` at time `now`.
    ///
    /// Starts a fresh window (and counts the request) when the previous
    /// window has expired; denies without counting when the quota within
    /// the current window is exhausted. Concurrent callers serialize on
    /// the internal mutex, so increments never race.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn admit(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");

        let slot = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(slot.started) >= self.window {
            slot.count = 0;
            slot.started = now;
        }

        if slot.count < self.quota {
            slot.count += 1;
            true
        } else {
            false
        }
    }
}
