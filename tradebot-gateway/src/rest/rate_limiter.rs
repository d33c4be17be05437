//! Request-weight rate limiter.
//!
//! Binance budgets REST usage by request weight per minute and reports the
//! weight used so far in the `x-mbx-used-weight-1m` header.

#![allow(clippy::significant_drop_in_scrutinee)]

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::warn;

/// Sliding-window limiter over request weight.
#[derive(Debug)]
pub struct RateLimiter {
    /// Weight allowed per window (0 = unlimited).
    max_weight: u32,
    /// Window duration.
    window: Duration,
    /// Weight spent locally, with the time it was spent.
    entries: Mutex<VecDeque<(Instant, u32)>>,
    /// Last used weight reported by the exchange, with when it was seen.
    reported: Mutex<Option<(u32, Instant)>>,
}

impl RateLimiter {
    /// Creates a limiter allowing `max_weight` per `window`.
    #[must_use]
    pub fn new(max_weight: u32, window: Duration) -> Self {
        Self {
            max_weight,
            window,
            entries: Mutex::new(VecDeque::new()),
            reported: Mutex::new(None),
        }
    }

    /// Creates a limiter with a per-minute budget.
    #[must_use]
    pub fn per_minute(max_weight: u32) -> Self {
        Self::new(max_weight, Duration::from_secs(60))
    }

    /// Returns the weight spent in the current window, whichever is higher
    /// of the local count and the last exchange report.
    #[must_use]
    pub fn used_weight(&self) -> u32 {
        let now = Instant::now();
        let local = {
            let mut entries = self.entries.lock();
            while let Some(&(at, _)) = entries.front() {
                if now.duration_since(at) >= self.window {
                    entries.pop_front();
                } else {
                    break;
                }
            }
            entries.iter().map(|(_, w)| *w).sum::<u32>()
        };
        let reported = match *self.reported.lock() {
            Some((used, at)) if now.duration_since(at) < self.window => used,
            _ => 0,
        };
        local.max(reported)
    }

    /// Returns how long to wait before `weight` more can be spent.
    #[must_use]
    pub fn wait_time(&self, weight: u32) -> Duration {
        if self.max_weight == 0 || self.used_weight().saturating_add(weight) <= self.max_weight {
            return Duration::ZERO;
        }

        let now = Instant::now();
        let oldest_local = self.entries.lock().front().map(|&(at, _)| at);
        let reported_at = self.reported.lock().map(|(_, at)| at);
        let oldest = match (oldest_local, reported_at) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => return Duration::ZERO,
        };
        self.window
            .saturating_sub(now.duration_since(oldest))
            .max(Duration::from_millis(1))
    }

    /// Records `weight` as spent now.
    pub fn record(&self, weight: u32) {
        self.entries.lock().push_back((Instant::now(), weight));
    }

    /// Waits until `weight` can be spent, then records it.
    pub async fn acquire(&self, weight: u32) {
        loop {
            let wait = self.wait_time(weight);
            if wait.is_zero() {
                self.record(weight);
                return;
            }
            warn!(
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                used_weight = self.used_weight(),
                max_weight = self.max_weight,
                "Request weight budget exhausted, waiting"
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Stores the used weight reported by the exchange.
    pub fn update_used_weight(&self, used: u32) {
        *self.reported.lock() = Some((used, Instant::now()));
    }

}
