//! Sliding window of accepted sends, bucketed per second

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window used for `sent_last_24_hours`
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Sends that landed in one whole second since the window's origin
#[derive(Debug, Clone, Copy)]
struct Bucket {
    second: u64,
    count: u64,
}

/// Accepted send counts, oldest second first. Holds at most one bucket per
/// second of the window no matter how many sends arrive.
#[derive(Debug, Clone)]
pub struct SendWindow {
    origin: Instant,
    buckets: VecDeque<Bucket>,
    window_secs: u64,
}

impl SendWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            origin: Instant::now(),
            buckets: VecDeque::new(),
            window_secs: window.as_secs().max(1),
        }
    }

    /// Record a send and drop buckets that fell out of the window
    pub fn record(&mut self, at: Instant) {
        let second = self.second_of(at);
        self.evict(second);

        match self.buckets.back_mut() {
            Some(bucket) if bucket.second == second => {
                bucket.count += 1;
                return;
            }
            _ => {}
        }
        self.buckets.push_back(Bucket { second, count: 1 });
    }

    /// Number of sends inside the window ending at `now`
    pub fn count_at(&self, now: Instant) -> u64 {
        self.count_within(now, Duration::from_secs(self.window_secs))
    }

    /// Sends within the last `span` seconds (whole seconds, at least one) before `now`
    pub fn count_within(&self, now: Instant, span: Duration) -> u64 {
        let now_second = self.second_of(now);
        let span_secs = span.as_secs().max(1);
        self.buckets
            .iter()
            .rev()
            .take_while(|b| now_second.saturating_sub(b.second) < span_secs)
            .map(|b| b.count)
            .sum()
    }

    fn second_of(&self, at: Instant) -> u64 {
        at.saturating_duration_since(self.origin).as_secs()
    }

    fn evict(&mut self, now_second: u64) {
        while let Some(oldest) = self.buckets.front() {
            if now_second.saturating_sub(oldest.second) >= self.window_secs {
                self.buckets.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for SendWindow {
    fn default() -> Self {
        Self::new(DAY)
    }
}
