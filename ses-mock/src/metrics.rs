//! Send counters with Prometheus export
//!
//! Kept apart from the engine's own statistics. One instance is built at
//! startup and shared as `Arc<SendMetrics>`; tests build their own.

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::time::Instant;

/// Accepted sends for a single UTC calendar date
#[derive(Debug, Clone, Copy)]
struct DailyBucket {
    date: NaiveDate,
    count: u64,
}

#[derive(Debug, Default)]
struct Counters {
    /// Only the most recent date is kept; a new date starts a fresh bucket
    daily: Option<DailyBucket>,
    total: u64,
    throttled: u64,
    failed: u64,
}

impl Counters {
    fn daily_count_on(&self, date: NaiveDate) -> u64 {
        match self.daily {
            Some(bucket) if bucket.date == date => bucket.count,
            _ => 0,
        }
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub date: NaiveDate,
    pub daily_count: u64,
    pub total_count: u64,
    pub throttled_count: u64,
    pub failed_count: u64,
}

/// Process-wide send counters
pub struct SendMetrics {
    counters: RwLock<Counters>,
    start_time: Instant,
}

impl SendMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(Counters::default()),
            start_time: Instant::now(),
        }
    }

    /// Count an accepted send for today
    pub fn increment_daily(&self) {
        self.increment_daily_on(today());
    }

    /// Count an accepted send for the given date
    pub fn increment_daily_on(&self, date: NaiveDate) {
        let mut counters = self.counters.write();
        let count = counters.daily_count_on(date) + 1;
        counters.daily = Some(DailyBucket { date, count });
        counters.total += 1;
    }

    /// Increment throttled counter
    pub fn increment_throttled(&self) {
        self.counters.write().throttled += 1;
    }

    /// Increment failed counter
    pub fn increment_failed(&self) {
        self.counters.write().failed += 1;
    }

    /// Accepted sends today. Rolls over on its own when the date changes.
    pub fn daily_count(&self) -> u64 {
        self.daily_count_on(today())
    }

    /// Accepted sends on `date`, zero for any date but the current bucket's
    pub fn daily_count_on(&self, date: NaiveDate) -> u64 {
        self.counters.read().daily_count_on(date)
    }

    pub fn total_count(&self) -> u64 {
        self.counters.read().total
    }

    pub fn throttled_count(&self) -> u64 {
        self.counters.read().throttled
    }

    pub fn failed_count(&self) -> u64 {
        self.counters.read().failed
    }

    /// Read every counter under one lock
    pub fn snapshot(&self) -> MetricsSnapshot {
        let date = today();
        let counters = self.counters.read();
        MetricsSnapshot {
            date,
            daily_count: counters.daily_count_on(date),
            total_count: counters.total,
            throttled_count: counters.throttled,
            failed_count: counters.failed,
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Format metrics in Prometheus format
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP ses_mock_emails_sent_today Emails accepted today (UTC)
# TYPE ses_mock_emails_sent_today gauge
ses_mock_emails_sent_today {}

# HELP ses_mock_emails_sent_total Total emails accepted
# TYPE ses_mock_emails_sent_total counter
ses_mock_emails_sent_total {}

# HELP ses_mock_emails_throttled_total Sends rejected by throttling or warm-up
# TYPE ses_mock_emails_throttled_total counter
ses_mock_emails_throttled_total {}

# HELP ses_mock_emails_failed_total Sends rejected for invalid parameters
# TYPE ses_mock_emails_failed_total counter
ses_mock_emails_failed_total {}

# HELP ses_mock_uptime_seconds Server uptime in seconds
# TYPE ses_mock_uptime_seconds gauge
ses_mock_uptime_seconds {}
"#,
            snapshot.daily_count,
            snapshot.total_count,
            snapshot.throttled_count,
            snapshot.failed_count,
            self.uptime_seconds(),
        )
    }
}

impl Default for SendMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
