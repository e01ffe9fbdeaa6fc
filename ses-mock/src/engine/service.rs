use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::warmup::WarmupSchedule;
use super::window::SendWindow;
use crate::config::SesMockConfig;
use crate::error::{Result, SesError};
use crate::metrics::SendMetrics;
use crate::models::{
    DetailedStatistics, ListIdentitiesOutput, PerformanceView, QuotaInfo, SendEmailInput,
    SendEmailOutput, Statistics, WarmupRules, WarmupView,
};
use crate::utils::email::validate_email;

/// Mock value, nothing is delivered so there is no latency to measure
const AVERAGE_LATENCY: &str = "0.15s";

/// Everything a send reads and writes. Guarded by a single lock.
#[derive(Debug)]
struct EngineState {
    stats: Statistics,
    quota: QuotaInfo,
    warmup: WarmupSchedule,
    last_send: Option<Instant>,
    recent_sends: SendWindow,
}

/// In-memory email sending service
pub struct SesService {
    state: RwLock<EngineState>,
    identities: Vec<String>,
    metrics: Arc<SendMetrics>,
}

impl SesService {
    /// Create a service with default quota and warm-up settings
    pub fn new(metrics: Arc<SendMetrics>) -> Self {
        Self::from_config(&SesMockConfig::default(), metrics)
    }

    /// Create a service from configuration
    pub fn from_config(config: &SesMockConfig, metrics: Arc<SendMetrics>) -> Self {
        let ceiling = config.quota.max_24_hour_send;
        let state = EngineState {
            stats: Statistics {
                daily_quota: ceiling,
                ..Statistics::default()
            },
            quota: QuotaInfo {
                max_24_hour_send: ceiling,
                max_send_rate: config.quota.max_send_rate,
                sent_last_24_hours: 0,
                sending_enabled: config.quota.sending_enabled,
            },
            warmup: WarmupSchedule::new(&config.warmup, ceiling, today()),
            last_send: None,
            recent_sends: SendWindow::default(),
        };

        Self {
            state: RwLock::new(state),
            identities: config.identities.clone(),
            metrics,
        }
    }

    /// Metrics this service reports to
    pub fn metrics(&self) -> &Arc<SendMetrics> {
        &self.metrics
    }

    /// Simulate sending an email
    ///
    /// Checks run in this order and the first failure wins:
    /// 1. warm-up daily limit (`DailyQuotaExceeded`, no counters change)
    /// 2. recipient syntax (`InvalidParameterValue`, `failed_sends` + 1)
    /// 3. send rate (`Throttling`, no counters change)
    pub fn send_email(&self, input: &SendEmailInput) -> Result<SendEmailOutput> {
        let mut state = self.state.write();

        let warmup = state.warmup.refresh(today());
        if !warmup.is_warmed_up && state.stats.total_emails >= warmup.daily_limit {
            warn!(
                "Warm-up limit reached on day {} ({} emails)",
                warmup.current_day, warmup.daily_limit
            );
            self.metrics.increment_throttled();
            return Err(SesError::DailyQuotaExceeded);
        }

        if let Err(e) = validate_email(&input.to) {
            state.stats.failed_sends += 1;
            warn!("Rejected recipient {:?}: {}", input.to, e);
            self.metrics.increment_failed();
            return Err(e);
        }

        let now = Instant::now();
        let interval = min_send_interval(state.quota.max_send_rate);
        if let Some(last) = state.last_send {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < interval {
                debug!(
                    "Throttled: {:?} since last send, minimum is {:?}",
                    elapsed, interval
                );
                self.metrics.increment_throttled();
                return Err(SesError::Throttling);
            }
        }

        state.stats.total_emails += 1;
        state.stats.successful_sends += 1;
        state.stats.used_quota += 1;
        state.last_send = Some(now);
        state.recent_sends.record(now);
        state.stats.send_rate = state.recent_sends.count_within(now, Duration::from_secs(1)) as f64;
        drop(state);

        self.metrics.increment_daily();

        let message_id = Uuid::new_v4().to_string();
        info!("Accepted email to {} (message id {})", input.to, message_id);

        Ok(SendEmailOutput { message_id })
    }

    pub fn get_statistics(&self) -> Statistics {
        self.state.read().stats.clone()
    }

    /// Quota with `sent_last_24_hours` computed at read time
    pub fn get_quota(&self) -> QuotaInfo {
        let state = self.state.read();
        QuotaInfo {
            sent_last_24_hours: state.recent_sends.count_at(Instant::now()),
            ..state.quota.clone()
        }
    }

    pub fn get_warmup_status(&self) -> WarmupRules {
        self.state.read().warmup.rules_on(today())
    }

    /// Statistics, warm-up view and derived rates from one consistent read
    pub fn get_detailed_statistics(&self) -> DetailedStatistics {
        let now = Utc::now();
        let state = self.state.read();
        let stats = state.stats.clone();
        let warmup = state.warmup.rules_on(now.date_naive());
        drop(state);

        let bounce_rate = percentage(stats.failed_sends, stats.total_emails);
        let success_rate = percentage(stats.successful_sends, stats.total_emails);

        DetailedStatistics {
            basic: stats,
            warmup: WarmupView {
                current_day: warmup.current_day,
                daily_limit: warmup.daily_limit,
                is_warmed_up: warmup.is_warmed_up,
                next_increase: (now + chrono::Duration::hours(24)).to_rfc3339(),
            },
            performance: PerformanceView {
                average_latency: AVERAGE_LATENCY.to_string(),
                bounce_rate,
                success_rate,
            },
        }
    }

    /// Fixed identity list. Never paginated.
    pub fn list_identities(&self) -> ListIdentitiesOutput {
        ListIdentitiesOutput {
            identities: self.identities.clone(),
            next_token: String::new(),
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Zero rate means unlimited. A rate too small to express as an interval
/// saturates at `Duration::MAX`.
fn min_send_interval(max_send_rate: f64) -> Duration {
    if max_send_rate > 0.0 {
        Duration::try_from_secs_f64(1.0 / max_send_rate).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// `part / whole * 100`, NaN while `whole` is zero
fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        f64::NAN
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn service() -> SesService {
        SesService::new(Arc::new(SendMetrics::new()))
    }

    fn unthrottled() -> SesService {
        let mut config = SesMockConfig::default();
        config.quota.max_send_rate = 0.0;
        SesService::from_config(&config, Arc::new(SendMetrics::new()))
    }

    fn input(to: &str) -> SendEmailInput {
        SendEmailInput::new(to, "Test Subject", "Test Body")
    }

    #[test]
    fn test_send_email() {
        let service = service();

        let cases = [("test@example.com", false), ("invalid-email", true)];
        for (to, want_err) in cases {
            let result = service.send_email(&input(to));
            assert_eq!(result.is_err(), want_err, "recipient {}", to);
            if let Ok(output) = result {
                assert!(!output.message_id.is_empty());
            }
        }
    }

    #[test]
    fn test_first_send_updates_statistics() {
        let service = service();
        let output = service.send_email(&SendEmailInput::new("a@b.com", "s", "b")).unwrap();
        assert!(!output.message_id.is_empty());

        let stats = service.get_statistics();
        assert_eq!(stats.total_emails, 1);
        assert_eq!(stats.successful_sends, 1);
        assert_eq!(stats.failed_sends, 0);
        assert_eq!(stats.used_quota, 1);
        assert_eq!(stats.daily_quota, 50_000);
    }

    #[test]
    fn test_invalid_recipient_counts_failure_only() {
        let service = service();
        for (n, to) in ["invalid-email", "@domain.com", "user@"].iter().enumerate() {
            let err = service.send_email(&input(to)).unwrap_err();
            assert_eq!(err.code(), "InvalidParameterValue");

            let stats = service.get_statistics();
            assert_eq!(stats.failed_sends, n as u64 + 1);
            assert_eq!(stats.total_emails, 0);
        }
        assert_eq!(service.metrics().failed_count(), 3);
    }

    #[test]
    fn test_back_to_back_sends_are_throttled() {
        let service = service();
        assert!(service.send_email(&input("one@example.com")).is_ok());

        let err = service.send_email(&input("two@example.com")).unwrap_err();
        assert_eq!(err, SesError::Throttling);

        let stats = service.get_statistics();
        assert_eq!(stats.total_emails, 1);
        assert_eq!(stats.failed_sends, 0);
        assert_eq!(service.metrics().throttled_count(), 1);
    }

    #[test]
    fn test_send_allowed_after_interval() {
        let service = service();
        assert!(service.send_email(&input("one@example.com")).is_ok());

        // 1/14 s is about 72ms
        std::thread::sleep(Duration::from_millis(100));
        assert!(service.send_email(&input("two@example.com")).is_ok());
        assert_eq!(service.get_statistics().successful_sends, 2);
    }

    #[test]
    fn test_invalid_recipient_reported_before_throttling() {
        let service = service();
        assert!(service.send_email(&input("one@example.com")).is_ok());

        let err = service.send_email(&input("not-an-address")).unwrap_err();
        assert_eq!(err.code(), "InvalidParameterValue");
    }

    #[test]
    fn test_warmup_limit() {
        let service = unthrottled();
        for _ in 0..50 {
            service.send_email(&input("test@example.com")).unwrap();
        }

        let err = service.send_email(&input("test@example.com")).unwrap_err();
        assert_eq!(err, SesError::DailyQuotaExceeded);

        // Gate runs before validation
        let err = service.send_email(&input("invalid-email")).unwrap_err();
        assert_eq!(err, SesError::DailyQuotaExceeded);

        let stats = service.get_statistics();
        assert_eq!(stats.total_emails, 50);
        assert_eq!(stats.failed_sends, 0);
    }

    #[test]
    fn test_warmup_wins_over_throttling() {
        let mut config = SesMockConfig::default();
        config.warmup.initial_daily_limit = 1;
        let service = SesService::from_config(&config, Arc::new(SendMetrics::new()));

        service.send_email(&input("test@example.com")).unwrap();
        let err = service.send_email(&input("test@example.com")).unwrap_err();
        assert_eq!(err, SesError::DailyQuotaExceeded);
    }

    #[test]
    fn test_warmup_advances_with_date() {
        let service = unthrottled();
        for _ in 0..50 {
            service.send_email(&input("test@example.com")).unwrap();
        }
        assert!(service.send_email(&input("test@example.com")).is_err());

        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        service.state.write().warmup.set_started_on(yesterday);

        let status = service.get_warmup_status();
        assert_eq!(status.current_day, 2);
        assert_eq!(status.daily_limit, 75);
        assert!(service.send_email(&input("test@example.com")).is_ok());
    }

    #[test]
    fn test_warmup_stays_complete_after_clock_moves_back() {
        let service = unthrottled();
        let long_ago = today().checked_sub_days(Days::new(60)).unwrap();
        service.state.write().warmup.set_started_on(long_ago);
        service.send_email(&input("test@example.com")).unwrap();

        service.state.write().warmup.set_started_on(today());
        let status = service.get_warmup_status();
        assert!(status.is_warmed_up);
        assert_eq!(status.daily_limit, 50_000);

        for _ in 0..60 {
            service.send_email(&input("test@example.com")).unwrap();
        }
        assert_eq!(service.get_statistics().successful_sends, 61);
    }

    #[test]
    fn test_warmed_up_account_skips_gate() {
        let mut config = SesMockConfig::default();
        config.quota.max_send_rate = 0.0;
        config.warmup.enabled = false;
        let service = SesService::from_config(&config, Arc::new(SendMetrics::new()));

        for _ in 0..60 {
            service.send_email(&input("test@example.com")).unwrap();
        }
        assert_eq!(service.get_statistics().successful_sends, 60);
        assert!(service.get_warmup_status().is_warmed_up);
    }

    #[test]
    fn test_quota_tracks_last_24_hours() {
        let service = unthrottled();
        let quota = service.get_quota();
        assert_eq!(quota.max_24_hour_send, 50_000);
        assert_eq!(quota.max_send_rate, 0.0);
        assert!(quota.sending_enabled);
        assert_eq!(quota.sent_last_24_hours, 0);

        for _ in 0..3 {
            service.send_email(&input("test@example.com")).unwrap();
        }
        service.send_email(&input("bad")).unwrap_err();
        assert_eq!(service.get_quota().sent_last_24_hours, 3);
    }

    #[test]
    fn test_send_rate_reflects_last_second() {
        let service = unthrottled();
        for _ in 0..4 {
            service.send_email(&input("test@example.com")).unwrap();
        }
        // The four sends may straddle a second boundary
        let rate = service.get_statistics().send_rate;
        assert!((1.0..=4.0).contains(&rate), "send rate {}", rate);
    }

    #[test]
    fn test_default_warmup_status() {
        let status = service().get_warmup_status();
        assert_eq!(status.daily_limit, 50);
        assert_eq!(status.current_day, 1);
        assert_eq!(status.increase_factor, 1.5);
        assert!(!status.is_warmed_up);
    }

    #[test]
    fn test_detailed_statistics_before_any_send() {
        let detailed = service().get_detailed_statistics();
        assert!(detailed.performance.bounce_rate.is_nan());
        assert!(detailed.performance.success_rate.is_nan());
        assert_eq!(detailed.performance.average_latency, "0.15s");
        assert_eq!(detailed.basic.total_emails, 0);
        assert_eq!(detailed.warmup.current_day, 1);
    }

    #[test]
    fn test_detailed_statistics_rates() {
        let service = unthrottled();
        for _ in 0..4 {
            service.send_email(&input("test@example.com")).unwrap();
        }
        service.send_email(&input("invalid-email")).unwrap_err();

        let detailed = service.get_detailed_statistics();
        assert_eq!(detailed.performance.success_rate, 100.0);
        assert_eq!(detailed.performance.bounce_rate, 25.0);
        assert_eq!(detailed.warmup.daily_limit, 50);

        let next = chrono::DateTime::parse_from_rfc3339(&detailed.warmup.next_increase).unwrap();
        let ahead = next.with_timezone(&Utc) - Utc::now();
        assert!(ahead > chrono::Duration::hours(23));
        assert!(ahead <= chrono::Duration::hours(24));
    }

    #[test]
    fn test_list_identities() {
        let service = service();
        let first = service.list_identities();
        assert_eq!(first.identities, vec!["domain.com", "test@domain.com"]);
        assert!(first.next_token.is_empty());
        assert_eq!(first, service.list_identities());
    }

    #[test]
    fn test_message_ids_are_unique() {
        let service = unthrottled();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..50 {
            let output = service.send_email(&input("test@example.com")).unwrap();
            assert!(ids.insert(output.message_id));
        }
    }

    #[test]
    fn test_snapshots_are_copies() {
        let service = unthrottled();
        let before = service.get_statistics();
        service.send_email(&input("test@example.com")).unwrap();
        assert_eq!(before.total_emails, 0);
        assert_eq!(service.get_statistics().total_emails, 1);
    }

    #[test]
    fn test_percentage() {
        assert!(percentage(0, 0).is_nan());
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(min_send_interval(0.0), Duration::ZERO);
        assert_eq!(min_send_interval(2.0), Duration::from_millis(500));
        assert_eq!(min_send_interval(1e-20), Duration::MAX);
        assert_eq!(min_send_interval(f64::MIN_POSITIVE), Duration::MAX);
    }

    #[test]
    fn test_tiny_rate_throttles_without_panicking() {
        let mut config = SesMockConfig::default();
        config.quota.max_send_rate = 1e-20;
        let service = SesService::from_config(&config, Arc::new(SendMetrics::new()));

        assert!(service.send_email(&input("a@b.com")).is_ok());
        let err = service.send_email(&input("a@b.com")).unwrap_err();
        assert_eq!(err, SesError::Throttling);
    }
}
