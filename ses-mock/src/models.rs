//! Request, response and state types exchanged with the sending engine

use serde::{Deserialize, Serialize};

/// Input for sending an email
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SendEmailInput {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl SendEmailInput {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Name of the first required field that is missing or blank
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.to.trim().is_empty() {
            Some("to")
        } else if self.subject.trim().is_empty() {
            Some("subject")
        } else if self.body.trim().is_empty() {
            Some("body")
        } else {
            None
        }
    }
}

/// Response after an accepted send
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailOutput {
    pub message_id: String,
}

/// Email sending statistics
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_emails: u64,
    pub successful_sends: u64,
    pub failed_sends: u64,
    pub daily_quota: u64,
    pub used_quota: u64,
    /// Accepted sends during the current whole second
    pub send_rate: f64,
}

/// Sending quota
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaInfo {
    #[serde(rename = "max24HourSend")]
    pub max_24_hour_send: u64,
    /// Emails per second. Zero means unlimited.
    pub max_send_rate: f64,
    #[serde(rename = "sentLast24Hours")]
    pub sent_last_24_hours: u64,
    pub sending_enabled: bool,
}

/// Warm-up state
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmupRules {
    pub daily_limit: u64,
    pub current_day: u32,
    pub increase_factor: f64,
    pub is_warmed_up: bool,
}

/// Warm-up view inside the detailed statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmupView {
    pub current_day: u32,
    pub daily_limit: u64,
    pub is_warmed_up: bool,
    /// RFC 3339, always now + 24h. Display hint only.
    pub next_increase: String,
}

/// Derived performance numbers. Rates are NaN (JSON `null`) until the
/// first counted send.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceView {
    pub average_latency: String,
    pub bounce_rate: f64,
    pub success_rate: f64,
}

/// Composite statistics response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedStatistics {
    pub basic: Statistics,
    pub warmup: WarmupView,
    pub performance: PerformanceView,
}

/// Identity listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIdentitiesOutput {
    pub identities: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field() {
        assert_eq!(SendEmailInput::new("a@b.com", "s", "b").missing_field(), None);
        assert_eq!(SendEmailInput::new("", "s", "b").missing_field(), Some("to"));
        assert_eq!(SendEmailInput::new("a@b.com", " ", "b").missing_field(), Some("subject"));
        assert_eq!(SendEmailInput::new("a@b.com", "s", "").missing_field(), Some("body"));
    }

    #[test]
    fn test_quota_field_names() {
        let quota = QuotaInfo {
            max_24_hour_send: 50000,
            max_send_rate: 14.0,
            sent_last_24_hours: 3,
            sending_enabled: true,
        };
        let json = serde_json::to_value(&quota).unwrap();
        assert_eq!(json["max24HourSend"], 50000);
        assert_eq!(json["maxSendRate"], 14.0);
        assert_eq!(json["sentLast24Hours"], 3);
        assert_eq!(json["sendingEnabled"], true);
    }

    #[test]
    fn test_nan_rates_serialize_as_null() {
        let performance = PerformanceView {
            average_latency: "0.15s".to_string(),
            bounce_rate: f64::NAN,
            success_rate: f64::NAN,
        };
        let json = serde_json::to_value(&performance).unwrap();
        assert!(json["bounceRate"].is_null());
        assert!(json["successRate"].is_null());
        assert_eq!(json["averageLatency"], "0.15s");
    }

    #[test]
    fn test_empty_next_token_is_omitted() {
        let output = ListIdentitiesOutput {
            identities: vec!["domain.com".to_string()],
            next_token: String::new(),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("nextToken").is_none());
        assert_eq!(json["identities"][0], "domain.com");
    }
}
