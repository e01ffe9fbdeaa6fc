//! Warm-up schedule
//!
//! The daily limit starts at `initial_daily_limit` on day 1 and is
//! multiplied by `increase_factor` for every calendar day (UTC) that has
//! passed since warm-up started. Once it reaches the 24-hour quota the
//! account counts as warmed up and the gate no longer applies. That state
//! is latched on the next `refresh` and survives a clock moving backwards.

use chrono::NaiveDate;

use crate::config::WarmupConfig;
use crate::models::WarmupRules;

#[derive(Debug, Clone)]
pub struct WarmupSchedule {
    enabled: bool,
    initial_daily_limit: u64,
    increase_factor: f64,
    /// Upper bound for the daily limit, the 24-hour send quota
    ceiling: u64,
    started_on: NaiveDate,
    /// Set once the limit has reached the ceiling, never cleared
    warmed_up: bool,
}

impl WarmupSchedule {
    pub fn new(config: &WarmupConfig, ceiling: u64, started_on: NaiveDate) -> Self {
        Self {
            enabled: config.enabled,
            initial_daily_limit: config.initial_daily_limit,
            increase_factor: config.increase_factor,
            ceiling,
            started_on,
            warmed_up: false,
        }
    }

    /// Warm-up state as of `today`, latching the warmed-up flag once reached
    pub fn refresh(&mut self, today: NaiveDate) -> WarmupRules {
        let rules = self.rules_on(today);
        if rules.is_warmed_up {
            self.warmed_up = true;
        }
        rules
    }

    #[cfg(test)]
    pub(crate) fn set_started_on(&mut self, date: NaiveDate) {
        self.started_on = date;
    }

    /// Warm-up state as of `today`, without latching
    pub fn rules_on(&self, today: NaiveDate) -> WarmupRules {
        if !self.enabled {
            return WarmupRules {
                daily_limit: self.ceiling,
                current_day: 1,
                increase_factor: self.increase_factor,
                is_warmed_up: true,
            };
        }

        // A clock that moved backwards keeps us on day 1
        let elapsed_days = (today - self.started_on).num_days().max(0);
        let current_day = u32::try_from(elapsed_days + 1).unwrap_or(u32::MAX);
        let daily_limit = if self.warmed_up {
            self.ceiling
        } else {
            self.limit_after(elapsed_days)
        };

        WarmupRules {
            daily_limit,
            current_day,
            increase_factor: self.increase_factor,
            is_warmed_up: daily_limit >= self.ceiling,
        }
    }

    fn limit_after(&self, elapsed_days: i64) -> u64 {
        let exponent = i32::try_from(elapsed_days).unwrap_or(i32::MAX);
        let grown = self.initial_daily_limit as f64 * self.increase_factor.powi(exponent);
        let capped = grown.floor().min(self.ceiling as f64);
        // NaN is impossible for validated configs but must not slip through the cast
        if capped.is_nan() {
            self.initial_daily_limit.min(self.ceiling)
        } else {
            capped as u64
        }
    }
}
