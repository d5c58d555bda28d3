//! Whole-run pause when the API quota runs low

use crate::Result;
use crate::facts::Progress;
use crate::facts::github::{Client, RateLimitInfo};
use chrono::{DateTime, TimeDelta, Utc};
use core::time::Duration;

const LOG_TARGET: &str = "rate_guard";

/// Threshold used when none is configured
pub const DEFAULT_MIN_REMAINING: u64 = 100;

const DEFAULT_BUFFER: Duration = Duration::from_secs(5);
const TICK: Duration = Duration::from_secs(1);

/// Blocks the run until enough API quota is available.
#[derive(Debug, Clone, Copy)]
pub struct RateGuard {
    min_remaining: u64,
    buffer: Duration,
}

impl Default for RateGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_REMAINING, DEFAULT_BUFFER)
    }
}

impl RateGuard {
    #[must_use]
    pub const fn new(min_remaining: u64, buffer: Duration) -> Self {
        Self { min_remaining, buffer }
    }

    /// How long to wait given the current quota, or `None` if there is enough left.
    #[must_use]
    pub fn wait_duration(&self, info: &RateLimitInfo, now: DateTime<Utc>) -> Option<Duration> {
        if info.remaining >= self.min_remaining {
            return None;
        }

        let buffer = TimeDelta::from_std(self.buffer).unwrap_or(TimeDelta::MAX);
        let wait = (info.reset_at - now).checked_add(&buffer).unwrap_or(TimeDelta::MAX);
        Some(wait.to_std().unwrap_or(Duration::ZERO))
    }

    /// Query the quota and, if it is below the threshold, sleep until it resets
    /// while showing a countdown.
    pub async fn wait_if_needed(&self, client: &Client, progress: &dyn Progress) -> Result<()> {
        let info = client.rate_limit().await?;
        log::debug!(target: LOG_TARGET, "{} of {} requests remaining", info.remaining, info.limit);

        let Some(wait) = self.wait_duration(&info, Utc::now()) else {
            return Ok(());
        };

        log::info!(
            target: LOG_TARGET,
            "Only {} requests remaining, waiting {}s for the quota to reset",
            info.remaining,
            wait.as_secs()
        );

        progress.set_phase("Waiting");
        let mut left = wait.as_secs();
        while left > 0 {
            progress.set_message(&format!("Rate limit reached, resuming in {}", countdown(left)));
            tokio::time::sleep(TICK).await;
            left -= 1;
        }
        progress.set_phase("Processing");

        Ok(())
    }
}

/// `mm:ss` rendering of a number of seconds
#[must_use]
pub fn countdown(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(remaining: u64, reset_in_secs: i64, now: DateTime<Utc>) -> RateLimitInfo {
        RateLimitInfo {
            remaining,
            limit: 5000,
            reset_at: now + chrono::Duration::seconds(reset_in_secs),
        }
    }

    #[test]
    fn test_no_wait_when_above_threshold() {
        let now = Utc::now();
        let guard = RateGuard::new(50, Duration::from_secs(5));
        assert_eq!(guard.wait_duration(&info(50, 600, now), now), None);
        assert_eq!(guard.wait_duration(&info(4000, 600, now), now), None);
    }

    #[test]
    fn test_wait_until_reset_plus_buffer() {
        let now = Utc::now();
        let guard = RateGuard::new(50, Duration::from_secs(5));
        assert_eq!(guard.wait_duration(&info(49, 600, now), now), Some(Duration::from_secs(605)));
    }

    #[test]
    fn test_reset_in_the_past_does_not_wait() {
        let now = Utc::now();
        let guard = RateGuard::new(50, Duration::from_secs(5));
        assert_eq!(guard.wait_duration(&info(0, -30, now), now), Some(Duration::ZERO));
        assert_eq!(guard.wait_duration(&info(0, -5, now), now), Some(Duration::ZERO));
    }

    #[test]
    fn test_buffer_covers_recent_reset() {
        let now = Utc::now();
        let guard = RateGuard::new(50, Duration::from_secs(5));
        assert_eq!(guard.wait_duration(&info(0, -3, now), now), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_default_threshold() {
        let now = Utc::now();
        let guard = RateGuard::default();
        assert!(guard.wait_duration(&info(99, 10, now), now).is_some());
        assert!(guard.wait_duration(&info(100, 10, now), now).is_none());
    }

    #[test]
    fn test_countdown() {
        assert_eq!(countdown(0), "00:00");
        assert_eq!(countdown(65), "01:05");
        assert_eq!(countdown(3600), "60:00");
    }
}
