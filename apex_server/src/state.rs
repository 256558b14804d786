use apex_metrics::ApexMetrics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Metric state shared by the poller (writer) and scrapes (readers).
pub type SharedMetrics = Arc<RwLock<ApexMetrics>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// No poll has succeeded yet.
    Starting,
    Ok,
    /// The last poll failed; older values are still served.
    Degraded,
}

#[derive(Debug, Clone, Default)]
pub struct PollHealth {
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    pub total_polls: u64,
}

impl PollHealth {
    pub fn record_success(&mut self) {
        self.total_polls += 1;
        self.last_success = Some(Utc::now());
        self.last_error = None;
        self.consecutive_failures = 0;
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.total_polls += 1;
        self.last_error = Some(error.into());
        self.consecutive_failures += 1;
    }

    pub fn state(&self) -> HealthState {
        if self.consecutive_failures > 0 {
            HealthState::Degraded
        } else if self.last_success.is_some() {
            HealthState::Ok
        } else {
            HealthState::Starting
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub metrics: SharedMetrics,
    pub health: Arc<RwLock<PollHealth>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(metrics: ApexMetrics) -> Self {
        Self {
            metrics: Arc::new(RwLock::new(metrics)),
            health: Arc::new(RwLock::new(PollHealth::default())),
            start_time: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthState,
    pub uptime_seconds: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    pub total_polls: u64,
}

impl HealthResponse {
    pub fn from_health(health: &PollHealth, uptime_seconds: u64) -> Self {
        Self {
            status: health.state(),
            uptime_seconds,
            last_success: health.last_success,
            last_error: health.last_error.clone(),
            consecutive_failures: health.consecutive_failures,
            total_polls: health.total_polls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_transitions() {
        let mut health = PollHealth::default();
        assert_eq!(health.state(), HealthState::Starting);

        health.record_failure("boom");
        assert_eq!(health.state(), HealthState::Degraded);
        assert!(health.last_success.is_none());

        health.record_success();
        assert_eq!(health.state(), HealthState::Ok);
        assert_eq!(health.consecutive_failures, 0);
        assert!(health.last_error.is_none());

        health.record_failure("again");
        health.record_failure("and again");
        assert_eq!(health.state(), HealthState::Degraded);
        assert_eq!(health.consecutive_failures, 2);
        assert_eq!(health.total_polls, 4);
        assert!(health.last_success.is_some());
    }
}
