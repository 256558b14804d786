use crate::error::Result;
use prometheus::{Gauge, GaugeVec, IntCounterVec, Opts, Registry};
use std::fmt;
use std::time::Duration;

/// Upstream documents fetched on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    PlayerStats,
    MapRotation,
}

impl Endpoint {
    pub const ALL: [Endpoint; 2] = [Endpoint::PlayerStats, Endpoint::MapRotation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::PlayerStats => "player_stats",
            Endpoint::MapRotation => "map_rotation",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of the exporter itself, exposed next to the player metrics.
#[derive(Clone)]
pub struct PollMetrics {
    up: Gauge,
    errors: IntCounterVec,
    last_success: GaugeVec,
    duration: GaugeVec,
}

impl PollMetrics {
    pub fn register(registry: &Registry) -> Result<Self> {
        let up = Gauge::with_opts(Opts::new(
            "apex_exporter_up",
            "Whether the last poll of every upstream endpoint succeeded",
        ))?;
        let errors = IntCounterVec::new(
            Opts::new(
                "apex_exporter_poll_errors_total",
                "Failed upstream polls per endpoint",
            ),
            &["endpoint"],
        )?;
        let last_success = GaugeVec::new(
            Opts::new(
                "apex_exporter_last_success_timestamp_seconds",
                "Unix time of the last successful poll per endpoint",
            ),
            &["endpoint"],
        )?;
        let duration = GaugeVec::new(
            Opts::new(
                "apex_exporter_poll_duration_seconds",
                "Duration of the last upstream poll per endpoint",
            ),
            &["endpoint"],
        )?;

        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(errors.clone()))?;
        registry.register(Box::new(last_success.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        // Error counters start at zero so rate() works from the first scrape.
        for endpoint in Endpoint::ALL {
            errors.with_label_values(&[endpoint.as_str()]);
        }

        Ok(Self {
            up,
            errors,
            last_success,
            duration,
        })
    }

    pub fn record_success(&self, endpoint: Endpoint, elapsed: Duration, at_unix_secs: f64) {
        self.duration
            .with_label_values(&[endpoint.as_str()])
            .set(elapsed.as_secs_f64());
        self.last_success
            .with_label_values(&[endpoint.as_str()])
            .set(at_unix_secs);
    }

    pub fn record_failure(&self, endpoint: Endpoint, elapsed: Duration) {
        self.duration
            .with_label_values(&[endpoint.as_str()])
            .set(elapsed.as_secs_f64());
        self.errors.with_label_values(&[endpoint.as_str()]).inc();
    }

    pub fn set_up(&self, up: bool) {
        self.up.set(if up { 1.0 } else { 0.0 });
    }

    pub fn error_count(&self, endpoint: Endpoint) -> u64 {
        self.errors.with_label_values(&[endpoint.as_str()]).get()
    }
}
