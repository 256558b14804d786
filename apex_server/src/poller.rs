use crate::state::AppState;
use apex_core::{ApexError, DynStatsSource};
use apex_metrics::Endpoint;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Result of one poll across both upstream endpoints.
#[derive(Debug, Default)]
pub struct PollOutcome {
    pub failures: Vec<(Endpoint, ApexError)>,
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|(endpoint, e)| format!("{}: {}", endpoint, e))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Periodically refreshes the shared metrics from a [`StatsSource`].
///
/// Each endpoint is applied on its own: a failed player lookup leaves the
/// fresh map rotation in place and vice versa. Failed endpoints keep serving
/// their previous values until the next successful poll.
///
/// [`StatsSource`]: apex_core::StatsSource
pub struct Poller {
    source: DynStatsSource,
    state: AppState,
    interval: Duration,
}

impl Poller {
    pub fn new(source: DynStatsSource, state: AppState, interval: Duration) -> Self {
        Self {
            source,
            state,
            interval,
        }
    }

    pub async fn run(self, cancel: CancellationToken) {
        info!("Polling upstream every {:?}", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    // Dropping an in-flight poll is safe: applies never await.
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("Poller stopped during an in-flight poll");
                            break;
                        }
                        outcome = self.poll_once() => {
                            if outcome.is_success() {
                                debug!("Poll completed");
                            }
                        }
                    }
                }
            }
        }
    }

    pub async fn poll_once(&self) -> PollOutcome {
        let (player, map) = tokio::join!(self.poll_player_stats(), self.poll_map_rotation());

        let mut outcome = PollOutcome::default();
        if let Err(e) = player {
            outcome.failures.push((Endpoint::PlayerStats, e));
        }
        if let Err(e) = map {
            outcome.failures.push((Endpoint::MapRotation, e));
        }

        self.state
            .metrics
            .read()
            .await
            .poll()
            .set_up(outcome.is_success());

        let mut health = self.state.health.write().await;
        if outcome.is_success() {
            health.record_success();
        } else {
            health.record_failure(outcome.summary());
            warn!(
                "Poll failed ({} consecutive), serving last known values",
                health.consecutive_failures
            );
        }

        outcome
    }

    async fn poll_player_stats(&self) -> Result<(), ApexError> {
        let start = Instant::now();
        let result = self.source.fetch_player_stats().await;
        let elapsed = start.elapsed();

        let metrics = self.state.metrics.write().await;
        match result {
            Ok(stats) => {
                metrics.apply_player_stats(&stats);
                metrics.poll().record_success(
                    Endpoint::PlayerStats,
                    elapsed,
                    unix_secs(stats.fetched_at),
                );
                info!(
                    "Updated player '{}' (level {}, {} {})",
                    stats.identifier, stats.level, stats.br_rank.name, stats.br_rank.division
                );
                Ok(())
            }
            Err(e) => {
                metrics.poll().record_failure(Endpoint::PlayerStats, elapsed);
                log_failure(Endpoint::PlayerStats, &e);
                Err(e)
            }
        }
    }

    async fn poll_map_rotation(&self) -> Result<(), ApexError> {
        let start = Instant::now();
        let result = self.source.fetch_map_rotation().await;
        let elapsed = start.elapsed();

        let metrics = self.state.metrics.write().await;
        match result {
            Ok(rotation) => {
                metrics.apply_map_rotation(&rotation);
                metrics.poll().record_success(
                    Endpoint::MapRotation,
                    elapsed,
                    unix_secs(rotation.fetched_at),
                );
                info!(
                    "Updated map rotation: {} -> {}",
                    rotation.current_map, rotation.next_map
                );
                Ok(())
            }
            Err(e) => {
                metrics.poll().record_failure(Endpoint::MapRotation, elapsed);
                log_failure(Endpoint::MapRotation, &e);
                Err(e)
            }
        }
    }
}

fn log_failure(endpoint: Endpoint, e: &ApexError) {
    if e.is_fatal() {
        error!("Polling {} failed: {}", endpoint, e);
    } else {
        warn!("Polling {} failed, retrying next poll: {}", endpoint, e);
    }
}

fn unix_secs(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}
