use crate::{
    api::ApiClient,
    error::Result,
    stats::{MapRotation, PlayerStats},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Where the poller gets its snapshots from.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_player_stats(&self) -> Result<PlayerStats>;

    async fn fetch_map_rotation(&self) -> Result<MapRotation>;
}

pub type DynStatsSource = Arc<dyn StatsSource>;

#[async_trait]
impl StatsSource for ApiClient {
    async fn fetch_player_stats(&self) -> Result<PlayerStats> {
        self.get_player_stats().await
    }

    async fn fetch_map_rotation(&self) -> Result<MapRotation> {
        self.get_map_rotation().await
    }
}
