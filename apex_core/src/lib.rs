pub mod api;
pub mod config;
pub mod error;
pub mod source;
pub mod stats;

pub use api::ApiClient;
pub use config::{ExporterConfig, ExporterConfigBuilder, Platform, PlayerSelector};
pub use error::{ApexError, Result};
pub use source::{DynStatsSource, StatsSource};
pub use stats::{MapRotation, PlayerStats, RankInfo};

#[cfg(any(test, feature = "mock"))]
pub use source::MockStatsSource;

// Re-export commonly used types
pub use async_trait::async_trait;
