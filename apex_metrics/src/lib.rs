pub mod error;
pub mod exporter;
pub mod info;
pub mod poll;
pub mod registry;

pub use error::{MetricsError, Result};
pub use exporter::{PrometheusExporter, CONTENT_TYPE};
pub use info::InfoMetric;
pub use poll::{Endpoint, PollMetrics};
pub use registry::ApexMetrics;
