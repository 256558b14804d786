pub mod poller;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use poller::{PollOutcome, Poller};
pub use routes::{router, serve};
pub use shutdown::shutdown_signal;
pub use state::{AppState, HealthResponse, HealthState, PollHealth, SharedMetrics};
