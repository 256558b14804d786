use anyhow::{Context, Result};
use apex_core::{ApiClient, ExporterConfig};
use apex_metrics::ApexMetrics;
use apex_server::{serve, shutdown_signal, AppState, Poller};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn execute(config: ExporterConfig) -> Result<()> {
    info!("Starting exporter for {}", config.player.description());
    if let Some(platform) = config.platform {
        info!("Platform: {}", platform);
    }

    let client = ApiClient::new(&config)?;
    let state = AppState::new(ApexMetrics::new()?);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    let cancel = CancellationToken::new();

    let poller = Poller::new(Arc::new(client), state.clone(), config.poll_interval);
    let poller_handle = tokio::spawn(poller.run(cancel.clone()));

    let signal_token = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    let served = serve(listener, state, cancel.clone().cancelled_owned()).await;

    // Stop polling even when the server exited on its own.
    cancel.cancel();
    poller_handle.await?;

    info!("Exporter stopped");
    served
}
