use crate::ui;
use anyhow::Result;
use apex_core::{ApiClient, ExporterConfig};
use apex_metrics::{ApexMetrics, Endpoint, PrometheusExporter};
use apex_server::{AppState, Poller};
use std::sync::Arc;

pub async fn execute(config: ExporterConfig) -> Result<()> {
    ui::print_header("Checking stats API access");
    println!("Player: {}", config.player.description());
    println!("API: {}", config.api_base_url);

    let client = ApiClient::new(&config)?;
    let state = AppState::new(ApexMetrics::new()?);
    let poller = Poller::new(Arc::new(client), state.clone(), config.poll_interval);

    let outcome = poller.poll_once().await;

    println!();
    for endpoint in Endpoint::ALL {
        match outcome.failures.iter().find(|(failed, _)| *failed == endpoint) {
            Some((_, e)) => ui::print_error(&format!("{}: {}", endpoint, e)),
            None => ui::print_success(&format!("{}: ok", endpoint)),
        }
    }

    if !outcome.is_success() {
        anyhow::bail!("Upstream check failed: {}", outcome.summary());
    }

    let metrics = state.metrics.read().await;
    println!("\n{}", PrometheusExporter::format(&metrics)?);

    Ok(())
}
