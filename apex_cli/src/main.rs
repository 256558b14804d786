mod commands;
mod ui;

use apex_core::{config::DEFAULT_API_BASE_URL, ExporterConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apex-exporter")]
#[command(about = "Prometheus exporter for Apex Legends player and map rotation stats", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    exporter: ExporterArgs,

    #[command(flatten)]
    logging: LoggingArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the stats API and serve /metrics (default)
    Serve,

    /// Fetch once, print the resulting metrics and exit
    Check,
}

#[derive(Args)]
struct ExporterArgs {
    /// Key for the stats API
    #[arg(long, env = "API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Player UID to track (exclusive with --player-name)
    #[arg(long, env = "USER_ID", global = true)]
    user_id: Option<String>,

    /// Player name to track (exclusive with --user-id)
    #[arg(long, env = "PLAYER_NAME", global = true)]
    player_name: Option<String>,

    /// Platform of the player (PC, PS4, X1, SWITCH)
    #[arg(long, env = "PLATFORM", global = true)]
    platform: Option<String>,

    /// Address the metrics server listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000", global = true)]
    listen_addr: SocketAddr,

    /// Time between upstream polls
    #[arg(long, env = "POLL_INTERVAL", default_value = "30s", value_parser = humantime::parse_duration, global = true)]
    poll_interval: Duration,

    /// Timeout of a single upstream request
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration, global = true)]
    request_timeout: Duration,

    /// Base URL of the stats API
    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_API_BASE_URL, global = true)]
    api_base_url: String,
}

impl ExporterArgs {
    fn into_config(self) -> apex_core::Result<ExporterConfig> {
        let mut builder = ExporterConfig::builder()
            .user_id(self.user_id)
            .player_name(self.player_name)
            .platform(self.platform)
            .listen_addr(self.listen_addr)
            .poll_interval(self.poll_interval)
            .request_timeout(self.request_timeout)
            .api_base_url(self.api_base_url);
        if let Some(api_key) = self.api_key {
            builder = builder.api_key(api_key);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Args)]
struct LoggingArgs {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Debug switch from the environment; `1`, `true`, `yes` and `on` enable it
    #[arg(long = "debug-env", env = "DEBUG", hide = true, global = true)]
    debug_env: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log filter used when neither --debug nor --quiet is given
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
}

impl LoggingArgs {
    fn debug_enabled(&self) -> bool {
        self.debug || self.debug_env.as_deref().is_some_and(is_truthy)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Filter directive for the subscriber. Unparseable `LOG_LEVEL` values fall
/// back to `info`.
fn log_directive(args: &LoggingArgs) -> String {
    let directive = if args.debug_enabled() || args.verbose {
        "debug".to_string()
    } else if args.quiet {
        "error".to_string()
    } else {
        args.log_level.trim().to_lowercase()
    };

    if EnvFilter::try_new(&directive).is_ok() {
        directive
    } else {
        "info".to_string()
    }
}

fn init_logging(args: &LoggingArgs) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_directive(args)))
        .with_target(false);

    match args.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    init_logging(&cli.logging);

    let config = cli.exporter.into_config()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            commands::serve::execute(config).await?;
        }

        Commands::Check => {
            commands::check::execute(config).await?;
        }
    }

    Ok(())
}
