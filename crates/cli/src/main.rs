mod config_commands;
mod webhook_commands;

use std::path::PathBuf;

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use netpulse_config::NetpulseConfig;

#[derive(Parser)]
#[command(name = "netpulse", about = "NetPulse: network alerts and device lookups in Webex")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Defaults to the config
    /// value.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery in ./ and ~/.config/netpulse/).
    #[arg(long, global = true, env = "NETPULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the alert relay and bot server (default when no subcommand is provided).
    Serve,
    /// Replace the bot's webhooks with the canonical pair.
    SyncWebhooks {
        /// Webhook target URL (defaults to the configured or tunnel URL + /webexbot).
        #[arg(long)]
        target_url: Option<String>,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli, config: &NetpulseConfig) {
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<NetpulseConfig> {
    match cli.config {
        Some(ref path) => {
            let mut config = netpulse_config::load_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            netpulse_config::apply_env_overrides(&mut config);
            Ok(config)
        },
        None => netpulse_config::discover_and_load(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = load_config(&cli)?;
    init_telemetry(&cli, &config);

    info!(version = env!("CARGO_PKG_VERSION"), "netpulse starting");

    match cli.command {
        None | Some(Commands::Serve) => {
            // CLI args override config values
            if let Some(bind) = cli.bind {
                config.server.bind = bind;
            }
            if let Some(port) = cli.port {
                config.server.port = port;
            }

            let result = netpulse_config::validate(&config);
            for d in &result.diagnostics {
                warn!(%d, "config");
            }
            if result.has_errors() {
                anyhow::bail!("configuration has errors; run `netpulse config check`");
            }
            netpulse_gateway::start_server(&config).await
        },
        Some(Commands::SyncWebhooks { target_url }) => {
            webhook_commands::sync_webhooks(&config, target_url).await
        },
        Some(Commands::Config { action }) => config_commands::handle_config(action, &config),
    }
}
