//! Console relay server.
//!
//! Listens for events posted by capture sessions and renders them to
//! stdout until Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use console_relay::config::validation::validate_config;
use console_relay::config::{load_config, ConfigError, RelayConfig};
use console_relay::lifecycle::{wait_for_ctrl_c, Shutdown};
use console_relay::net::Listener;
use console_relay::observability::{logging, metrics};
use console_relay::relay::{Relay, RelayServer};
use console_relay::render::Renderer;

#[derive(Parser)]
#[command(name = "console-relay", version)]
#[command(about = "Render console events posted by remote capture sessions", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `listener.bind_address`
    #[arg(long)]
    bind: Option<String>,

    /// Endpoint path, overrides `relay.endpoint` and the path of
    /// `capture.endpoint_url`
    #[arg(long)]
    endpoint: Option<String>,

    /// Body cap in bytes, overrides `relay.max_body_bytes`
    #[arg(long)]
    max_body_bytes: Option<usize>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Print the page URL of each event
    #[arg(long)]
    show_url: bool,
}

impl Args {
    fn apply(&self, config: &mut RelayConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.set_endpoint(endpoint);
        }
        if let Some(max) = self.max_body_bytes {
            config.relay.max_body_bytes = max;
        }
        if self.no_color {
            config.render.color = false;
        }
        if self.show_url {
            config.render.show_url = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    args.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_tracing(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "console-relay starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let relay = Arc::new(Relay::new(&config.relay, Renderer::stdout(&config.render)));
    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        wait_for_ctrl_c().await;
        signal.trigger();
    });

    RelayServer::new(relay)
        .run(listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
