//! LMS monitoring service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace span ─▶ timeout ─▶ metrics
//!                                                              │
//!                                                              ▼
//!                                              route match (views registry)
//!                                                              │
//!                                                              ▼
//!                                      code owner middleware ─▶ view handler
//!                                          │                        │
//!                     code_owner_mappings ─┘                        └─ waffle switches
//!                     (ArcSwap, hot reload)                            (admin API)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use lms_monitoring::config::{load_config, watcher::ConfigWatcher, ServiceConfig};
use lms_monitoring::lifecycle::signals::spawn_signal_handler;
use lms_monitoring::observability::{logging, metrics};
use lms_monitoring::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "lms-monitoring")]
#[command(about = "LMS views with code owner monitoring and waffle switches", long_about = None)]
struct Args {
    /// Settings file (TOML). Defaults are used when omitted.
    #[arg(short, long, env = "LMS_MONITORING_CONFIG")]
    config: Option<PathBuf>,

    /// Do not watch the settings file for changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("lms-monitoring v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        code_owner_mappings = config.code_owner_mappings.is_some(),
        switches = config.waffle.switches.len(),
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the life of the server.
    let (_watcher, config_updates) = match (&args.config, args.no_watch) {
        (Some(path), false) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
