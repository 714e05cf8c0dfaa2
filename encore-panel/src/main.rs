//! Encore Panel
//!
//! Admin console for the artist-metrics dashboard.
//!
//! Architecture:
//! - Configuration: CLI flags and environment variables over built-in defaults
//! - Services: trigger calls and downstream view invalidation
//! - Push: event-stream subscription with reconnect backoff
//! - Coordinator: the job status state machine and its timers
//!
//! The default `watch` command keeps a live job list, lets the operator run
//! jobs, and refreshes views whenever a job completes or the poll interval
//! elapses.

mod commands;
mod config;
mod coordinator;
mod push;
mod render;
mod service;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{Commands, handle_command};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "encore-panel")]
#[command(about = "Artist metrics admin panel", long_about = None)]
struct Cli {
    /// Dashboard URL
    #[arg(long, env = "ENCORE_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Event stream path on the dashboard
    #[arg(long, env = "ENCORE_EVENTS_PATH", default_value = "/api/metrics-sse")]
    events_path: String,

    /// JSON job manifest (built-in jobs when omitted)
    #[arg(long, env = "ENCORE_MANIFEST")]
    manifest: Option<PathBuf>,

    /// Seconds between view refreshes
    #[arg(long, env = "ENCORE_POLL_INTERVAL", default_value_t = 10)]
    poll_interval: u64,

    /// Trigger request timeout in seconds
    #[arg(long, env = "ENCORE_REQUEST_TIMEOUT", default_value_t = 30)]
    request_timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_panel=info,encore_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config {
        events_path: cli.events_path,
        manifest_path: cli.manifest,
        poll_interval: Duration::from_secs(cli.poll_interval),
        request_timeout: Duration::from_secs(cli.request_timeout),
        ..Config::new(cli.api_url)
    };
    config.validate()?;

    debug!(?config, "Loaded configuration");

    handle_command(cli.command.unwrap_or(Commands::Watch), &config).await
}
