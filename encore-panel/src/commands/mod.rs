//! Commands module
//!
//! Defines all panel commands and their handlers.

mod inspect;
mod session;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level panel commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show live job statuses and run jobs from the prompt (default)
    Watch,
    /// Trigger one job and wait for it to settle
    Trigger {
        /// Job id (e.g. spotify-listeners)
        id: String,
    },
    /// List the configured jobs
    Jobs,
    /// Show the artist navigation for a page path
    Nav {
        /// Page path (e.g. /artists/nova/metrics)
        path: String,

        /// Artist display name
        #[arg(long)]
        name: Option<String>,

        /// Artist image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Validate a JSON record file
    Validate {
        /// Record kind (artist, platform-ids, urls, metrics, tracks, videos,
        /// artist-tracks, artist-videos)
        kind: String,

        /// JSON file to check
        file: PathBuf,
    },
}

/// Handle a panel command
///
/// Routes the command to the appropriate handler.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The panel configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Watch => session::watch(config).await,
        Commands::Trigger { id } => session::trigger(config, &id).await,
        Commands::Jobs => inspect::list_jobs(config),
        Commands::Nav { path, name, image } => {
            inspect::show_nav(&path, name.as_deref(), image.as_deref());
            Ok(())
        }
        Commands::Validate { kind, file } => inspect::validate_file(&kind, &file),
    }
}
