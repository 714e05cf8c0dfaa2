//! Live command handlers
//!
//! Commands that run a coordinator session against the dashboard: the
//! interactive `watch` view and one-shot `trigger`.

use anyhow::{Context, Result};
use colored::*;
use encore_client::DashboardClient;
use encore_core::domain::job::JobStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::Config;
use crate::coordinator::{CoordinatorHandle, JobCoordinator};
use crate::push::SsePushChannel;
use crate::render;
use crate::service::{HttpJobTrigger, ViewCache};

/// Starts a coordinator wired to the dashboard
///
/// Trigger calls share a client bounded by the request timeout. The event
/// stream is long-lived, so it gets its own client with only a connect
/// timeout.
fn start_coordinator(config: &Config) -> Result<(CoordinatorHandle, Arc<ViewCache>)> {
    let manifest = config.load_manifest()?;

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let stream_http = reqwest::Client::builder()
        .connect_timeout(config.request_timeout)
        .build()
        .context("Failed to build event stream client")?;

    let api = Arc::new(DashboardClient::with_client(&config.api_url, http));
    let events = Arc::new(DashboardClient::with_client(&config.api_url, stream_http));

    let views = Arc::new(ViewCache::new());
    let push = SsePushChannel::new(events, &config.events_path, config.reconnect_policy());

    let handle = JobCoordinator::spawn(
        manifest.jobs(),
        Arc::new(HttpJobTrigger::new(api)),
        views.clone(),
        Box::new(push),
        config.coordinator_settings(),
    );

    info!(
        api_url = %config.api_url,
        "Coordinator session started with {} job(s)",
        manifest.specs().len()
    );

    Ok((handle, views))
}

/// Interactive session
///
/// Reprints the job list on every change and reads `run <id>`, `list` and
/// `quit` from stdin until `quit`, end of input or ctrl-c.
pub async fn watch(config: &Config) -> Result<()> {
    let (handle, views) = start_coordinator(config)?;
    let mut jobs = handle.subscribe();
    let mut stale = views.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    render::print_jobs(&jobs.borrow_and_update());
    print_help();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }

            changed = jobs.changed() => {
                if changed.is_err() {
                    break;
                }
                render::print_jobs(&jobs.borrow_and_update());
            }

            key = stale.recv() => match key {
                Ok(key) => debug!(view = %key, generation = views.generation(&key), "View refresh requested"),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Skipped {} view invalidation(s)", skipped)
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },

            line = lines.next_line(), if stdin_open => {
                let line = line.context("Failed to read from stdin")?;
                let Some(line) = line else {
                    stdin_open = false;
                    continue;
                };

                let mut words = line.split_whitespace();
                match (words.next(), words.next()) {
                    (Some("run"), Some(id)) => {
                        if handle.job(id).is_none() {
                            println!("{} Unknown job: {}", "✗".red(), id);
                        } else {
                            handle.trigger(id).await?;
                        }
                    }
                    (Some("list"), None) => render::print_jobs(&handle.jobs()),
                    (Some("quit" | "exit"), None) => break,
                    (None, _) => {}
                    _ => print_help(),
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn print_help() {
    println!("{}", "Commands: run <job-id>, list, quit".dimmed());
}

/// Triggers one job and waits until it settles
///
/// Fails for unknown ids, when the job ends in `error`, or when it has not
/// settled within twice the request timeout.
pub async fn trigger(config: &Config, id: &str) -> Result<()> {
    let (handle, _views) = start_coordinator(config)?;

    if handle.job(id).is_none() {
        handle.shutdown().await;
        anyhow::bail!("Unknown job: {}", id);
    }

    let mut jobs = handle.subscribe();
    jobs.borrow_and_update();
    handle.trigger(id).await?;

    let settle = async {
        loop {
            jobs.changed().await?;
            let status = jobs
                .borrow_and_update()
                .iter()
                .find(|job| job.id == id)
                .map(|job| job.status);
            if matches!(status, Some(JobStatus::Success | JobStatus::Error)) {
                return anyhow::Ok(());
            }
        }
    };

    let wait = config.request_timeout * 2 + Duration::from_secs(1);
    let settled = tokio::time::timeout(wait, settle).await;

    let job = handle.job(id);
    handle.shutdown().await;

    settled
        .with_context(|| format!("Job {} did not settle within {:?}", id, wait))?
        .context("Coordinator stopped before the job settled")?;

    let Some(job) = job else {
        anyhow::bail!("Unknown job: {}", id);
    };

    render::print_jobs(std::slice::from_ref(&job));
    if job.status == JobStatus::Error {
        anyhow::bail!("Job {} failed", id);
    }

    Ok(())
}
