//! Panel configuration
//!
//! Defines the dashboard connection settings and the coordinator's timing:
//! poll interval, success display time, request timeout and event-stream
//! reconnection backoff.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use encore_core::domain::manifest::JobManifest;

use crate::coordinator::CoordinatorSettings;
use crate::push::ReconnectPolicy;

/// Panel configuration
///
/// All intervals are configurable to allow tuning for different deployments
/// (local dev server vs. hosted dashboard).
#[derive(Debug, Clone)]
pub struct Config {
    /// Dashboard base URL (e.g., "http://localhost:3000")
    pub api_url: String,

    /// Server-sent event endpoint for job notifications
    pub events_path: String,

    /// JSON job manifest; the built-in manifest is used when unset
    pub manifest_path: Option<PathBuf>,

    /// How often downstream views are refreshed regardless of events
    pub poll_interval: Duration,

    /// How long a job shows `success` before returning to `idle`
    pub revert_delay: Duration,

    /// How long a response-settled run still expects its push echo
    pub echo_window: Duration,

    /// Timeout for a single trigger request
    pub request_timeout: Duration,

    /// First delay before reconnecting the event stream
    pub reconnect_initial_delay: Duration,

    /// Upper bound on the reconnect delay
    pub reconnect_max_delay: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            events_path: "/api/metrics-sse".to_string(),
            manifest_path: None,
            poll_interval: Duration::from_secs(10),
            revert_delay: Duration::from_secs(3),
            echo_window: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
            reconnect_initial_delay: Duration::from_millis(500),
            reconnect_max_delay: Duration::from_secs(30),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.events_path.is_empty() {
            anyhow::bail!("events_path cannot be empty");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.revert_delay.is_zero() {
            anyhow::bail!("revert_delay must be greater than 0");
        }

        if self.echo_window.is_zero() {
            anyhow::bail!("echo_window must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.reconnect_initial_delay.is_zero() {
            anyhow::bail!("reconnect_initial_delay must be greater than 0");
        }

        if self.reconnect_max_delay < self.reconnect_initial_delay {
            anyhow::bail!("reconnect_max_delay must not be less than reconnect_initial_delay");
        }

        Ok(())
    }

    /// Loads the job manifest from `manifest_path`, or the built-in one
    pub fn load_manifest(&self) -> anyhow::Result<JobManifest> {
        match &self.manifest_path {
            Some(path) => JobManifest::from_file(path)
                .with_context(|| format!("Failed to load manifest {}", path.display())),
            None => Ok(JobManifest::default()),
        }
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            revert_delay: self.revert_delay,
            poll_interval: self.poll_interval,
            echo_window: self.echo_window,
        }
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            initial_delay: self.reconnect_initial_delay,
            max_delay: self.reconnect_max_delay,
            ..ReconnectPolicy::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:3000".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.revert_delay, Duration::from_secs(3));
        assert_eq!(config.events_path, "/api/metrics-sse");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Invalid URL should fail
        config.api_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());

        config.api_url = "https://dashboard.example".to_string();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.poll_interval = Duration::from_secs(10);

        config.reconnect_max_delay = Duration::from_millis(100);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_manifest_defaults_to_builtin() {
        let manifest = Config::default().load_manifest().unwrap();
        assert_eq!(manifest, JobManifest::default());

        let mut config = Config::default();
        config.manifest_path = Some(PathBuf::from("/nonexistent/manifest.json"));
        assert!(config.load_manifest().is_err());
    }

    #[test]
    fn test_manifest_loads_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        write!(
            file,
            r#"[
                {{"id": "spotify-followers", "name": "Followers", "icon": "/images/spotify.svg", "endpoint": "/api/admin/trigger-spotify-followers"}},
                {{"id": "youtube-metrics", "name": "Subscribers", "icon": "/images/youtube.svg", "endpoint": "/api/admin/trigger-youtube-metrics"}}
            ]"#
        )
        .expect("write manifest");

        let config = Config {
            manifest_path: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        let manifest = config.load_manifest().unwrap();
        let ids: Vec<_> = manifest.specs().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["spotify-followers", "youtube-metrics"]);
    }

    #[test]
    fn test_derived_settings() {
        let config = Config::default();
        let settings = config.coordinator_settings();
        assert_eq!(settings.revert_delay, Duration::from_secs(3));
        assert_eq!(settings.echo_window, Duration::from_secs(30));
        let policy = config.reconnect_policy();
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
    }
}
