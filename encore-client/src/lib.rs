//! Encore HTTP Client
//!
//! A small, typed HTTP client for the dashboard API used by the admin panel.
//!
//! It covers the two endpoints the panel depends on:
//! - Job triggers: `POST` to a job's endpoint, no request body
//! - Metrics events: a long-lived `text/event-stream` subscription
//!
//! # Example
//!
//! ```no_run
//! use encore_client::DashboardClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), encore_client::ClientError> {
//!     let client = DashboardClient::new("http://localhost:3000");
//!
//!     client.trigger_job("/api/admin/trigger-spotify-listeners").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
mod events;
mod jobs;
pub mod sse;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use events::EventStream;
pub use sse::SseEvent;

use reqwest::Client;

/// HTTP client for the dashboard API
#[derive(Debug, Clone)]
pub struct DashboardClient {
    /// Base URL of the dashboard (e.g., "http://localhost:3000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl DashboardClient {
    /// Create a new dashboard client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the dashboard API (e.g., "http://localhost:3000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new dashboard client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    /// Note that a request timeout also bounds the event stream, so the panel
    /// builds a separate client for it.
    ///
    /// # Example
    /// ```
    /// use encore_client::DashboardClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = DashboardClient::with_client("http://localhost:3000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the dashboard
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an endpoint reference against the base URL
    ///
    /// Absolute `http(s)://` references are used as-is.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and return an API error if the request failed
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .ok()
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DashboardClient::new("http://localhost:3000");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = DashboardClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_url_resolution() {
        let client = DashboardClient::new("http://localhost:3000");
        assert_eq!(
            client.url("/api/metrics-sse"),
            "http://localhost:3000/api/metrics-sse"
        );
        assert_eq!(
            client.url("api/metrics-sse"),
            "http://localhost:3000/api/metrics-sse"
        );
        assert_eq!(client.url("https://jobs.example/run"), "https://jobs.example/run");
    }
}
