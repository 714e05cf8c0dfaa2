//! Job trigger service
//!
//! Issues the single outbound call that starts a metrics-collection job.

use anyhow::{Context, Result};
use async_trait::async_trait;
use encore_client::DashboardClient;
use std::sync::Arc;
use tracing::{debug, warn};

/// Service trait for firing a job's trigger endpoint
#[async_trait]
pub trait JobTrigger: Send + Sync {
    /// Calls the trigger endpoint once
    ///
    /// # Arguments
    /// * `endpoint` - The job's endpoint reference from the manifest
    ///
    /// # Returns
    /// `Ok` when the endpoint acknowledged the trigger
    async fn trigger(&self, endpoint: &str) -> Result<()>;
}

/// HTTP implementation of JobTrigger
pub struct HttpJobTrigger {
    client: Arc<DashboardClient>,
}

impl HttpJobTrigger {
    /// Creates a new HTTP job trigger
    pub fn new(client: Arc<DashboardClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobTrigger for HttpJobTrigger {
    async fn trigger(&self, endpoint: &str) -> Result<()> {
        let body = match self.client.trigger_job(endpoint).await {
            Ok(body) => body,
            Err(e) if e.is_client_error() => {
                // A 4xx points at the manifest or credentials, not a flaky server
                warn!(endpoint = %endpoint, "Dashboard rejected trigger: {}", e);
                return Err(e).with_context(|| format!("Trigger rejected at {}", endpoint));
            }
            Err(e) if e.is_server_error() => {
                return Err(e).with_context(|| format!("Job failed on the server at {}", endpoint));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to trigger job at {}", endpoint));
            }
        };

        if let Some(body) = body {
            debug!("Trigger response from {}: {}", endpoint, body);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn trigger_with_status(status: u16) -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/trigger-youtube-metrics"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let trigger = HttpJobTrigger::new(Arc::new(DashboardClient::new(server.uri())));
        trigger.trigger("/api/admin/trigger-youtube-metrics").await
    }

    #[tokio::test]
    async fn test_success_status() {
        assert!(trigger_with_status(204).await.is_ok());
    }

    #[tokio::test]
    async fn test_failures_are_classified() {
        let err = trigger_with_status(404).await.unwrap_err();
        assert!(err.to_string().starts_with("Trigger rejected at"));

        let err = trigger_with_status(502).await.unwrap_err();
        assert!(err.to_string().starts_with("Job failed on the server at"));
    }
}
