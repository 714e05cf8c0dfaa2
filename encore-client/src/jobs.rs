//! Job trigger endpoints

use crate::DashboardClient;
use crate::error::Result;
use tracing::debug;

impl DashboardClient {
    /// Trigger a metrics-collection job
    ///
    /// Sends a `POST` with no body to the job's endpoint. Any 2xx response is a
    /// success; its body is returned when it parses as JSON and is otherwise
    /// ignored.
    ///
    /// # Arguments
    /// * `endpoint` - The job's trigger endpoint (e.g., "/api/admin/trigger-youtube-metrics")
    pub async fn trigger_job(&self, endpoint: &str) -> Result<Option<serde_json::Value>> {
        let url = self.url(endpoint);
        let response = self.client.post(&url).send().await?;
        let response = self.check_status(response).await?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!("Ignoring non-JSON trigger response from {}: {}", url, e);
                Ok(None)
            }
        }
    }
}
