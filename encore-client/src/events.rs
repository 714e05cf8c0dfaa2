//! Metrics event stream

use std::collections::VecDeque;
use std::pin::Pin;

use futures_util::{Stream, StreamExt, stream};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use tracing::debug;

use crate::DashboardClient;
use crate::error::{ClientError, Result};
use crate::sse::{SseDecoder, SseEvent};

/// Decoded events from an open subscription
///
/// Ends when the server closes the connection; a transport error is yielded
/// once as `Err`.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<SseEvent>> + Send>>;

impl DashboardClient {
    /// Open a server-sent event subscription
    ///
    /// # Arguments
    /// * `path` - The stream endpoint (e.g., "/api/metrics-sse")
    pub async fn subscribe_events(&self, path: &str) -> Result<EventStream> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let response = self.check_status(response).await?;

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            if !content_type.starts_with("text/event-stream") {
                return Err(ClientError::NotAnEventStream(content_type.to_string()));
            }
        }

        debug!("Event stream opened: {}", url);

        let body = Box::pin(response.bytes_stream());
        let state = (body, SseDecoder::new(), VecDeque::new(), false);

        let events = stream::unfold(state, |(mut body, mut decoder, mut pending, failed)| async move {
            loop {
                if let Some(event) = pending.pop_front() {
                    return Some((Ok(event), (body, decoder, pending, failed)));
                }

                if failed {
                    return None;
                }

                match body.next().await {
                    Some(Ok(chunk)) => pending.extend(decoder.push(&chunk)),
                    Some(Err(e)) => {
                        return Some((Err(ClientError::from(e)), (body, decoder, pending, true)));
                    }
                    None => return None,
                }
            }
        });

        Ok(Box::pin(events))
    }
}
