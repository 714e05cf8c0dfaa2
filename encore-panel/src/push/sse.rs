//! Server-sent event transport

use async_trait::async_trait;
use encore_client::DashboardClient;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{PushChannel, PushSignal, ReconnectPolicy};

/// Subscribes to the dashboard's metrics event stream
///
/// Only `message` events are forwarded. Every failure is reported as
/// `PushSignal::Failed` before the next reconnect attempt.
pub struct SsePushChannel {
    client: Arc<DashboardClient>,
    path: String,
    policy: ReconnectPolicy,
}

impl SsePushChannel {
    pub fn new(client: Arc<DashboardClient>, path: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            client,
            path: path.into(),
            policy,
        }
    }

    /// Forwards events from one open connection
    ///
    /// Returns `Some(reason)` when the connection ends, `None` when the
    /// pump should stop.
    async fn forward(
        &self,
        mut events: encore_client::EventStream,
        sink: &mpsc::Sender<PushSignal>,
        shutdown: &CancellationToken,
    ) -> Option<String> {
        loop {
            let next = tokio::select! {
                _ = shutdown.cancelled() => return None,
                next = events.next() => next,
            };

            match next {
                Some(Ok(event)) if event.is_message() => {
                    if sink.send(PushSignal::Message(event.data)).await.is_err() {
                        return None;
                    }
                }
                Some(Ok(event)) => debug!("Ignoring '{}' event", event.event),
                Some(Err(e)) => return Some(e.to_string()),
                None => return Some("event stream closed by server".to_string()),
            }
        }
    }
}

#[async_trait]
impl PushChannel for SsePushChannel {
    async fn pump(self: Box<Self>, sink: mpsc::Sender<PushSignal>, shutdown: CancellationToken) {
        let mut delay = self.policy.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let opened = tokio::select! {
                _ = shutdown.cancelled() => return,
                opened = self.client.subscribe_events(&self.path) => opened,
            };

            let reason = match opened {
                Ok(events) => {
                    info!(path = %self.path, attempt, "Event stream connected");
                    attempt = 0;
                    delay = self.policy.initial_delay;

                    if sink.send(PushSignal::Opened).await.is_err() {
                        return;
                    }

                    match self.forward(events, &sink, &shutdown).await {
                        Some(reason) => reason,
                        None => return,
                    }
                }
                Err(e) => e.to_string(),
            };

            if sink.send(PushSignal::Failed(reason)).await.is_err() {
                return;
            }

            warn!(
                path = %self.path,
                delay_ms = delay.as_millis() as u64,
                "Reconnecting to event stream"
            );

            tokio::select! {
                _ = shutdown.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            delay = self.policy.next_delay(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancelled_pump_stops_without_connecting() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let (tx, mut rx) = mpsc::channel(4);
        let channel = Box::new(SsePushChannel::new(
            Arc::new(DashboardClient::new("http://127.0.0.1:9")),
            "/api/metrics-sse",
            ReconnectPolicy::default(),
        ));

        channel.pump(tx, shutdown).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_connection_failure_is_reported() {
        let shutdown = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(4);
        let channel = Box::new(SsePushChannel::new(
            Arc::new(DashboardClient::new("http://127.0.0.1:9")),
            "/api/metrics-sse",
            ReconnectPolicy::default(),
        ));

        let task = tokio::spawn(channel.pump(tx, shutdown.clone()));

        let signal = rx.recv().await.unwrap();
        assert!(matches!(signal, PushSignal::Failed(_)));

        shutdown.cancel();
        task.await.unwrap();
    }
}
