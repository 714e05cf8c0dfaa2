//! Push channel
//!
//! A long-lived subscription that delivers job notifications to the
//! coordinator. Transports implement `PushChannel` and pump `PushSignal`s
//! into a channel until told to stop; the coordinator never sees the
//! transport itself.

mod reconnect;
mod sse;

pub use reconnect::ReconnectPolicy;
pub use sse::SsePushChannel;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What a push transport reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushSignal {
    /// Connection (re)established
    Opened,
    /// Raw message payload, expected to be a JSON job event
    Message(String),
    /// Connection failed or dropped
    Failed(String),
}

#[async_trait]
pub trait PushChannel: Send + 'static {
    /// Runs the subscription until `shutdown` is cancelled or `sink` closes
    async fn pump(self: Box<Self>, sink: mpsc::Sender<PushSignal>, shutdown: CancellationToken);
}
