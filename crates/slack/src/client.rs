use async_trait::async_trait;
use thiserror::Error;

use crate::events::InboundEvent;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to connect to the chat service: {0}")]
    Connect(String),
    #[error("connection to the chat service closed")]
    ConnectionClosed,
    #[error("channel listing failed: {0}")]
    List(String),
}

/// Outcome of a best-effort send. A stale session can lose its send
/// capability without surfacing as a connection loss; sends against such a
/// session report `StaleSession` instead of failing the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    StaleSession,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    Public,
    Private,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelEntry {
    pub id: String,
    pub name: String,
}

/// Boundary to the remote chat-service client.
///
/// One implementation wraps the real SDK; tests script this trait directly.
/// `read` returns the currently available batch of events (possibly empty)
/// and signals connection loss through `TransportError::ConnectionClosed`
/// rather than through an empty batch.
#[async_trait]
pub trait RtmClient: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;
    async fn read(&self) -> Result<Vec<InboundEvent>, TransportError>;
    async fn send(&self, channel: &str, text: &str) -> SendOutcome;
    async fn list_channels(&self, kind: ChannelKind)
        -> Result<Vec<ChannelEntry>, TransportError>;
}

/// Stand-in client for dry runs: connects, lists a single synthetic
/// `#general`, reads empty batches, and swallows sends.
#[derive(Default)]
pub struct NoopRtmClient;

#[async_trait]
impl RtmClient for NoopRtmClient {
    async fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn read(&self) -> Result<Vec<InboundEvent>, TransportError> {
        Ok(Vec::new())
    }

    async fn send(&self, channel: &str, text: &str) -> SendOutcome {
        tracing::debug!(channel, text, "noop client dropped outbound message");
        SendOutcome::Sent
    }

    async fn list_channels(
        &self,
        kind: ChannelKind,
    ) -> Result<Vec<ChannelEntry>, TransportError> {
        Ok(match kind {
            ChannelKind::Public => {
                vec![ChannelEntry { id: "C0NOOP".to_owned(), name: "general".to_owned() }]
            }
            ChannelKind::Private => Vec::new(),
        })
    }
}
