//! Transport trait abstraction for pluggable message backends

use anyhow::Result;
use async_trait::async_trait;
use edge_shared::Message;

/// Delivers device-to-cloud messages to the hub
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send one message, authorized by a SAS token
    async fn send(&self, message: &Message, authorization: &str) -> Result<()>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}
