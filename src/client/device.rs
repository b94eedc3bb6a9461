//! Device client: the send primitive used by the telemetry loop

use crate::client::auth::Authenticator;
use crate::transport::{HttpConfig, HttpTransport, MessageTransport};
use anyhow::{Context, Result};
use edge_shared::{defaults, now_secs, ConnectionString, Message};
use std::time::Duration;
use tracing::debug;

/// Configuration for the device client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Lifetime of locally signed SAS tokens
    pub sas_ttl: Duration,
    /// HTTP transport settings
    pub http: HttpConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sas_ttl: Duration::from_secs(defaults::SAS_TOKEN_TTL_SECS),
            http: HttpConfig::default(),
        }
    }
}

/// Sends messages to IoT Hub on behalf of one device
pub struct DeviceClient<T: MessageTransport> {
    connection: ConnectionString,
    auth: Authenticator,
    transport: T,
    messages_sent: u64,
}

impl DeviceClient<HttpTransport> {
    /// Parse `connection_string` and build an HTTPS client; no network I/O happens here
    pub fn from_connection_string(connection_string: &str, config: &ClientConfig) -> Result<Self> {
        let connection = ConnectionString::parse(connection_string)
            .context("Invalid CONNECTION_STRING")?;
        let transport = HttpTransport::new(&connection, &config.http)?;
        debug!("Events endpoint: {}", transport.events_url());
        Ok(Self::new(connection, transport, config.sas_ttl))
    }
}

impl<T: MessageTransport> DeviceClient<T> {
    pub fn new(connection: ConnectionString, transport: T, sas_ttl: Duration) -> Self {
        let auth = Authenticator::new(&connection, sas_ttl);
        Self {
            connection,
            auth,
            transport,
            messages_sent: 0,
        }
    }

    /// Send one message; any failure is returned to the caller untouched by retries
    pub async fn send_message(&mut self, message: &Message) -> Result<()> {
        message.validate()?;
        let authorization = self
            .auth
            .token(now_secs())
            .context("Failed to sign SAS token")?;

        self.transport
            .send(message, authorization)
            .await
            .with_context(|| format!("Failed to send message via {}", self.transport.name()))?;

        self.messages_sent += 1;
        debug!("Message #{} delivered", self.messages_sent);
        Ok(())
    }

    pub fn device_id(&self) -> &str {
        &self.connection.device_id
    }

    /// Host messages are delivered to
    pub fn endpoint_host(&self) -> &str {
        self.connection.endpoint_host()
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }
}
