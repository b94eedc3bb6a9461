//! HTTPS transport for the IoT Hub device REST endpoint
//!
//! Each message is a single request:
//! ```text
//! POST https://<host>/devices/<device>[/modules/<module>]/messages/events?api-version=<v>
//! ```

use crate::transport::traits::MessageTransport;
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use edge_shared::{defaults, ConnectionString, Message};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use url::Url;

/// HTTP client settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Honor HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
            use_system_proxy: true,
        }
    }
}

/// Sends device-to-cloud events over HTTPS
pub struct HttpTransport {
    client: reqwest::Client,
    events_url: Url,
}

impl HttpTransport {
    /// Create a transport targeting the connection string's endpoint host
    pub fn new(connection: &ConnectionString, config: &HttpConfig) -> Result<Self> {
        let base = Url::parse(&format!("https://{}", connection.endpoint_host()))?;
        Self::with_base_url(base, connection, config)
    }

    /// Create a transport against an explicit base URL (scheme, host and port)
    pub fn with_base_url(base: Url, connection: &ConnectionString, config: &HttpConfig) -> Result<Self> {
        let events_url = events_url(base, &connection.device_id, connection.module_id.as_deref())?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            events_url,
        })
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }
}

fn events_url(mut base: Url, device_id: &str, module_id: Option<&str>) -> Result<Url> {
    {
        let mut segments = base
            .path_segments_mut()
            .map_err(|_| anyhow!("Hub endpoint URL cannot carry a path"))?;
        segments.pop_if_empty().push("devices").push(device_id);
        if let Some(module_id) = module_id {
            segments.push("modules").push(module_id);
        }
        segments.push("messages").push("events");
    }

    base.set_query(None);
    base.query_pairs_mut()
        .append_pair("api-version", defaults::API_VERSION);
    Ok(base)
}

#[async_trait]
impl MessageTransport for HttpTransport {
    async fn send(&self, message: &Message, authorization: &str) -> Result<()> {
        let mut request = self
            .client
            .post(self.events_url.as_str())
            .header(AUTHORIZATION, authorization)
            .body(message.body().clone());

        if let Some(id) = &message.message_id {
            request = request.header("iothub-messageid", id.as_str());
        }
        if let Some(content_type) = &message.content_type {
            request = request
                .header(CONTENT_TYPE, content_type.as_str())
                .header("iothub-contenttype", content_type.as_str());
        }
        if let Some(encoding) = &message.content_encoding {
            request = request.header("iothub-contentencoding", encoding.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Hub rejected message: {} {}", status, body.trim());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "HTTPS"
    }
}
