//! Device-to-cloud message
//!
//! A message is an opaque body plus the system properties IoT Hub accepts
//! alongside it. The hub caps device-to-cloud messages at 256 KiB.

use bytes::Bytes;
use std::fmt;
use thiserror::Error;

/// Maximum message body size accepted by IoT Hub
pub const MAX_MESSAGE_SIZE: usize = 256 * 1024;

/// Errors raised when a message cannot be sent as-is
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Message too large: {0} bytes (max: {MAX_MESSAGE_SIZE})")]
    MessageTooLarge(usize),
}

/// A device-to-cloud message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    body: Bytes,
    /// Optional id used by the hub for deduplication and tracing
    pub message_id: Option<String>,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
}

impl Message {
    /// Create a message with no system properties set
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            message_id: None,
            content_type: None,
            content_encoding: None,
        }
    }

    /// Create a UTF-8 JSON message
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self {
            content_type: Some("application/json".into()),
            content_encoding: Some("utf-8".into()),
            ..Self::new(body)
        }
    }

    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Check the message against hub limits
    pub fn validate(&self) -> Result<(), MessageError> {
        if self.body.len() > MAX_MESSAGE_SIZE {
            return Err(MessageError::MessageTooLarge(self.body.len()));
        }
        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_message_properties() {
        let msg = Message::json(r#"{"temperature": 21.00, "humidity": 45.50}"#)
            .with_message_id("abc");

        assert_eq!(msg.content_type.as_deref(), Some("application/json"));
        assert_eq!(msg.content_encoding.as_deref(), Some("utf-8"));
        assert_eq!(msg.message_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_display_shows_body() {
        let msg = Message::new("hello");
        assert_eq!(msg.to_string(), "hello");
    }

    #[test]
    fn test_message_too_large() {
        let msg = Message::new(vec![b'x'; MAX_MESSAGE_SIZE + 1]);
        assert!(matches!(
            msg.validate(),
            Err(MessageError::MessageTooLarge(n)) if n == MAX_MESSAGE_SIZE + 1
        ));

        let msg = Message::new(vec![b'x'; MAX_MESSAGE_SIZE]);
        assert!(msg.validate().is_ok());
    }
}
