//! IoT Hub device connection string
//!
//! Connection strings are `;`-separated `Key=Value` pairs, e.g.
//! ```text
//! HostName=myhub.azure-devices.net;DeviceId=sim-01;SharedAccessKey=<base64>
//! ```

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const HOST_NAME: &str = "HostName";
const DEVICE_ID: &str = "DeviceId";
const MODULE_ID: &str = "ModuleId";
const SHARED_ACCESS_KEY: &str = "SharedAccessKey";
const SHARED_ACCESS_KEY_NAME: &str = "SharedAccessKeyName";
const SHARED_ACCESS_SIGNATURE: &str = "SharedAccessSignature";
const GATEWAY_HOST_NAME: &str = "GatewayHostName";
const X509: &str = "x509";

const KNOWN_KEYS: &[&str] = &[
    HOST_NAME,
    DEVICE_ID,
    MODULE_ID,
    SHARED_ACCESS_KEY,
    SHARED_ACCESS_KEY_NAME,
    SHARED_ACCESS_SIGNATURE,
    GATEWAY_HOST_NAME,
    X509,
];

/// Errors that can occur while parsing a connection string
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConnectionStringError {
    #[error("Connection string is empty")]
    Empty,

    #[error("Malformed connection string segment '{0}': expected Key=Value")]
    MalformedSegment(String),

    #[error("Unknown connection string key: {0}")]
    UnknownKey(String),

    #[error("Duplicate connection string key: {0}")]
    DuplicateKey(String),

    #[error("Connection string is missing required key: {0}")]
    MissingKey(&'static str),

    #[error("Connection string must contain SharedAccessKey or SharedAccessSignature")]
    MissingCredential,

    #[error("Connection string cannot contain both SharedAccessKey and SharedAccessSignature")]
    ConflictingCredentials,

    #[error("x509 certificate authentication is not supported")]
    X509Unsupported,
}

/// How the device authenticates against the hub
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Symmetric key; tokens are signed locally and renewed
    SharedAccessKey {
        key: String,
        key_name: Option<String>,
    },
    /// Pre-signed token, used verbatim
    SharedAccessSignature(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::SharedAccessKey { key_name, .. } => f
                .debug_struct("SharedAccessKey")
                .field("key", &"<redacted>")
                .field("key_name", key_name)
                .finish(),
            Credential::SharedAccessSignature(_) => {
                f.write_str("SharedAccessSignature(<redacted>)")
            }
        }
    }
}

/// Parsed device connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub host_name: String,
    pub device_id: String,
    pub module_id: Option<String>,
    pub gateway_host_name: Option<String>,
    pub credential: Credential,
}

impl ConnectionString {
    /// Parse a `Key=Value;...` connection string
    pub fn parse(input: &str) -> Result<Self, ConnectionStringError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ConnectionStringError::Empty);
        }

        let mut pairs: Vec<(&str, &str)> = Vec::new();
        for segment in input.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConnectionStringError::MalformedSegment(segment.to_string()))?;
            let key = key.trim();

            if !KNOWN_KEYS.contains(&key) {
                return Err(ConnectionStringError::UnknownKey(key.to_string()));
            }
            if pairs.iter().any(|(k, _)| *k == key) {
                return Err(ConnectionStringError::DuplicateKey(key.to_string()));
            }
            pairs.push((key, value.trim()));
        }

        let get = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
                .filter(|v| !v.is_empty())
        };

        if get(X509).is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            return Err(ConnectionStringError::X509Unsupported);
        }

        let host_name = get(HOST_NAME).ok_or(ConnectionStringError::MissingKey(HOST_NAME))?;
        let device_id = get(DEVICE_ID).ok_or(ConnectionStringError::MissingKey(DEVICE_ID))?;

        let credential = match (get(SHARED_ACCESS_KEY), get(SHARED_ACCESS_SIGNATURE)) {
            (Some(key), None) => Credential::SharedAccessKey {
                key,
                key_name: get(SHARED_ACCESS_KEY_NAME),
            },
            (None, Some(signature)) => Credential::SharedAccessSignature(signature),
            (Some(_), Some(_)) => return Err(ConnectionStringError::ConflictingCredentials),
            (None, None) => return Err(ConnectionStringError::MissingCredential),
        };

        Ok(Self {
            host_name,
            device_id,
            module_id: get(MODULE_ID),
            gateway_host_name: get(GATEWAY_HOST_NAME),
            credential,
        })
    }

    /// Resource the SAS token is scoped to
    pub fn resource_uri(&self) -> String {
        match &self.module_id {
            Some(module_id) => format!(
                "{}/devices/{}/modules/{}",
                self.host_name, self.device_id, module_id
            ),
            None => format!("{}/devices/{}", self.host_name, self.device_id),
        }
    }

    /// Host the device actually talks to (an edge gateway if configured)
    pub fn endpoint_host(&self) -> &str {
        self.gateway_host_name.as_deref().unwrap_or(&self.host_name)
    }
}

impl FromStr for ConnectionString {
    type Err = ConnectionStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "ZWRnZS1kZXZpY2UtdGVzdC1rZXktMDEyMzQ1Njc4OQ==";

    #[test]
    fn test_parse_device_key() {
        let cs = ConnectionString::parse(&format!(
            "HostName=myhub.azure-devices.net;DeviceId=sim-01;SharedAccessKey={KEY}"
        ))
        .expect("parse failed");

        assert_eq!(cs.host_name, "myhub.azure-devices.net");
        assert_eq!(cs.device_id, "sim-01");
        assert_eq!(cs.module_id, None);
        assert_eq!(
            cs.credential,
            Credential::SharedAccessKey {
                key: KEY.into(),
                key_name: None
            }
        );
        assert_eq!(cs.resource_uri(), "myhub.azure-devices.net/devices/sim-01");
        assert_eq!(cs.endpoint_host(), "myhub.azure-devices.net");
    }

    #[test]
    fn test_parse_module_with_gateway() {
        let cs: ConnectionString = format!(
            "HostName=hub.example.net;DeviceId=dev;ModuleId=sensor;GatewayHostName=edge.local;SharedAccessKey={KEY};"
        )
        .parse()
        .expect("parse failed");

        assert_eq!(cs.resource_uri(), "hub.example.net/devices/dev/modules/sensor");
        assert_eq!(cs.endpoint_host(), "edge.local");
    }

    #[test]
    fn test_parse_signature() {
        let cs = ConnectionString::parse(
            "HostName=h;DeviceId=d;SharedAccessSignature=SharedAccessSignature sr=h%2Fdevices%2Fd&sig=abc%3D&se=1",
        )
        .expect("parse failed");

        assert_eq!(
            cs.credential,
            Credential::SharedAccessSignature(
                "SharedAccessSignature sr=h%2Fdevices%2Fd&sig=abc%3D&se=1".into()
            )
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ConnectionString::parse("  "), Err(ConnectionStringError::Empty));
        assert_eq!(
            ConnectionString::parse("HostName"),
            Err(ConnectionStringError::MalformedSegment("HostName".into()))
        );
        assert_eq!(
            ConnectionString::parse("HostName=h;Foo=bar"),
            Err(ConnectionStringError::UnknownKey("Foo".into()))
        );
        assert_eq!(
            ConnectionString::parse("HostName=h;HostName=h"),
            Err(ConnectionStringError::DuplicateKey("HostName".into()))
        );
        assert_eq!(
            ConnectionString::parse("HostName=h;SharedAccessKey=k"),
            Err(ConnectionStringError::MissingKey("DeviceId"))
        );
        assert_eq!(
            ConnectionString::parse("HostName=h;DeviceId=d"),
            Err(ConnectionStringError::MissingCredential)
        );
        assert_eq!(
            ConnectionString::parse("HostName=h;DeviceId=d;SharedAccessKey=k;SharedAccessSignature=s"),
            Err(ConnectionStringError::ConflictingCredentials)
        );
        assert_eq!(
            ConnectionString::parse("HostName=h;DeviceId=d;x509=true"),
            Err(ConnectionStringError::X509Unsupported)
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cs = ConnectionString::parse(&format!(
            "HostName=h;DeviceId=d;SharedAccessKey={KEY}"
        ))
        .expect("parse failed");

        let debug = format!("{:?}", cs);
        assert!(!debug.contains(KEY));
        assert!(debug.contains("<redacted>"));
    }
}
