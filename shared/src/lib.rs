//! Edge Shared Types
//!
//! This crate provides the sensor reading model, the IoT Hub message type,
//! connection string parsing and SAS token signing used by the edge device
//! simulator.

pub mod connection_string;
pub mod message;
pub mod reading;
pub mod sas;

use std::time::{SystemTime, UNIX_EPOCH};

// Re-export commonly used types at crate root
pub use connection_string::{ConnectionString, ConnectionStringError, Credential};
pub use message::{Message, MessageError};
pub use reading::Reading;
pub use sas::{generate_sas_token, SasError};

/// Get current timestamp in seconds since Unix epoch
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Default parameters for the simulator and the hub client
pub mod defaults {
    /// Environment variable holding the device connection string
    pub const CONNECTION_STRING_VAR: &str = "CONNECTION_STRING";

    /// Seconds between two telemetry messages
    pub const TELEMETRY_INTERVAL_SECS: u64 = 3;

    /// Lifetime of a generated SAS token
    pub const SAS_TOKEN_TTL_SECS: u64 = 3600;

    /// A cached token is renewed once less than this much validity remains
    pub const SAS_RENEWAL_MARGIN_SECS: u64 = 120;

    /// IoT Hub REST API version used for device-to-cloud events
    pub const API_VERSION: &str = "2020-03-13";

    /// TCP connect timeout for the hub endpoint
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;

    /// Whole-request timeout for a single send
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}
