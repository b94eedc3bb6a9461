//! IoT Hub device client
//!
//! This module handles:
//! - Parsing the device connection string into a ready-to-use client
//! - SAS token signing, caching and renewal
//! - Handing validated messages to the transport

mod auth;
mod device;

pub use device::{ClientConfig, DeviceClient};
