//! Telemetry Loop
//!
//! Generates a simulated reading, flags high temperatures locally and sends
//! the reading to the hub on a fixed interval.

mod simulator;

pub use simulator::TelemetrySimulator;
