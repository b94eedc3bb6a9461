//! Simulated sensor reading
//!
//! A reading is created fresh for every telemetry iteration and serialized
//! into the fixed text payload sent to the hub.

use rand::Rng;
use std::fmt;
use std::ops::Range;

/// Generation range for temperature in degrees Celsius
pub const TEMPERATURE_RANGE: Range<f64> = 20.0..35.0;

/// Generation range for relative humidity in percent
pub const HUMIDITY_RANGE: Range<f64> = 40.0..80.0;

/// Temperatures strictly above this are reported locally as a warning
pub const HIGH_TEMPERATURE_THRESHOLD: f64 = 30.0;

/// One temperature/humidity sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
}

impl Reading {
    /// Draw a reading uniformly from the generation ranges
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self {
            temperature: rng.random_range(TEMPERATURE_RANGE),
            humidity: rng.random_range(HUMIDITY_RANGE),
        }
    }

    pub fn is_high_temperature(&self) -> bool {
        self.temperature > HIGH_TEMPERATURE_THRESHOLD
    }

    /// Format as `{"temperature": <t>, "humidity": <h>}` with two decimals
    pub fn to_payload(&self) -> String {
        format!(
            "{{\"temperature\": {:.2}, \"humidity\": {:.2}}}",
            self.temperature, self.humidity
        )
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} °C, {:.2} %", self.temperature, self.humidity)
    }
}
