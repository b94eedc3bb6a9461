//! Telemetry simulator loop

use crate::client::DeviceClient;
use crate::transport::MessageTransport;
use anyhow::Result;
use edge_shared::{Message, Reading};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Produces random readings and hands them to the device client
pub struct TelemetrySimulator<R: Rng> {
    rng: R,
    /// Pause between the end of one send and the next reading
    interval: Duration,
}

impl<R: Rng> TelemetrySimulator<R> {
    pub fn new(rng: R, interval: Duration) -> Self {
        Self { rng, interval }
    }

    /// One iteration without the trailing sleep; returns the reading that was sent
    pub async fn step<T: MessageTransport>(&mut self, client: &mut DeviceClient<T>) -> Result<Reading> {
        let reading = Reading::generate(&mut self.rng);
        debug!("Generated reading: {}", reading);

        if reading.is_high_temperature() {
            warn!(
                "[EDGE] High temperature detected locally: {:.2} °C",
                reading.temperature
            );
        }

        let message = Message::json(reading.to_payload()).with_message_id(Uuid::new_v4().to_string());
        client.send_message(&message).await?;
        info!("Sent message #{}: {}", client.messages_sent(), message);

        Ok(reading)
    }

    /// Run until the first error; there is no retry
    pub async fn run<T: MessageTransport>(&mut self, client: &mut DeviceClient<T>) -> Result<()> {
        loop {
            self.step(client).await?;
            tokio::time::sleep(self.interval).await;
        }
    }
}
