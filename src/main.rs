mod client;
mod config;
mod telemetry;
mod transport;

use anyhow::Result;
use clap::Parser;
use client::DeviceClient;
use config::Cli;
use telemetry::TelemetrySimulator;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_file = config::load_env_file();
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(config::log_filter(level, rust_log.as_deref()))
        .init();
    config::report_env_file(&env_file);

    // Configuration errors end the process before any network activity
    let connection_string = config::connection_string_from_env()?;
    let mut client = DeviceClient::from_connection_string(&connection_string, &cli.client_config())?;

    info!("Edge device simulator started: {}", client.device_id());
    info!("  IoT Hub: {}", client.endpoint_host());
    info!("  Interval: {}s", cli.interval_secs);

    let mut simulator = TelemetrySimulator::new(rand::rng(), cli.interval());
    simulator.run(&mut client).await
}
