//! Runtime configuration
//!
//! Flags fall back to environment variables. A `.env` file, if present, is
//! loaded before the flags are parsed so it can provide any of them as well as
//! the connection string.

use crate::client::ClientConfig;
use crate::transport::HttpConfig;
use anyhow::{bail, Result};
use clap::Parser;
use edge_shared::defaults::{self, CONNECTION_STRING_VAR};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Edge device simulator
#[derive(Parser, Debug)]
#[command(
    name = "edge-device",
    version,
    about = "Edge device simulator that sends random temperature/humidity telemetry to Azure IoT Hub",
    after_help = "The device connection string is read from the CONNECTION_STRING environment variable (or a .env file)."
)]
pub struct Cli {
    /// Seconds to wait between telemetry messages
    #[arg(
        long,
        env = "TELEMETRY_INTERVAL_SECS",
        default_value_t = defaults::TELEMETRY_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,

    /// Lifetime of locally signed SAS tokens, in seconds
    #[arg(
        long,
        env = "SAS_TOKEN_TTL_SECS",
        default_value_t = defaults::SAS_TOKEN_TTL_SECS,
        value_parser = clap::value_parser!(u64).range(300..)
    )]
    pub sas_ttl_secs: u64,

    /// TCP connect timeout for the hub endpoint, in seconds
    #[arg(
        long,
        env = "CONNECT_TIMEOUT_SECS",
        default_value_t = defaults::CONNECT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub connect_timeout_secs: u64,

    /// Timeout for a single send request, in seconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        default_value_t = defaults::REQUEST_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            sas_ttl: Duration::from_secs(self.sas_ttl_secs),
            http: HttpConfig {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                ..Default::default()
            },
        }
    }
}

/// Outcome of loading a `.env` file
#[derive(Debug, Default)]
pub struct EnvFileReport {
    /// Whether a `.env` file was found
    pub found: bool,
    /// Variables set from the file
    pub loaded: usize,
    /// Lines (or the file itself) that could not be read
    pub skipped: Vec<String>,
}

/// Load `.env` from the working directory or one of its parents
///
/// Variables already present in the process environment win. A line that
/// fails to parse is skipped; the lines after it are still loaded.
pub fn load_env_file() -> EnvFileReport {
    let mut report = EnvFileReport::default();

    let lines = match dotenvy::dotenv_iter() {
        Ok(lines) => lines,
        Err(e) if e.not_found() => return report,
        Err(e) => {
            report.skipped.push(e.to_string());
            return report;
        }
    };
    report.found = true;

    for line in lines {
        match line {
            Ok((key, value)) => {
                if std::env::var_os(&key).is_none() {
                    std::env::set_var(&key, value);
                    report.loaded += 1;
                }
            }
            Err(dotenvy::Error::Io(e)) => {
                report.skipped.push(e.to_string());
                break;
            }
            Err(e) => report.skipped.push(e.to_string()),
        }
    }
    report
}

/// Log the outcome of [`load_env_file`]; a missing or unreadable file is not fatal
pub fn report_env_file(report: &EnvFileReport) {
    for reason in &report.skipped {
        warn!("Skipping .env entry: {}", reason);
    }
    if report.found {
        debug!("Loaded {} variable(s) from .env", report.loaded);
    } else if report.skipped.is_empty() {
        debug!("No .env file found, using process environment");
    }
}

/// Log filter: `RUST_LOG` when set, otherwise `level`
pub fn log_filter(level: tracing::Level, rust_log: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

/// Read the device connection string from the environment
pub fn connection_string_from_env() -> Result<String> {
    require_connection_string(std::env::var(CONNECTION_STRING_VAR).ok())
}

/// Reject an absent or blank connection string with a descriptive error
pub fn require_connection_string(value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => Ok(v),
        None => bail!(
            "Environment variable {var} not set. Add it to a .env file as '{var}=...' or export it in your environment.",
            var = CONNECTION_STRING_VAR
        ),
    }
}
