//! Command line.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use ntrip_relay::config::{BridgeSettings, ConfigError};

use crate::error::BridgeError;

/// Relay RTCM corrections from an NTRIP caster to a GNSS receiver.
#[derive(Debug, Parser)]
#[command(name = "ntrip-bridge", author, version, about, long_about = None)]
pub struct Cli {
    /// KEY=VALUE configuration file
    #[arg(short, long, default_value = "config.txt")]
    pub config: PathBuf,

    /// Receiver serial device (overrides SERIAL_PORT)
    #[arg(long)]
    pub serial: Option<String>,

    /// Serial baud rate (overrides SERIAL_BAUD)
    #[arg(long)]
    pub baud: Option<u32>,

    /// Address for the HTTP status endpoint (overrides STATUS_BIND)
    #[arg(long)]
    pub status_bind: Option<SocketAddr>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load the configuration file and apply command line overrides.
    pub fn settings(&self) -> Result<BridgeSettings, BridgeError> {
        let loaded = BridgeSettings::load_from(&self.config).and_then(|settings| self.apply(settings));
        loaded.map_err(|source| BridgeError::Config {
            path: self.config.clone(),
            source,
        })
    }

    fn apply(&self, mut settings: BridgeSettings) -> Result<BridgeSettings, ConfigError> {
        if let Some(serial) = &self.serial {
            settings.serial_port = Some(serial.clone());
        }
        if let Some(baud) = self.baud {
            settings.serial_baud = baud;
        }
        if let Some(bind) = self.status_bind {
            settings.status_bind = Some(bind);
        }
        settings.validate()?;
        Ok(settings)
    }
}
