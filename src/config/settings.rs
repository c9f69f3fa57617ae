//! Settings structs.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ConfigError;
use crate::core::timing::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_WRITE_TIMEOUT};
use crate::core::{DEFAULT_BAUD_RATE, DEFAULT_SENTENCE_PREFIX};

/// Caster endpoint and credentials. Immutable once the relay starts.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CasterConfig {
    /// Caster host name or address.
    pub host: String,
    /// Caster TCP port.
    pub port: u16,
    /// Mountpoint to stream from.
    pub mountpoint: String,
    /// Caster username (may be empty).
    pub username: String,
    /// Caster password (may be empty).
    pub password: String,
}

impl CasterConfig {
    /// Create a caster configuration.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        mountpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            mountpoint: mountpoint.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check that host, mountpoint and a non-zero port are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Missing("host"));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid("port", "0", "port must be non-zero"));
        }
        if self.mountpoint.trim_start_matches('/').trim().is_empty() {
            return Err(ConfigError::Missing("mountpoint"));
        }
        Ok(())
    }

    /// `host:port` for display.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for CasterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CasterConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("mountpoint", &self.mountpoint)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Everything a bridge deployment configures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Caster endpoint and credentials.
    pub caster: CasterConfig,
    /// Serial device the receiver is attached to.
    pub serial_port: Option<String>,
    /// Serial baud rate.
    pub serial_baud: u32,
    /// Sentence identifier accepted as a position report.
    pub sentence_prefix: String,
    /// TCP connect timeout (`None` waits for the OS).
    pub connect_timeout: Option<Duration>,
    /// TCP write timeout (`None` blocks indefinitely).
    pub write_timeout: Option<Duration>,
    /// Address for the HTTP status endpoint, if enabled.
    pub status_bind: Option<SocketAddr>,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            caster: CasterConfig::default(),
            serial_port: None,
            serial_baud: DEFAULT_BAUD_RATE,
            sentence_prefix: DEFAULT_SENTENCE_PREFIX.to_string(),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            write_timeout: Some(DEFAULT_WRITE_TIMEOUT),
            status_bind: None,
        }
    }
}

impl BridgeSettings {
    /// Validate the caster section and relay parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.caster.validate()?;
        if self.serial_baud == 0 {
            return Err(ConfigError::invalid("serial_baud", "0", "baud rate must be non-zero"));
        }
        if self.sentence_prefix.is_empty() {
            return Err(ConfigError::Missing("sentence_prefix"));
        }
        Ok(())
    }
}
