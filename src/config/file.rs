//! `KEY=VALUE` configuration file.
//!
//! ```text
//! # caster
//! NTRIP_HOST=caster.example
//! NTRIP_PORT=2101
//! NTRIP_MOUNTPOINT=RTCM3
//! NTRIP_USERNAME=user
//! NTRIP_PASSWORD=secret
//!
//! # receiver
//! SERIAL_PORT=/dev/ttyUSB0
//! SERIAL_BAUD=115200
//! ```
//!
//! Blank lines and `#` comments are skipped, unknown keys are ignored.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, ParseOption, Properties};

use super::error::ConfigError;
use super::settings::BridgeSettings;

/// Recognised keys.
pub mod keys {
    /// Caster host.
    pub const NTRIP_HOST: &str = "NTRIP_HOST";
    /// Caster port.
    pub const NTRIP_PORT: &str = "NTRIP_PORT";
    /// Mountpoint.
    pub const NTRIP_MOUNTPOINT: &str = "NTRIP_MOUNTPOINT";
    /// Caster username.
    pub const NTRIP_USERNAME: &str = "NTRIP_USERNAME";
    /// Caster password.
    pub const NTRIP_PASSWORD: &str = "NTRIP_PASSWORD";
    /// Serial device path.
    pub const SERIAL_PORT: &str = "SERIAL_PORT";
    /// Serial baud rate.
    pub const SERIAL_BAUD: &str = "SERIAL_BAUD";
    /// Accepted sentence identifier.
    pub const GGA_PREFIX: &str = "GGA_PREFIX";
    /// Connect timeout in seconds, 0 disables.
    pub const CONNECT_TIMEOUT_SECS: &str = "CONNECT_TIMEOUT_SECS";
    /// Write timeout in seconds, 0 disables.
    pub const WRITE_TIMEOUT_SECS: &str = "WRITE_TIMEOUT_SECS";
    /// HTTP status endpoint address.
    pub const STATUS_BIND: &str = "STATUS_BIND";
}

impl BridgeSettings {
    /// Load and validate settings from a file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file_opt(path, parse_option())?;
        parse_ini(&ini)
    }

    /// Parse and validate settings from configuration text.
    pub fn from_config_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str_opt(text, parse_option())?;
        parse_ini(&ini)
    }
}

// Values are taken verbatim: no backslash escapes, no quote stripping.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn parse_ini(ini: &Ini) -> Result<BridgeSettings, ConfigError> {
    let empty = Properties::new();
    let section = ini.section(None::<String>).unwrap_or(&empty);
    let mut settings = BridgeSettings::default();

    if let Some(v) = non_empty(section, keys::NTRIP_HOST) {
        settings.caster.host = v.to_string();
    }
    match non_empty(section, keys::NTRIP_PORT) {
        Some(v) => settings.caster.port = parse_value(keys::NTRIP_PORT, v)?,
        None => return Err(ConfigError::Missing(keys::NTRIP_PORT)),
    }
    if let Some(v) = non_empty(section, keys::NTRIP_MOUNTPOINT) {
        settings.caster.mountpoint = v.to_string();
    }
    if let Some(v) = section.get(keys::NTRIP_USERNAME) {
        settings.caster.username = v.to_string();
    }
    if let Some(v) = section.get(keys::NTRIP_PASSWORD) {
        settings.caster.password = v.to_string();
    }

    if let Some(v) = non_empty(section, keys::SERIAL_PORT) {
        settings.serial_port = Some(v.to_string());
    }
    if let Some(v) = non_empty(section, keys::SERIAL_BAUD) {
        settings.serial_baud = parse_value(keys::SERIAL_BAUD, v)?;
    }
    if let Some(v) = non_empty(section, keys::GGA_PREFIX) {
        settings.sentence_prefix = v.to_string();
    }
    if let Some(v) = non_empty(section, keys::CONNECT_TIMEOUT_SECS) {
        settings.connect_timeout = parse_timeout(keys::CONNECT_TIMEOUT_SECS, v)?;
    }
    if let Some(v) = non_empty(section, keys::WRITE_TIMEOUT_SECS) {
        settings.write_timeout = parse_timeout(keys::WRITE_TIMEOUT_SECS, v)?;
    }
    if let Some(v) = non_empty(section, keys::STATUS_BIND) {
        settings.status_bind = Some(parse_value(keys::STATUS_BIND, v)?);
    }

    settings.validate()?;
    Ok(settings)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, value, e.to_string()))
}

fn parse_timeout(key: &str, value: &str) -> Result<Option<Duration>, ConfigError> {
    let secs: u64 = parse_value(key, value)?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
