//! Relay configuration.
//!
//! [`CasterConfig`] is what the session needs; [`BridgeSettings`] is the
//! full set a deployment reads from its `KEY=VALUE` file (see
//! [`BridgeSettings::load_from`], `config-file` feature).

mod error;
#[cfg(feature = "config-file")]
mod file;
mod settings;

pub use error::ConfigError;
#[cfg(feature = "config-file")]
pub use file::keys;
pub use settings::{BridgeSettings, CasterConfig};
