//! Bridge errors.

use std::io;
use std::path::PathBuf;

use ntrip_relay::config::ConfigError;
use thiserror::Error;

/// Failures that stop the bridge before or while it starts its tasks.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Logging could not be initialised.
    #[error("failed to initialize logging: {0}")]
    Logging(#[source] io::Error),

    /// The configuration file is unreadable or invalid.
    #[error("configuration error in {path}: {source}")]
    Config {
        /// Configuration file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ConfigError,
    },

    /// The receiver's serial port could not be opened.
    #[error("failed to open serial port {port}: {source}")]
    Serial {
        /// Device path.
        port: String,
        /// Underlying error.
        #[source]
        source: serialport::Error,
    },

    /// A worker thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name.
        name: &'static str,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The signal runtime failed.
    #[error("runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl BridgeError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            _ => 1,
        }
    }
}
