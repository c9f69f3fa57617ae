//! # NTRIP Relay
//!
//! Core of an NTRIP correction bridge: it keeps a client session with an
//! NTRIP caster, forwards the RTCM correction stream to a GNSS receiver's
//! serial port, and reports the receiver's position back to the caster so
//! network RTK services can generate corrections for it.
//!
//! The relay is built from independent blocking tasks, each meant for its
//! own thread, that share one [`SharedStatus`]:
//!
//! - **Relay loop**: reconnects with a flat retry, relays corrections, and
//!   reports the last position every five seconds
//! - **Serial ingest**: extracts position sentences from the receiver
//! - **Health monitor**: forces a reconnect when corrections stop flowing
//!   or when the operator asks for one
//!
//! ## Feature Flags
//!
//! - `tcp` (default): blocking std TCP connector
//! - `config-file` (default): `KEY=VALUE` configuration loader
//!
//! ## Modules
//!
//! - [`core`]: constants, errors, the transport seam and [`Signal`]
//! - [`ntrip`]: authentication, wire format and the caster session
//! - [`status`]: shared status and fix-quality classification
//! - [`relay`]: the relay tasks
//! - [`config`]: caster and bridge settings
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::thread;
//!
//! use ntrip_relay::prelude::*;
//!
//! let caster = CasterConfig::new("caster.example", 2101, "RTCM3", "user", "secret");
//! let status = Arc::new(SharedStatus::new());
//! let shutdown = Signal::new();
//!
//! let session = NtripSession::new(caster, TcpConnector::new());
//! let relay = RelayLoop::new(session, std::io::sink(), status.clone());
//! let monitor = HealthMonitor::new(status.clone(), Signal::new());
//!
//! let stop = shutdown.clone();
//! thread::spawn(move || monitor.run(&stop));
//! relay.run(&shutdown);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

pub mod config;
pub mod ntrip;
pub mod relay;
pub mod status;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;

    pub use crate::config::{BridgeSettings, CasterConfig, ConfigError};
    pub use crate::ntrip::{AuthToken, NtripSession, SessionState, make_auth_token};
    pub use crate::relay::{HealthMonitor, RelayLoop, SerialIngest, StepOutcome};
    pub use crate::status::{FixQuality, SharedStatus, StatusSnapshot};

    #[cfg(feature = "tcp")]
    pub use crate::ntrip::TcpConnector;
}

// Re-export commonly used items at crate root
pub use crate::core::{RelayError, RelayResult, Signal};
pub use status::{FixQuality, SharedStatus, StatusSnapshot};

#[cfg(feature = "tcp")]
pub use ntrip::TcpConnector;
