//! Error types for the relay.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by the session, the relay loop and the health monitor.
///
/// None of these are fatal to the process: connect and write failures feed
/// the retry path, liveness and operator stops become forced disconnects.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Transport to the caster could not be established.
    #[error("connection to {host}:{port} failed: {source}")]
    Connect {
        /// Caster host.
        host: String,
        /// Caster port.
        port: u16,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A request or position report was not written in full.
    #[error("failed to write {what}: {written} of {expected} bytes sent")]
    Write {
        /// What was being written (request, position report).
        what: &'static str,
        /// Bytes accepted by the transport.
        written: usize,
        /// Bytes that should have been written.
        expected: usize,
        /// I/O error that cut the write short, if any.
        #[source]
        source: Option<io::Error>,
    },

    /// Reading from the caster failed.
    #[error("read from caster failed: {0}")]
    Read(#[source] io::Error),

    /// The caster closed the connection.
    #[error("caster closed the connection")]
    Closed,

    /// Operation requires an established transport.
    #[error("not connected to caster")]
    NotConnected,

    /// No correction bytes were relayed within the health window.
    #[error("no correction data relayed within {0:?}")]
    LivenessTimeout(Duration),

    /// The operator asked for the link to be dropped.
    #[error("operator requested disconnect")]
    OperatorStop,
}

impl RelayError {
    /// Whether this error is one the health monitor raises to force a
    /// reconnect (as opposed to a transport failure).
    pub fn is_forced_disconnect(&self) -> bool {
        matches!(self, Self::LivenessTimeout(_) | Self::OperatorStop)
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
