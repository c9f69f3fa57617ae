//! Transport seam between the NTRIP session and the network.
//!
//! The session only needs a blocking byte stream whose reads time out
//! quickly when nothing is pending, plus a way to tear the stream down from
//! another thread. [`crate::ntrip::TcpConnector`] provides both on top of
//! `std::net::TcpStream`.

use std::io::{self, Read, Write};

/// Opens transports to a caster.
pub trait Connector: Send {
    /// Stream type produced by this connector.
    type Stream: Transport;

    /// Open a new transport to `host:port`.
    fn connect(&self, host: &str, port: u16) -> io::Result<Self::Stream>;
}

/// A connected byte stream to the caster.
///
/// # Requirements
///
/// - `read` MUST return [`io::ErrorKind::WouldBlock`] or
///   [`io::ErrorKind::TimedOut`] when no data arrives within a short poll
///   window, and `Ok(0)` only when the peer closed the stream.
/// - Closers obtained from [`Transport::closer`] MUST be safe to invoke while
///   another thread is blocked in `write` on the same stream.
pub trait Transport: Read + Write + Send {
    /// Transport-level liveness check.
    fn is_alive(&self) -> bool;

    /// Handle that can shut this stream down from another thread.
    fn closer(&self) -> io::Result<Box<dyn TransportCloser>>;
}

/// Shuts a transport down from outside the thread that owns it.
pub trait TransportCloser: Send {
    /// Close the underlying stream. Calling it more than once is harmless.
    fn close(&self);
}
