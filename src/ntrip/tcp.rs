//! Blocking TCP transport for the caster link.
//!
//! Reads use a short timeout so the relay loop can poll for corrections
//! without parking on the socket; writes block up to the write timeout.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::core::timing::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_WRITE_TIMEOUT, READ_POLL_TIMEOUT};
use crate::core::{Connector, Transport, TransportCloser};

/// Opens [`TcpTransport`]s.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    connect_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    poll_timeout: Duration,
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl TcpConnector {
    /// Connector with the default timeouts.
    pub fn new() -> Self {
        Self {
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            write_timeout: Some(DEFAULT_WRITE_TIMEOUT),
            poll_timeout: READ_POLL_TIMEOUT,
        }
    }

    /// Set the connect timeout (`None` waits for the OS).
    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the write timeout (`None` blocks indefinitely).
    pub fn write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set the read poll window. Zero is rounded up to one millisecond.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    fn open(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        let Some(timeout) = self.connect_timeout else {
            return TcpStream::connect((host, port));
        };

        let mut last_err = None;
        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!(%addr, error = %e, "address attempt failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no addresses for {host}"))
        }))
    }
}

impl Connector for TcpConnector {
    type Stream = TcpTransport;

    fn connect(&self, host: &str, port: u16) -> io::Result<TcpTransport> {
        let stream = self.open(host, port)?;
        stream.set_read_timeout(Some(self.poll_timeout))?;
        stream.set_write_timeout(self.write_timeout)?;
        stream.set_nodelay(true)?;
        Ok(TcpTransport { stream })
    }
}

/// A caster connection over TCP.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// The underlying stream.
    pub fn inner(&self) -> &TcpStream {
        &self.stream
    }
}

impl Read for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TcpTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Transport for TcpTransport {
    fn is_alive(&self) -> bool {
        matches!(self.stream.take_error(), Ok(None)) && self.stream.peer_addr().is_ok()
    }

    fn closer(&self) -> io::Result<Box<dyn TransportCloser>> {
        Ok(Box::new(TcpCloser {
            stream: self.stream.try_clone()?,
        }))
    }
}

/// Shuts a [`TcpTransport`] down from another thread.
///
/// `shutdown` on a cloned handle wakes any in-flight read or write on the
/// original with an error or EOF.
#[derive(Debug)]
pub struct TcpCloser {
    stream: TcpStream,
}

impl TransportCloser for TcpCloser {
    fn close(&self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            if e.kind() != io::ErrorKind::NotConnected {
                debug!(error = %e, "transport shutdown failed");
            }
        }
    }
}
