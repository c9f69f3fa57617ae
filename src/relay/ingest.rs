//! Serial ingest task.

use std::io::{self, Read};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::lines::LineAssembler;
use crate::core::timing::SERIAL_IDLE_DELAY;
use crate::core::{DEFAULT_SENTENCE_PREFIX, SERIAL_CHUNK_SIZE, Signal};
use crate::status::SharedStatus;

/// Reads the receiver's serial stream and publishes position sentences.
pub struct SerialIngest<R: Read> {
    source: R,
    status: Arc<SharedStatus>,
    prefix: String,
    lines: LineAssembler,
    idle_delay: Duration,
    buf: Vec<u8>,
}

impl<R: Read> SerialIngest<R> {
    /// Create an ingest task accepting `$GPGGA` sentences.
    pub fn new(source: R, status: Arc<SharedStatus>) -> Self {
        Self {
            source,
            status,
            prefix: DEFAULT_SENTENCE_PREFIX.to_string(),
            lines: LineAssembler::new(),
            idle_delay: SERIAL_IDLE_DELAY,
            buf: vec![0u8; SERIAL_CHUNK_SIZE],
        }
    }

    /// Accept sentences starting with `prefix` instead.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sleep used when the port has nothing to read.
    pub fn with_idle_delay(mut self, delay: Duration) -> Self {
        self.idle_delay = delay;
        self
    }

    /// Perform one read and publish any accepted sentences.
    ///
    /// Returns the number of sentences accepted; `Ok(0)` when the port had
    /// nothing to offer.
    pub fn poll(&mut self) -> io::Result<usize> {
        let n = self.read_chunk()?;
        Ok(self.publish(n))
    }

    fn read_chunk(&mut self) -> io::Result<usize> {
        match self.source.read(&mut self.buf) {
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    fn publish(&mut self, n: usize) -> usize {
        let mut accepted = 0;
        for line in self.lines.push(&self.buf[..n]) {
            if self.accept(line) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Publish `line` if it carries the expected sentence identifier.
    pub fn accept(&self, line: String) -> bool {
        if line.starts_with(&self.prefix) {
            trace!(sentence = %line, "position sentence accepted");
            self.status.set_last_position(line);
            true
        } else {
            trace!(line = %line, "serial line ignored");
            false
        }
    }

    /// Run until `shutdown` is raised.
    pub fn run(mut self, shutdown: &Signal) {
        info!(prefix = %self.prefix, "serial ingest started");
        while !shutdown.is_raised() {
            match self.read_chunk() {
                Ok(0) => thread::sleep(self.idle_delay),
                Ok(n) => {
                    let accepted = self.publish(n);
                    if accepted > 0 {
                        debug!(accepted, "position updated");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "serial read failed");
                    thread::sleep(self.idle_delay);
                }
            }
        }
        info!("serial ingest stopped");
    }
}
