//! Scripted in-memory transport for unit tests.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{Connector, Transport, TransportCloser};

#[derive(Debug, Default)]
struct LinkState {
    inbound: VecDeque<Vec<u8>>,
    writes: Vec<Vec<u8>>,
    alive: bool,
    connect_failures: usize,
    connects: usize,
    closes: usize,
    write_budget: Option<usize>,
    fail_reads: bool,
}

/// Shared view of a scripted link; every transport it hands out talks to
/// the same state.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockLink {
    state: Arc<Mutex<LinkState>>,
}

impl MockLink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LinkState> {
        self.state.lock().unwrap()
    }

    /// Queue a chunk the caster will deliver.
    pub(crate) fn push_inbound(&self, chunk: &[u8]) {
        self.lock().inbound.push_back(chunk.to_vec());
    }

    /// Make the next `n` connect attempts fail.
    pub(crate) fn fail_connects(&self, n: usize) {
        self.lock().connect_failures = n;
    }

    /// Accept at most `bytes` more written bytes, then report zero-length writes.
    pub(crate) fn limit_writes(&self, bytes: usize) {
        self.lock().write_budget = Some(bytes);
    }

    /// Make reads fail with a reset.
    pub(crate) fn fail_reads(&self) {
        self.lock().fail_reads = true;
    }

    /// Simulate the peer closing the stream.
    pub(crate) fn drop_peer(&self) {
        self.lock().alive = false;
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.lock().alive
    }

    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().writes.clone()
    }

    pub(crate) fn written(&self) -> Vec<u8> {
        self.lock().writes.concat()
    }

    pub(crate) fn connects(&self) -> usize {
        self.lock().connects
    }

    pub(crate) fn closes(&self) -> usize {
        self.lock().closes
    }

    pub(crate) fn connector(&self) -> MockConnector {
        MockConnector { link: self.clone() }
    }
}

pub(crate) struct MockConnector {
    link: MockLink,
}

impl Connector for MockConnector {
    type Stream = MockTransport;

    fn connect(&self, _host: &str, _port: u16) -> io::Result<MockTransport> {
        let mut state = self.link.lock();
        if state.connect_failures > 0 {
            state.connect_failures -= 1;
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        state.connects += 1;
        state.alive = true;
        state.fail_reads = false;
        Ok(MockTransport {
            link: self.link.clone(),
        })
    }
}

pub(crate) struct MockTransport {
    link: MockLink,
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.link.lock();
        if state.fail_reads {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        }
        if !state.alive {
            return Ok(0);
        }
        let Some(mut chunk) = state.inbound.pop_front() else {
            return Err(io::Error::new(io::ErrorKind::WouldBlock, "no data"));
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            state.inbound.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.link.lock();
        if !state.alive {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }
        let n = match state.write_budget {
            Some(budget) => budget.min(buf.len()),
            None => buf.len(),
        };
        if let Some(budget) = state.write_budget.as_mut() {
            *budget -= n;
        }
        if n > 0 {
            state.writes.push(buf[..n].to_vec());
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for MockTransport {
    fn is_alive(&self) -> bool {
        self.link.is_alive()
    }

    fn closer(&self) -> io::Result<Box<dyn TransportCloser>> {
        Ok(Box::new(MockCloser {
            link: self.link.clone(),
        }))
    }
}

struct MockCloser {
    link: MockLink,
}

impl TransportCloser for MockCloser {
    fn close(&self) {
        let mut state = self.link.lock();
        state.alive = false;
        state.closes += 1;
    }
}
