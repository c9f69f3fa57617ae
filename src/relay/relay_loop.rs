//! The main relay loop.

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::core::timing::{POSITION_REPORT_INTERVAL, RETRY_DELAY};
use crate::core::{Connector, RELAY_CHUNK_SIZE, RelayError, Signal};
use crate::ntrip::NtripSession;
use crate::status::SharedStatus;

/// What a single [`RelayLoop::step`] did.
#[derive(Debug)]
pub enum StepOutcome {
    /// Connected and sent the stream request.
    Reconnected,
    /// Connect or request failed; wait the retry delay before the next step.
    Retry(RelayError),
    /// The transport failed while streaming; the next step reconnects.
    Lost(RelayError),
    /// Streamed normally.
    Relayed {
        /// Correction bytes forwarded to the sink.
        bytes: usize,
        /// Whether a position report was sent.
        reported: bool,
    },
}

impl StepOutcome {
    /// Whether the caller should wait before stepping again.
    pub fn needs_backoff(&self) -> bool {
        matches!(self, Self::Retry(_))
    }
}

/// Keeps the caster session up, forwards corrections to the receiver and
/// reports the last known position back to the caster.
///
/// Connectivity is read from [`SharedStatus`] at the start of every step, so
/// a disconnect forced by the health monitor is handled by the same
/// reconnect path as a transport error.
pub struct RelayLoop<C: Connector, W: Write> {
    session: NtripSession<C>,
    sink: W,
    status: Arc<SharedStatus>,
    retry_delay: Duration,
    report_interval: Duration,
    last_report: Option<Instant>,
    buf: Vec<u8>,
}

impl<C: Connector, W: Write> RelayLoop<C, W> {
    /// Create a loop relaying into `sink`.
    ///
    /// The first position report is due one interval after the first step.
    pub fn new(session: NtripSession<C>, sink: W, status: Arc<SharedStatus>) -> Self {
        Self {
            session,
            sink,
            status,
            retry_delay: RETRY_DELAY,
            report_interval: POSITION_REPORT_INTERVAL,
            last_report: None,
            buf: vec![0u8; RELAY_CHUNK_SIZE],
        }
    }

    /// Override the delay after a failed connection attempt.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Override the position report interval.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// The caster session.
    pub fn session(&self) -> &NtripSession<C> {
        &self.session
    }

    /// The correction sink.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Run one iteration using the current time.
    pub fn step(&mut self) -> StepOutcome {
        self.step_at(Instant::now())
    }

    /// Run one iteration as if the clock read `now`.
    pub fn step_at(&mut self, now: Instant) -> StepOutcome {
        self.last_report.get_or_insert(now);
        if !self.status.is_connected() || !self.session.is_streaming() {
            if self.status.mark_disconnected() {
                info!("caster link down, reconnecting");
            }
            return self.reconnect();
        }

        let bytes = match self.session.read(&mut self.buf) {
            Ok(n) => n,
            Err(e) => {
                self.status.mark_disconnected();
                warn!(error = %e, "caster stream lost");
                return StepOutcome::Lost(e);
            }
        };
        if bytes > 0 {
            self.forward(bytes);
        }

        let reported = self.report_position(now);
        StepOutcome::Relayed { bytes, reported }
    }

    /// Run until `shutdown` is raised.
    pub fn run(mut self, shutdown: &Signal) {
        info!(
            host = %self.session.config().host,
            mountpoint = %self.session.config().mountpoint,
            "relay loop started"
        );
        while !shutdown.is_raised() {
            if self.step().needs_backoff() {
                thread::sleep(self.retry_delay);
            }
        }
        self.status.mark_disconnected();
        self.session.disconnect();
        info!("relay loop stopped");
    }

    fn reconnect(&mut self) -> StepOutcome {
        if let Err(e) = self.session.connect() {
            return self.retry(e);
        }
        self.status.reset_retries();

        if let Err(e) = self.session.authenticate() {
            return self.retry(e);
        }
        self.status.mark_streaming(self.session.closer());
        StepOutcome::Reconnected
    }

    fn retry(&mut self, error: RelayError) -> StepOutcome {
        self.session.disconnect();
        let retries = self.status.record_retry();
        warn!(retries, error = %error, "caster unavailable, will retry");
        StepOutcome::Retry(error)
    }

    fn forward(&mut self, bytes: usize) {
        if let Err(e) = self.sink.write_all(&self.buf[..bytes]) {
            warn!(bytes, error = %e, "writing corrections to the receiver failed");
        }
        let total = self.status.add_relayed_bytes(bytes);
        trace!(bytes, total, "corrections relayed");
    }

    /// Send the last position if the interval has elapsed.
    ///
    /// The timer restarts whether or not a report goes out; a failed report
    /// waits for the next interval.
    fn report_position(&mut self, now: Instant) -> bool {
        let last = *self.last_report.get_or_insert(now);
        if now.saturating_duration_since(last) < self.report_interval {
            return false;
        }
        self.last_report = Some(now);

        let position = self.status.last_position();
        if position.is_empty() {
            debug!("no position yet, report skipped");
            return false;
        }

        match self.session.send_position(&position) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "position report failed");
                if !self.session.is_connected() {
                    self.status.mark_disconnected();
                }
                false
            }
        }
    }
}

impl<C: Connector, W: Write> std::fmt::Debug for RelayLoop<C, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayLoop")
            .field("session", &self.session)
            .field("retry_delay", &self.retry_delay)
            .field("report_interval", &self.report_interval)
            .finish_non_exhaustive()
    }
}
