//! Periodic status output.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ntrip_relay::core::timing::STATUS_REPORT_PERIOD;
use ntrip_relay::{FixQuality, SharedStatus, Signal, StatusSnapshot};
use tracing::info;

/// Correction throughput from successive byte counter samples.
#[derive(Debug, Clone)]
pub struct RateTracker {
    previous: u64,
    at: Instant,
}

impl RateTracker {
    /// Start tracking from `total` bytes at `now`.
    pub fn new(total: u64, now: Instant) -> Self {
        Self { previous: total, at: now }
    }

    /// Bytes per second since the previous sample.
    ///
    /// A sample taken at the same instant reports the raw delta.
    pub fn sample(&mut self, total: u64, now: Instant) -> u64 {
        let delta = total.saturating_sub(self.previous);
        let elapsed_ms = now.saturating_duration_since(self.at).as_millis() as u64;
        self.previous = total;
        self.at = now;
        if elapsed_ms == 0 {
            delta
        } else {
            delta.saturating_mul(1000) / elapsed_ms
        }
    }
}

/// One rendered status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Correction rate in bytes per second.
    pub rate: u64,
    /// Total corrections relayed, in KiB.
    pub total_kib: u64,
    /// Whether the caster link is up.
    pub connected: bool,
    /// Failed attempts since the last successful connect.
    pub retries: u32,
    /// Raw fix-quality character, if the sentence has one.
    pub indicator: Option<char>,
    /// Fix-quality category.
    pub quality: FixQuality,
    /// Last position sentence.
    pub sentence: String,
}

impl StatusLine {
    /// Build a line from a snapshot and the current rate.
    pub fn new(snapshot: StatusSnapshot, rate: u64) -> Self {
        Self {
            rate,
            total_kib: snapshot.byte_counter / 1024,
            connected: snapshot.connected,
            retries: snapshot.retry_count,
            indicator: FixQuality::indicator(&snapshot.last_position),
            quality: snapshot.fix_quality(),
            sentence: snapshot.last_position,
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rate {} B/s, total {} KiB, ", self.rate, self.total_kib)?;
        if self.connected {
            f.write_str("NTRIP connected")?;
        } else {
            write!(f, "NTRIP NOK (retries {})", self.retries)?;
        }
        match self.indicator {
            Some(c) => write!(f, ", quality {c} ({})", self.quality),
            None => write!(f, ", quality - ({})", self.quality),
        }
    }
}

/// Logs a [`StatusLine`] once per period.
pub struct StatusReporter {
    status: Arc<SharedStatus>,
    period: Duration,
}

impl StatusReporter {
    /// Create a reporter emitting once per second.
    pub fn new(status: Arc<SharedStatus>) -> Self {
        Self {
            status,
            period: STATUS_REPORT_PERIOD,
        }
    }

    /// Run until `shutdown` is raised.
    pub fn run(self, shutdown: &Signal) {
        let mut rate = RateTracker::new(self.status.byte_counter(), Instant::now());
        loop {
            thread::sleep(self.period);
            if shutdown.is_raised() {
                break;
            }
            let snapshot = self.status.snapshot();
            let bytes_per_sec = rate.sample(snapshot.byte_counter, Instant::now());
            let line = StatusLine::new(snapshot, bytes_per_sec);
            info!(sentence = %line.sentence, "{line}");
        }
    }
}
