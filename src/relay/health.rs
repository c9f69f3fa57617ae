//! Link health monitor.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::core::timing::HEALTH_CHECK_PERIOD;
use crate::core::{RelayError, Signal};
use crate::status::SharedStatus;

/// Forces a reconnect when corrections stop flowing or the operator asks.
///
/// Every period the monitor compares the relayed byte counter with its
/// previous sample. A zero delta while connected, or a pending operator
/// stop, marks the status disconnected and closes the transport. The relay
/// loop then takes its normal reconnect path.
pub struct HealthMonitor {
    status: Arc<SharedStatus>,
    operator_stop: Signal,
    period: Duration,
    previous: u64,
}

impl HealthMonitor {
    /// Create a monitor sampling every two seconds.
    pub fn new(status: Arc<SharedStatus>, operator_stop: Signal) -> Self {
        let previous = status.byte_counter();
        Self {
            status,
            operator_stop,
            period: HEALTH_CHECK_PERIOD,
            previous,
        }
    }

    /// Override the sampling period (also the liveness window).
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Sampling period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Take one sample.
    ///
    /// Returns the reason when this sample forced a disconnect. Samples that
    /// find the status already disconnected do nothing, so a dead link is
    /// closed once, not once per window.
    pub fn sample(&mut self) -> Option<RelayError> {
        let current = self.status.byte_counter();
        let delta = current.saturating_sub(self.previous);
        self.previous = current;

        let reason = if self.operator_stop.take() {
            RelayError::OperatorStop
        } else if delta == 0 {
            RelayError::LivenessTimeout(self.period)
        } else {
            return None;
        };

        if self.status.force_disconnect() {
            warn!(%reason, "health check forced disconnect");
            Some(reason)
        } else {
            None
        }
    }

    /// Run until `shutdown` is raised.
    pub fn run(mut self, shutdown: &Signal) {
        info!(period_ms = self.period.as_millis() as u64, "health monitor started");
        loop {
            thread::sleep(self.period);
            if shutdown.is_raised() {
                break;
            }
            self.sample();
        }
        info!("health monitor stopped");
    }
}
