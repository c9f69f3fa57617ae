//! Relay constants.
//!
//! Values under `timing` match the cadence of the field units the relay
//! replaces; downstream displays and casters have been tuned against them.

// =============================================================================
// PROTOCOL
// =============================================================================

/// User agent announced to the caster.
pub const USER_AGENT: &str = "NTRIP SimpleClient/1.0";

/// Line terminator for requests and position reports.
pub const CRLF: &str = "\r\n";

// =============================================================================
// NMEA
// =============================================================================

/// Sentence identifier accepted as a position report.
pub const DEFAULT_SENTENCE_PREFIX: &str = "$GPGGA";

/// NMEA field delimiter.
pub const FIELD_DELIMITER: char = ',';

/// Index of the fix-quality field in a GGA sentence.
pub const FIX_QUALITY_FIELD: usize = 6;

/// Longest serial line kept before it is discarded as noise.
pub const MAX_SENTENCE_LEN: usize = 1024;

// =============================================================================
// BUFFERS
// =============================================================================

/// Bytes pulled from the caster per relay iteration.
pub const RELAY_CHUNK_SIZE: usize = 128;

/// Bytes pulled from the serial port per ingest read.
pub const SERIAL_CHUNK_SIZE: usize = 256;

// =============================================================================
// SERIAL
// =============================================================================

/// Default receiver baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Timing constants for the relay tasks.
pub mod timing {
    use std::time::Duration;

    /// Flat delay after a failed connect or authenticate.
    pub const RETRY_DELAY: Duration = Duration::from_millis(200);

    /// Minimum spacing between two position reports.
    pub const POSITION_REPORT_INTERVAL: Duration = Duration::from_millis(5000);

    /// Health monitor sampling period (also the liveness window).
    pub const HEALTH_CHECK_PERIOD: Duration = Duration::from_millis(2000);

    /// Sleep when the serial port has nothing to read.
    pub const SERIAL_IDLE_DELAY: Duration = Duration::from_millis(10);

    /// Read timeout on the caster link; bounds one relay poll.
    pub const READ_POLL_TIMEOUT: Duration = Duration::from_millis(10);

    /// Status reporter refresh period.
    pub const STATUS_REPORT_PERIOD: Duration = Duration::from_millis(1000);

    /// Default TCP connect timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default TCP write timeout.
    pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);
}
