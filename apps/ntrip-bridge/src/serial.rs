//! Receiver serial port.

use ntrip_relay::core::timing::SERIAL_IDLE_DELAY;
use serialport::SerialPort;
use tracing::info;

use crate::error::BridgeError;

/// The two halves of an open receiver port: one for ingest, one for relay.
pub struct ReceiverPort {
    /// Read half, for the serial ingest thread.
    pub reader: Box<dyn SerialPort>,
    /// Write half, for the relay loop.
    pub writer: Box<dyn SerialPort>,
}

/// Open `path` at `baud` and split it into a reader and a writer.
///
/// Reads time out after a short idle window so the ingest loop can observe
/// shutdown.
pub fn open(path: &str, baud: u32) -> Result<ReceiverPort, BridgeError> {
    let to_error = |source| BridgeError::Serial {
        port: path.to_string(),
        source,
    };

    let reader = serialport::new(path, baud)
        .timeout(SERIAL_IDLE_DELAY)
        .open()
        .map_err(to_error)?;
    let writer = reader.try_clone().map_err(to_error)?;
    info!(port = path, baud, "serial port open");
    Ok(ReceiverPort { reader, writer })
}
