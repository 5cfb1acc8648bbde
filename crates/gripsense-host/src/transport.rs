//! Transport seam between the session and a concrete glove backend.
//!
//! The session never opens USB or BLE itself. A backend implements
//! [`GloveTransport`] for one connected glove endpoint and
//! [`TransportProvider`] to hand endpoints out at init time; the session
//! only moves the fixed-layout payloads defined in `gripsense-core`
//! through these methods.
//!
//! The method set mirrors the glove's characteristic map: a notify stream
//! of raw sensor reports, an on-demand skeletal payload, and small
//! read/write control characteristics (flags, rumble, battery, RSSI).

use thiserror::Error;

use gripsense_core::Hand;

/// Errors surfaced by a transport backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport layer itself is unavailable (driver missing, radio
    /// off). Fails session init.
    #[error("Transport unavailable: {0}")]
    Unavailable(String),

    /// The endpoint dropped; the glove is gone until re-init.
    #[error("Endpoint closed")]
    Closed,

    /// I/O failure on an open endpoint
    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One connected glove endpoint.
///
/// All methods are blocking but short: reads and writes target single
/// characteristics, and [`poll_report`](Self::poll_report) is
/// non-blocking. Deadlines are the session's job.
pub trait GloveTransport: Send {
    /// Poll for the newest raw sensor report.
    ///
    /// Returns `Ok(None)` when no report arrived since the last poll.
    /// The payload is the packed 20-byte report layout.
    ///
    /// # Errors
    ///
    /// [`TransportError::Closed`] once the endpoint has dropped.
    fn poll_report(&mut self) -> Result<Option<Vec<u8>>, TransportError>;

    /// Poll for a device-derived skeletal payload (588 bytes).
    ///
    /// Returns `Ok(None)` while the device is still computing one.
    ///
    /// # Errors
    ///
    /// [`TransportError::Closed`] once the endpoint has dropped.
    fn poll_skeletal(&mut self) -> Result<Option<Vec<u8>>, TransportError>;

    /// Read the persistent flags byte.
    ///
    /// # Errors
    ///
    /// Transport failure reading the characteristic.
    fn read_flags(&mut self) -> Result<u8, TransportError>;

    /// Write the persistent flags byte.
    ///
    /// # Errors
    ///
    /// Transport failure writing the characteristic.
    fn write_flags(&mut self, flags: u8) -> Result<(), TransportError>;

    /// Write a rumble payload (2 bytes, raw motor power).
    ///
    /// # Errors
    ///
    /// Transport failure writing the characteristic.
    fn write_rumble(&mut self, payload: &[u8]) -> Result<(), TransportError>;

    /// Read the battery voltage in millivolts.
    ///
    /// # Errors
    ///
    /// Transport failure reading the characteristic.
    fn read_battery_voltage(&mut self) -> Result<u16, TransportError>;

    /// Read the battery charge percentage (0 to 100).
    ///
    /// # Errors
    ///
    /// Transport failure reading the characteristic.
    fn read_battery_percentage(&mut self) -> Result<u8, TransportError>;

    /// Read the link signal strength in dBm.
    ///
    /// # Errors
    ///
    /// Transport failure querying the link.
    fn read_rssi(&mut self) -> Result<i16, TransportError>;

    /// Command the glove to power down. The endpoint closes shortly
    /// after.
    ///
    /// # Errors
    ///
    /// Transport failure sending the command.
    fn power_off(&mut self) -> Result<(), TransportError>;
}

/// Source of glove endpoints, consulted once per hand at session init.
pub trait TransportProvider {
    /// Open the endpoint for one hand.
    ///
    /// `Ok(None)` means no glove for that hand is present; the session
    /// initializes anyway and the hand reports disconnected on use.
    ///
    /// # Errors
    ///
    /// [`TransportError::Unavailable`] when the transport layer itself
    /// cannot operate; this fails session init.
    fn open(&mut self, hand: Hand) -> Result<Option<Box<dyn GloveTransport>>, TransportError>;
}
