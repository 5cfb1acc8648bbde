//! Error types for the gripsense wire protocol
//!
//! These errors work in `no_std` environments and carry enough context to
//! diagnose a malformed payload without heap allocation.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors decoding or encoding a fixed-layout payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolError {
    /// Not enough bytes for the expected layout
    IncompletePacket {
        /// Bytes received
        received: usize,
        /// Bytes expected
        expected: usize,
    },
    /// Destination buffer too small for the encoded layout
    BufferOverflow {
        /// Required size
        required: usize,
        /// Available size
        available: usize,
    },
    /// Report carried an unknown device type byte
    UnknownDeviceType {
        /// The value that was read
        value: u8,
    },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompletePacket { received, expected } => {
                write!(f, "Incomplete packet: got {received}/{expected} bytes")
            }
            Self::BufferOverflow {
                required,
                available,
            } => {
                write!(f, "Buffer overflow: need {required} bytes, have {available}")
            }
            Self::UnknownDeviceType { value } => {
                write!(f, "Unknown device type: 0x{value:02X}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

#[cfg(feature = "defmt")]
impl defmt::Format for ProtocolError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::IncompletePacket { received, expected } => {
                defmt::write!(f, "Incomplete: {}/{}", received, expected);
            }
            Self::BufferOverflow {
                required,
                available,
            } => {
                defmt::write!(f, "Overflow: {} > {}", required, available);
            }
            Self::UnknownDeviceType { value } => {
                defmt::write!(f, "Bad device type: {:02X}", value);
            }
        }
    }
}
