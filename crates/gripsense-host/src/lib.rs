//! Gripsense Host - blocking device session for motion-capture gloves
//!
//! This crate provides the host-side API for gripsense gloves:
//! - Session lifecycle (init, shutdown) over a pluggable transport
//! - Per-hand telemetry and skeletal polling with caller deadlines
//! - Handedness, calibration, haptics and auxiliary device controls
//!
//! # Modules
//!
//! - [`session`]: [`GloveSession`] and its operation set
//! - [`transport`]: the byte-level seam a USB or BLE backend implements
//! - [`error`]: [`SessionError`] and the legacy numeric [`ResultCode`]
//!
//! The wire layouts and value types live in `gripsense-core`; this crate
//! only moves and interprets them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod session;
pub mod transport;

// Re-export key types
pub use error::{ResultCode, SessionError, SessionResult};
pub use session::{GloveSession, DEFAULT_SKELETAL_TIMEOUT};
pub use transport::{GloveTransport, TransportError, TransportProvider};
