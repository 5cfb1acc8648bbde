//! Gripsense Core - `no_std` compatible types and wire protocol
//!
//! This crate provides the foundational types, orientation math, and wire
//! protocol definitions for the gripsense motion-capture glove SDK. It is
//! designed to work in `no_std` environments (firmware, bridges) as well as
//! `std` environments (the host session crate).
//!
//! # Modules
//!
//! - [`types`]: Core data types (hands, poses, telemetry, skeletal model)
//! - [`math`]: Quaternion and vector primitives
//! - [`protocol`]: Fixed byte layouts crossing the host/device boundary
//! - [`error`]: Protocol error types
//!
//! # Features
//!
//! - `std`: Enable standard library support (default)
//! - `defmt`: Enable `defmt` formatting for embedded logging
//!
//! # Example
//!
//! ```rust
//! use gripsense_core::math::{Quaternion, Vector3};
//!
//! let half_turn = Quaternion::new(0.0, 0.0, 0.0, 1.0);
//! let composed = half_turn * Quaternion::IDENTITY;
//! assert_eq!(composed, half_turn);
//!
//! let euler = Vector3::new(core::f32::consts::PI, 0.0, 0.0);
//! assert!((euler.to_degrees().x - 180.0).abs() < 1e-4);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod math;
pub mod protocol;
pub mod types;

// Re-export commonly used types at crate root
pub use error::ProtocolError;
pub use math::{Quaternion, Vector3};
pub use protocol::{CalibReport, DeviceType, GloveReport, RumbleReport};
pub use types::{
    CalibrationOptions, Finger, FingerSkeleton, Hand, HandSkeleton, Pose, TelemetryRecord,
};
