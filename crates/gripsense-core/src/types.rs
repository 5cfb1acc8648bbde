//! Core data types for the gripsense glove SDK
//!
//! This module provides the data model shared by the host session and the
//! device firmware:
//! - Hand and finger addressing
//! - [`Pose`]: rigid transform of one joint relative to its parent frame
//! - [`TelemetryRecord`]: one polled sensor snapshot per hand
//! - [`FingerSkeleton`] / [`HandSkeleton`]: device-derived pose tree
//! - Glove flag bits and [`CalibrationOptions`]

use serde::{Deserialize, Serialize};

use crate::math::{Quaternion, Vector3};

/// Number of digits per hand, thumb through pinky.
pub const FINGER_COUNT: usize = 5;

// ============================================================================
// Hand & Finger Addressing
// ============================================================================

/// One of the two independently addressable glove endpoints.
///
/// Exactly two hands exist; the discriminants are the on-wire `i32` values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Hand {
    /// Left-hand glove
    Left = 0,
    /// Right-hand glove
    Right = 1,
}

impl Hand {
    /// Both hands, in wire order.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// Decode a wire value. Anything other than 0 or 1 is invalid.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }

    /// Index into per-hand tables (`0` for left, `1` for right).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The opposite hand.
    #[inline]
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Hand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Left => defmt::write!(f, "L"),
            Self::Right => defmt::write!(f, "R"),
        }
    }
}

/// One digit of a hand, in telemetry array order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Finger {
    /// Thumb (no meaningful intermediate phalanx)
    Thumb = 0,
    /// Index finger
    Index = 1,
    /// Middle finger
    Middle = 2,
    /// Ring finger
    Ring = 3,
    /// Pinky
    Pinky = 4,
}

impl Finger {
    /// All five digits in telemetry array order.
    pub const ALL: [Self; FINGER_COUNT] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    /// Position of this digit in the telemetry finger array.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ============================================================================
// Pose & Telemetry
// ============================================================================

/// Rigid transform (orientation + position) of one joint or bone segment,
/// relative to its parent frame. Positions are in millimeters.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct Pose {
    /// Orientation relative to the parent frame
    pub orientation: Quaternion,
    /// Position relative to the parent frame, in millimeters
    pub position: Vector3,
}

/// One polled sensor snapshot from one hand.
///
/// A snapshot, not a stream element: repeated polls may return the same
/// `packet_number` when no new sample arrived within the polling interval.
/// Callers detect staleness by comparing `packet_number` across polls.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct TelemetryRecord {
    /// Linear acceleration in Gs
    pub acceleration: Vector3,
    /// Orientation as Z-Y-X Euler angles in radians, derived from
    /// `orientation` by the firmware convention
    pub euler: Vector3,
    /// Orientation quaternion (device-frame-to-world; see [`Quaternion`])
    pub orientation: Quaternion,
    /// Flex value per digit, thumb..pinky. Nominally [0, 1] after factory
    /// calibration but calibration-dependent; treat as opaque scalars.
    pub fingers: [f32; FINGER_COUNT],
    /// Monotonically increasing sample counter, wraps on overflow
    pub packet_number: u32,
}

impl TelemetryRecord {
    /// Flex value for one digit.
    #[inline]
    #[must_use]
    pub fn finger(&self, finger: Finger) -> f32 {
        self.fingers[finger.index()]
    }
}

// ============================================================================
// Skeletal Model
// ============================================================================

/// Poses of the four bone segments of one finger, each relative to the palm
/// frame.
///
/// The thumb has no intermediate phalanx; its `intermediate` slot is kept
/// so every finger has the same fixed layout, but its value carries no
/// meaning and must not be consumed.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct FingerSkeleton {
    /// Metacarpal segment
    pub metacarpal: Pose,
    /// Proximal phalanx
    pub proximal: Pose,
    /// Intermediate phalanx (layout slot only for the thumb)
    pub intermediate: Pose,
    /// Distal phalanx
    pub distal: Pose,
}

impl FingerSkeleton {
    /// Bone segments per finger.
    pub const BONES: usize = 4;
}

/// Device-derived skeletal model of one hand: a palm pose plus all finger
/// bones, positions in millimeters relative to the palm frame.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct HandSkeleton {
    /// Palm pose (root of the pose tree)
    pub palm: Pose,
    /// Thumb bones
    pub thumb: FingerSkeleton,
    /// Index finger bones
    pub index: FingerSkeleton,
    /// Middle finger bones
    pub middle: FingerSkeleton,
    /// Ring finger bones
    pub ring: FingerSkeleton,
    /// Pinky bones
    pub pinky: FingerSkeleton,
}

impl HandSkeleton {
    /// Total poses in the model: one palm plus five fingers of four bones.
    pub const POSE_COUNT: usize = 1 + FINGER_COUNT * FingerSkeleton::BONES;

    /// The skeleton of one digit.
    #[must_use]
    pub const fn finger(&self, finger: Finger) -> &FingerSkeleton {
        match finger {
            Finger::Thumb => &self.thumb,
            Finger::Index => &self.index,
            Finger::Middle => &self.middle,
            Finger::Ring => &self.ring,
            Finger::Pinky => &self.pinky,
        }
    }
}

// ============================================================================
// Glove Flags & Calibration
// ============================================================================

/// Persistent glove configuration flag bits.
///
/// These are read-modify-written over the flags characteristic; the
/// handedness bit survives power cycles, the calibration bits trigger the
/// corresponding self-calibration when set.
pub mod flags {
    /// Handedness: 0 = left, 1 = right. Overwrites factory settings.
    pub const HANDEDNESS: u8 = 0x01;
    /// Recalibrate the gyroscope
    pub const CAL_GYRO: u8 = 0x02;
    /// Recalibrate the accelerometer
    pub const CAL_ACCEL: u8 = 0x04;
    /// Recalibrate the finger flex sensors
    pub const CAL_FINGERS: u8 = 0x08;
}

/// Which sensors a calibrate command targets.
///
/// Each toggle is independently selectable. The defaults mirror the
/// original SDK surface: IMU sensors on, finger sensors off (finger
/// calibration requires a user gesture sequence).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationOptions {
    /// Calibrate the gyroscope (default `true`)
    pub gyro: bool,
    /// Calibrate the accelerometer (default `true`)
    pub accel: bool,
    /// Calibrate the finger flex sensors (default `false`)
    pub fingers: bool,
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        Self {
            gyro: true,
            accel: true,
            fingers: false,
        }
    }
}

impl CalibrationOptions {
    /// Apply the selected toggles to a flags byte, leaving other bits
    /// (notably handedness) untouched.
    #[must_use]
    pub const fn apply_to(self, mut byte: u8) -> u8 {
        if self.gyro {
            byte |= flags::CAL_GYRO;
        } else {
            byte &= !flags::CAL_GYRO;
        }
        if self.accel {
            byte |= flags::CAL_ACCEL;
        } else {
            byte &= !flags::CAL_ACCEL;
        }
        if self.fingers {
            byte |= flags::CAL_FINGERS;
        } else {
            byte &= !flags::CAL_FINGERS;
        }
        byte
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_wire_values() {
        assert_eq!(Hand::Left as i32, 0);
        assert_eq!(Hand::Right as i32, 1);
        assert_eq!(Hand::from_i32(0), Some(Hand::Left));
        assert_eq!(Hand::from_i32(1), Some(Hand::Right));
        assert_eq!(Hand::from_i32(2), None);
        assert_eq!(Hand::from_i32(-1), None);
    }

    #[test]
    fn test_hand_other() {
        assert_eq!(Hand::Left.other(), Hand::Right);
        assert_eq!(Hand::Right.other(), Hand::Left);
    }

    #[test]
    fn test_finger_order() {
        assert_eq!(Finger::Thumb.index(), 0);
        assert_eq!(Finger::Pinky.index(), 4);
        assert_eq!(Finger::ALL.len(), FINGER_COUNT);
    }

    #[test]
    fn test_skeleton_pose_count() {
        assert_eq!(HandSkeleton::POSE_COUNT, 21);
    }

    #[test]
    fn test_skeleton_finger_access() {
        let mut model = HandSkeleton::default();
        model.ring.distal.position.x = 42.0;
        assert_eq!(model.finger(Finger::Ring).distal.position.x, 42.0);
    }

    #[test]
    fn test_calibration_defaults() {
        let opts = CalibrationOptions::default();
        assert!(opts.gyro);
        assert!(opts.accel);
        assert!(!opts.fingers);

        let byte = opts.apply_to(flags::HANDEDNESS | flags::CAL_FINGERS);
        assert_eq!(byte & flags::HANDEDNESS, flags::HANDEDNESS);
        assert_eq!(byte & flags::CAL_GYRO, flags::CAL_GYRO);
        assert_eq!(byte & flags::CAL_ACCEL, flags::CAL_ACCEL);
        assert_eq!(byte & flags::CAL_FINGERS, 0);
    }

    #[test]
    fn test_telemetry_finger_accessor() {
        let record = TelemetryRecord {
            fingers: [0.1, 0.2, 0.3, 0.4, 0.5],
            ..Default::default()
        };
        assert_eq!(record.finger(Finger::Thumb), 0.1);
        assert_eq!(record.finger(Finger::Pinky), 0.5);
    }
}
