//! Wire protocol for glove device communication
//!
//! This module pins down, byte for byte, every structure that crosses the
//! host/device boundary. The transport (USB HID, BLE GATT) only moves these
//! payloads; it never reinterprets them. All multi-byte fields are
//! little-endian and there is no padding beyond what the layouts state.
//!
//! Host-bound payloads:
//! - [`GloveReport`]: raw packed sensor report (20 bytes)
//! - telemetry record (64 bytes, [`serialize_telemetry`])
//! - hand skeleton (588 bytes, [`serialize_skeleton`]), derived on-device
//!
//! Device-bound payloads:
//! - flags byte (see [`crate::types::flags`])
//! - [`CalibReport`]: finger calibration bounds (20 bytes)
//! - [`RumbleReport`]: haptic motor power (2 bytes)

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::math::{Quaternion, Vector3};
use crate::types::{FingerSkeleton, Hand, HandSkeleton, Pose, TelemetryRecord, FINGER_COUNT};

// ============================================================================
// Wire Sizes
// ============================================================================

/// Serialized size of a [`Vector3`]: 3 × f32.
pub const VECTOR3_WIRE_SIZE: usize = 12;
/// Serialized size of a [`Quaternion`]: 4 × f32.
pub const QUATERNION_WIRE_SIZE: usize = 16;
/// Serialized size of a [`Pose`]: quaternion then vector, contiguous.
pub const POSE_WIRE_SIZE: usize = QUATERNION_WIRE_SIZE + VECTOR3_WIRE_SIZE;
/// Serialized size of a [`TelemetryRecord`]:
/// accel (12) + euler (12) + quaternion (16) + fingers (20) + counter (4).
pub const TELEMETRY_WIRE_SIZE: usize = 64;
/// Serialized size of a [`FingerSkeleton`]: 4 poses.
pub const FINGER_SKELETON_WIRE_SIZE: usize = 4 * POSE_WIRE_SIZE;
/// Serialized size of a [`HandSkeleton`]: palm pose + 5 finger skeletons.
pub const HAND_SKELETON_WIRE_SIZE: usize = POSE_WIRE_SIZE + FINGER_COUNT * FINGER_SKELETON_WIRE_SIZE;

/// Normalization constants mapping raw report integers to engineering
/// units. These are properties of the glove sensors, not tunables.
pub mod divisors {
    /// Raw accelerometer LSBs per G
    pub const ACCEL: f32 = 16384.0;
    /// Raw quaternion LSBs per unit component
    pub const QUAT: f32 = 16384.0;
    /// Raw finger flex full-scale value
    pub const FINGER: f32 = 255.0;
}

// ============================================================================
// Field Helpers
// ============================================================================

fn put_f32(buffer: &mut [u8], offset: usize, value: f32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn get_f32(data: &[u8], offset: usize) -> f32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    f32::from_le_bytes(bytes)
}

fn get_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([data[offset], data[offset + 1]])
}

fn put_vector3(buffer: &mut [u8], offset: usize, v: Vector3) {
    put_f32(buffer, offset, v.x);
    put_f32(buffer, offset + 4, v.y);
    put_f32(buffer, offset + 8, v.z);
}

fn get_vector3(data: &[u8], offset: usize) -> Vector3 {
    Vector3::new(
        get_f32(data, offset),
        get_f32(data, offset + 4),
        get_f32(data, offset + 8),
    )
}

fn put_quaternion(buffer: &mut [u8], offset: usize, q: Quaternion) {
    put_f32(buffer, offset, q.w);
    put_f32(buffer, offset + 4, q.x);
    put_f32(buffer, offset + 8, q.y);
    put_f32(buffer, offset + 12, q.z);
}

fn get_quaternion(data: &[u8], offset: usize) -> Quaternion {
    Quaternion::new(
        get_f32(data, offset),
        get_f32(data, offset + 4),
        get_f32(data, offset + 8),
        get_f32(data, offset + 12),
    )
}

fn put_pose(buffer: &mut [u8], offset: usize, pose: &Pose) {
    put_quaternion(buffer, offset, pose.orientation);
    put_vector3(buffer, offset + QUATERNION_WIRE_SIZE, pose.position);
}

fn get_pose(data: &[u8], offset: usize) -> Pose {
    Pose {
        orientation: get_quaternion(data, offset),
        position: get_vector3(data, offset + QUATERNION_WIRE_SIZE),
    }
}

// ============================================================================
// Telemetry Codec
// ============================================================================

/// Serialize a telemetry record to its 64-byte wire layout.
///
/// Field order: acceleration, euler, quaternion, fingers[5], packet number.
///
/// # Errors
///
/// Returns [`ProtocolError::BufferOverflow`] if `buffer` is too small.
pub fn serialize_telemetry(
    record: &TelemetryRecord,
    buffer: &mut [u8],
) -> Result<usize, ProtocolError> {
    if buffer.len() < TELEMETRY_WIRE_SIZE {
        return Err(ProtocolError::BufferOverflow {
            required: TELEMETRY_WIRE_SIZE,
            available: buffer.len(),
        });
    }

    put_vector3(buffer, 0, record.acceleration);
    put_vector3(buffer, 12, record.euler);
    put_quaternion(buffer, 24, record.orientation);

    let mut offset = 40;
    for value in &record.fingers {
        put_f32(buffer, offset, *value);
        offset += 4;
    }

    buffer[offset..offset + 4].copy_from_slice(&record.packet_number.to_le_bytes());

    Ok(TELEMETRY_WIRE_SIZE)
}

/// Deserialize a telemetry record from its 64-byte wire layout.
///
/// # Errors
///
/// Returns [`ProtocolError::IncompletePacket`] if `data` is too short.
pub fn deserialize_telemetry(data: &[u8]) -> Result<TelemetryRecord, ProtocolError> {
    if data.len() < TELEMETRY_WIRE_SIZE {
        return Err(ProtocolError::IncompletePacket {
            received: data.len(),
            expected: TELEMETRY_WIRE_SIZE,
        });
    }

    let mut fingers = [0.0f32; FINGER_COUNT];
    let mut offset = 40;
    for value in &mut fingers {
        *value = get_f32(data, offset);
        offset += 4;
    }

    let packet_number = u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]);

    Ok(TelemetryRecord {
        acceleration: get_vector3(data, 0),
        euler: get_vector3(data, 12),
        orientation: get_quaternion(data, 24),
        fingers,
        packet_number,
    })
}

// ============================================================================
// Skeleton Codec
// ============================================================================

fn put_finger(buffer: &mut [u8], offset: usize, finger: &FingerSkeleton) {
    put_pose(buffer, offset, &finger.metacarpal);
    put_pose(buffer, offset + POSE_WIRE_SIZE, &finger.proximal);
    put_pose(buffer, offset + 2 * POSE_WIRE_SIZE, &finger.intermediate);
    put_pose(buffer, offset + 3 * POSE_WIRE_SIZE, &finger.distal);
}

fn get_finger(data: &[u8], offset: usize) -> FingerSkeleton {
    FingerSkeleton {
        metacarpal: get_pose(data, offset),
        proximal: get_pose(data, offset + POSE_WIRE_SIZE),
        intermediate: get_pose(data, offset + 2 * POSE_WIRE_SIZE),
        distal: get_pose(data, offset + 3 * POSE_WIRE_SIZE),
    }
}

/// Serialize a hand skeleton to its 588-byte wire layout: palm pose, then
/// thumb, index, middle, ring, pinky.
///
/// # Errors
///
/// Returns [`ProtocolError::BufferOverflow`] if `buffer` is too small.
pub fn serialize_skeleton(
    model: &HandSkeleton,
    buffer: &mut [u8],
) -> Result<usize, ProtocolError> {
    if buffer.len() < HAND_SKELETON_WIRE_SIZE {
        return Err(ProtocolError::BufferOverflow {
            required: HAND_SKELETON_WIRE_SIZE,
            available: buffer.len(),
        });
    }

    put_pose(buffer, 0, &model.palm);

    let fingers = [
        &model.thumb,
        &model.index,
        &model.middle,
        &model.ring,
        &model.pinky,
    ];
    let mut offset = POSE_WIRE_SIZE;
    for finger in fingers {
        put_finger(buffer, offset, finger);
        offset += FINGER_SKELETON_WIRE_SIZE;
    }

    Ok(HAND_SKELETON_WIRE_SIZE)
}

/// Deserialize a hand skeleton from its 588-byte wire layout.
///
/// # Errors
///
/// Returns [`ProtocolError::IncompletePacket`] if `data` is too short.
pub fn deserialize_skeleton(data: &[u8]) -> Result<HandSkeleton, ProtocolError> {
    if data.len() < HAND_SKELETON_WIRE_SIZE {
        return Err(ProtocolError::IncompletePacket {
            received: data.len(),
            expected: HAND_SKELETON_WIRE_SIZE,
        });
    }

    Ok(HandSkeleton {
        palm: get_pose(data, 0),
        thumb: get_finger(data, POSE_WIRE_SIZE),
        index: get_finger(data, POSE_WIRE_SIZE + FINGER_SKELETON_WIRE_SIZE),
        middle: get_finger(data, POSE_WIRE_SIZE + 2 * FINGER_SKELETON_WIRE_SIZE),
        ring: get_finger(data, POSE_WIRE_SIZE + 3 * FINGER_SKELETON_WIRE_SIZE),
        pinky: get_finger(data, POSE_WIRE_SIZE + 4 * FINGER_SKELETON_WIRE_SIZE),
    })
}

// ============================================================================
// Raw Sensor Report
// ============================================================================

/// Device endpoint identifier carried in the first byte of every raw
/// report.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeviceType {
    /// Left-hand glove
    GloveLeft = 2,
    /// Right-hand glove
    GloveRight = 3,
    /// Left-wrist bracelet
    BraceletLeft = 4,
    /// Right-wrist bracelet
    BraceletRight = 5,
}

impl DeviceType {
    /// Decode the report identifier byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            2 => Some(Self::GloveLeft),
            3 => Some(Self::GloveRight),
            4 => Some(Self::BraceletLeft),
            5 => Some(Self::BraceletRight),
            _ => None,
        }
    }

    /// The glove endpoint for a hand.
    #[must_use]
    pub const fn glove_for(hand: Hand) -> Self {
        match hand {
            Hand::Left => Self::GloveLeft,
            Hand::Right => Self::GloveRight,
        }
    }

    /// Which hand this endpoint belongs to.
    #[must_use]
    pub const fn hand(self) -> Hand {
        match self {
            Self::GloveLeft | Self::BraceletLeft => Hand::Left,
            Self::GloveRight | Self::BraceletRight => Hand::Right,
        }
    }

    /// Whether this endpoint is a glove (carries finger data).
    #[must_use]
    pub const fn is_glove(self) -> bool {
        matches!(self, Self::GloveLeft | Self::GloveRight)
    }
}

/// Raw packed sensor report as produced by the glove firmware.
///
/// Layout (packed, 20 bytes):
/// - 1 byte: device type
/// - 8 bytes: quaternion, 4 × i16 (w, x, y, z), LSB = 1/16384
/// - 6 bytes: acceleration, 3 × i16, LSB = 1/16384 G
/// - 5 bytes: finger flex, 5 × u8, full scale 255
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GloveReport {
    /// Originating endpoint
    pub device_type: DeviceType,
    /// Raw orientation quaternion, w, x, y, z
    pub quat: [i16; 4],
    /// Raw linear acceleration, x, y, z
    pub accel: [i16; 3],
    /// Raw finger flex values in sensor order
    pub fingers: [u8; FINGER_COUNT],
}

impl GloveReport {
    /// Packed wire size in bytes.
    pub const SIZE: usize = 20;

    /// Parse a raw report.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::IncompletePacket`] for short input and
    /// [`ProtocolError::UnknownDeviceType`] for an unrecognized identifier
    /// byte.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < Self::SIZE {
            return Err(ProtocolError::IncompletePacket {
                received: data.len(),
                expected: Self::SIZE,
            });
        }

        let device_type = DeviceType::from_byte(data[0])
            .ok_or(ProtocolError::UnknownDeviceType { value: data[0] })?;

        let mut quat = [0i16; 4];
        for (i, value) in quat.iter_mut().enumerate() {
            *value = get_i16(data, 1 + i * 2);
        }

        let mut accel = [0i16; 3];
        for (i, value) in accel.iter_mut().enumerate() {
            *value = get_i16(data, 9 + i * 2);
        }

        let mut fingers = [0u8; FINGER_COUNT];
        fingers.copy_from_slice(&data[15..20]);

        Ok(Self {
            device_type,
            quat,
            accel,
            fingers,
        })
    }

    /// Encode to the packed wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0] = self.device_type as u8;
        for (i, value) in self.quat.iter().enumerate() {
            bytes[1 + i * 2..3 + i * 2].copy_from_slice(&value.to_le_bytes());
        }
        for (i, value) in self.accel.iter().enumerate() {
            bytes[9 + i * 2..11 + i * 2].copy_from_slice(&value.to_le_bytes());
        }
        bytes[15..20].copy_from_slice(&self.fingers);
        bytes
    }

    /// Normalize this report into a telemetry record.
    ///
    /// Acceleration and quaternion components divide by their sensor LSB
    /// constants; finger values scale to full-scale 1.0. The sensor strip
    /// runs pinky-to-thumb on a left-handed glove, so the finger array is
    /// reversed for left endpoints to keep the record in thumb..pinky
    /// order. Euler angles are derived from the normalized quaternion.
    #[must_use]
    pub fn to_telemetry(&self, packet_number: u32) -> TelemetryRecord {
        let orientation = Quaternion::new(
            f32::from(self.quat[0]) / divisors::QUAT,
            f32::from(self.quat[1]) / divisors::QUAT,
            f32::from(self.quat[2]) / divisors::QUAT,
            f32::from(self.quat[3]) / divisors::QUAT,
        );

        let acceleration = Vector3::new(
            f32::from(self.accel[0]) / divisors::ACCEL,
            f32::from(self.accel[1]) / divisors::ACCEL,
            f32::from(self.accel[2]) / divisors::ACCEL,
        );

        let mut fingers = [0.0f32; FINGER_COUNT];
        for (i, value) in fingers.iter_mut().enumerate() {
            let raw = match self.device_type.hand() {
                Hand::Right => self.fingers[i],
                Hand::Left => self.fingers[FINGER_COUNT - (i + 1)],
            };
            *value = f32::from(raw) / divisors::FINGER;
        }

        TelemetryRecord {
            acceleration,
            euler: orientation.to_euler(),
            orientation,
            fingers,
            packet_number,
        }
    }
}

// ============================================================================
// Calibration & Rumble Reports
// ============================================================================

/// Finger calibration bounds stored on the glove.
///
/// Layout (packed, 20 bytes): 5 × i16 base, then 5 × i16 range, in sensor
/// order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalibReport {
    /// Per-finger sensor value at full extension
    pub fingers_base: [i16; FINGER_COUNT],
    /// Per-finger sensor span between full extension and full flexion
    pub fingers_range: [i16; FINGER_COUNT],
}

impl CalibReport {
    /// Packed wire size in bytes.
    pub const SIZE: usize = 20;

    /// Parse a calibration report.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::IncompletePacket`] for short input.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < Self::SIZE {
            return Err(ProtocolError::IncompletePacket {
                received: data.len(),
                expected: Self::SIZE,
            });
        }

        let mut fingers_base = [0i16; FINGER_COUNT];
        for (i, value) in fingers_base.iter_mut().enumerate() {
            *value = get_i16(data, i * 2);
        }

        let mut fingers_range = [0i16; FINGER_COUNT];
        for (i, value) in fingers_range.iter_mut().enumerate() {
            *value = get_i16(data, 10 + i * 2);
        }

        Ok(Self {
            fingers_base,
            fingers_range,
        })
    }

    /// Encode to the packed wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        for (i, value) in self.fingers_base.iter().enumerate() {
            bytes[i * 2..i * 2 + 2].copy_from_slice(&value.to_le_bytes());
        }
        for (i, value) in self.fingers_range.iter().enumerate() {
            bytes[10 + i * 2..12 + i * 2].copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }
}

/// Haptic motor command payload.
///
/// Layout (packed, 2 bytes): u16 motor power, 0 = off, 65535 = full.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RumbleReport {
    /// Raw motor power
    pub power: u16,
}

impl RumbleReport {
    /// Packed wire size in bytes.
    pub const SIZE: usize = 2;

    /// Scale a normalized power in [0, 1] to the raw motor range. The
    /// fractional part truncates, matching the firmware's decoder.
    ///
    /// The caller validates the interval; values passed here are assumed
    /// in range.
    #[must_use]
    pub fn from_power(power: f32) -> Self {
        Self {
            power: (power * f32::from(u16::MAX)) as u16,
        }
    }

    /// Encode to the packed wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.power.to_le_bytes()
    }

    /// Parse a rumble payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::IncompletePacket`] for short input.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < Self::SIZE {
            return Err(ProtocolError::IncompletePacket {
                received: data.len(),
                expected: Self::SIZE,
            });
        }
        Ok(Self {
            power: u16::from_le_bytes([data[0], data[1]]),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
