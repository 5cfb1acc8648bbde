//! Orientation math primitives (`no_std` compatible)
//!
//! This module provides the two value types every glove payload is built
//! from:
//!
//! - [`Quaternion`]: unit rotation with Hamilton product composition
//! - [`Vector3`]: position (millimeters), acceleration (Gs) or Euler angles
//!
//! Both types are plain `f32` aggregates with the exact field order used on
//! the wire. Arithmetic is garbage-in/garbage-out: device-supplied values
//! (including NaN or denormalized quaternions) propagate unchanged, and
//! validation belongs to the caller or to calibration.

use core::ops::{Add, Index, Mul, Sub};

use serde::{Deserialize, Serialize};

// ============================================================================
// Quaternion
// ============================================================================

/// Quaternion representing an orientation, component order `w, x, y, z`.
///
/// Device output is nominally unit length but the type does not enforce it;
/// a freshly polled sample may be transiently denormalized.
///
/// The rotation convention (device-frame-to-world, Z-Y-X Euler
/// decomposition) is a property of the glove firmware and must be verified
/// against device documentation or empirical calibration before composing
/// orientations from other sources.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// Scalar component
    pub w: f32,
    /// First vector component
    pub x: f32,
    /// Second vector component
    pub y: f32,
    /// Third vector component
    pub z: f32,
}

impl Quaternion {
    /// Number of components (valid indices are `0..COMPONENTS`)
    pub const COMPONENTS: usize = 4;

    /// The identity rotation `{1, 0, 0, 0}`
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a quaternion from its components.
    #[inline]
    #[must_use]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Checked component access: `0..=3` map to `w, x, y, z`.
    ///
    /// Returns `None` for any other index. Use the `Index` impl when an
    /// out-of-range index is a caller bug that should fail immediately.
    #[inline]
    #[must_use]
    pub const fn component(&self, index: usize) -> Option<f32> {
        match index {
            0 => Some(self.w),
            1 => Some(self.x),
            2 => Some(self.y),
            3 => Some(self.z),
            _ => None,
        }
    }

    /// The conjugate (inverse rotation for a unit quaternion).
    #[inline]
    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Euclidean norm of the four components.
    #[inline]
    #[must_use]
    pub fn magnitude(self) -> f32 {
        libm::sqrtf(self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Scale to unit length. A zero quaternion is returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            return self;
        }
        Self {
            w: self.w / mag,
            x: self.x / mag,
            y: self.y / mag,
            z: self.z / mag,
        }
    }

    /// Decompose into Z-Y-X (yaw-pitch-roll) Euler angles in radians.
    ///
    /// Returns `Vector3 { x: roll, y: pitch, z: yaw }`. The pitch term is
    /// clamped to avoid NaN from `asin` just outside [-1, 1] on slightly
    /// denormalized device output.
    #[must_use]
    pub fn to_euler(self) -> Vector3 {
        let Self { w, x, y, z } = self;

        let roll = libm::atan2f(2.0 * (w * x + y * z), 1.0 - 2.0 * (x * x + y * y));

        let mut sin_pitch = 2.0 * (w * y - z * x);
        if sin_pitch > 1.0 {
            sin_pitch = 1.0;
        } else if sin_pitch < -1.0 {
            sin_pitch = -1.0;
        }
        let pitch = libm::asinf(sin_pitch);

        let yaw = libm::atan2f(2.0 * (w * z + x * y), 1.0 - 2.0 * (y * y + z * z));

        Vector3::new(roll, pitch, yaw)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product. Not commutative: `a * b` rotates by `b` first,
    /// then `a`. Composition order against telemetry must match the device
    /// convention documented on [`Quaternion`].
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}

impl Index<usize> for Quaternion {
    type Output = f32;

    /// Positional access, `0..=3` → `w, x, y, z`.
    ///
    /// # Panics
    ///
    /// Panics on any other index; an out-of-range component index is a
    /// caller bug, not a recoverable device condition.
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.w,
            1 => &self.x,
            2 => &self.y,
            3 => &self.z,
            _ => panic!("quaternion index out of range: {index}"),
        }
    }
}

// ============================================================================
// Vector3
// ============================================================================

/// Three element vector, component order `x, y, z`.
///
/// Depending on context this carries a position in millimeters, a linear
/// acceleration in Gs, or Euler angles in radians (convert with
/// [`Vector3::to_degrees`]).
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct Vector3 {
    /// First component
    pub x: f32,
    /// Second component
    pub y: f32,
    /// Third component
    pub z: f32,
}

impl Vector3 {
    /// Number of components (valid indices are `0..COMPONENTS`)
    pub const COMPONENTS: usize = 3;

    /// The zero vector
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a vector from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Checked component access: `0..=2` map to `x, y, z`.
    #[inline]
    #[must_use]
    pub const fn component(&self, index: usize) -> Option<f32> {
        match index {
            0 => Some(self.x),
            1 => Some(self.y),
            2 => Some(self.z),
            _ => None,
        }
    }

    /// Convert each component from radians to degrees.
    #[inline]
    #[must_use]
    pub fn to_degrees(self) -> Self {
        const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;
        Self {
            x: self.x * RAD_TO_DEG,
            y: self.y * RAD_TO_DEG,
            z: self.z * RAD_TO_DEG,
        }
    }

    /// Components as a fixed-size array, `[x, y, z]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vector3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Index<usize> for Vector3 {
    type Output = f32;

    /// Positional access, `0..=2` → `x, y, z`.
    ///
    /// # Panics
    ///
    /// Panics on any other index.
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("vector index out of range: {index}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    fn quat_close(a: Quaternion, b: Quaternion) -> bool {
        (a.w - b.w).abs() < TOL
            && (a.x - b.x).abs() < TOL
            && (a.y - b.y).abs() < TOL
            && (a.z - b.z).abs() < TOL
    }

    #[test]
    fn test_identity_product() {
        let q = Quaternion::new(0.7071, 0.7071, 0.0, 0.0);
        assert!(quat_close(q * Quaternion::IDENTITY, q));
        assert!(quat_close(Quaternion::IDENTITY * q, q));
    }

    #[test]
    fn test_product_not_commutative() {
        // 90 degree rotations about X and about Z
        let rx = Quaternion::new(0.7071068, 0.7071068, 0.0, 0.0);
        let rz = Quaternion::new(0.7071068, 0.0, 0.0, 0.7071068);

        let ab = rx * rz;
        let ba = rz * rx;
        assert!(!quat_close(ab, ba));
    }

    #[test]
    fn test_conjugate_inverts_unit_rotation() {
        let q = Quaternion::new(0.7071068, 0.0, 0.7071068, 0.0);
        assert!(quat_close(q * q.conjugate(), Quaternion::IDENTITY));
    }

    #[test]
    fn test_normalized_magnitude() {
        let q = Quaternion::new(2.0, 0.0, 0.0, 0.0).normalized();
        assert!((q.magnitude() - 1.0).abs() < TOL);
        assert!((q.w - 1.0).abs() < TOL);
    }

    #[test]
    fn test_quaternion_indexing() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q[0], 1.0);
        assert_eq!(q[3], 4.0);
        assert_eq!(q.component(2), Some(3.0));
        assert_eq!(q.component(4), None);
    }

    #[test]
    #[should_panic(expected = "quaternion index out of range")]
    fn test_quaternion_index_out_of_range() {
        let q = Quaternion::IDENTITY;
        let _ = q[4];
    }

    #[test]
    fn test_euler_identity_is_zero() {
        let euler = Quaternion::IDENTITY.to_euler();
        assert!(euler.x.abs() < TOL);
        assert!(euler.y.abs() < TOL);
        assert!(euler.z.abs() < TOL);
    }

    #[test]
    fn test_euler_roll_quarter_turn() {
        // 90 degrees about X
        let q = Quaternion::new(0.7071068, 0.7071068, 0.0, 0.0);
        let euler = q.to_euler().to_degrees();
        assert!((euler.x - 90.0).abs() < 1e-3);
        assert!(euler.y.abs() < 1e-3);
        assert!(euler.z.abs() < 1e-3);
    }

    #[test]
    fn test_vector_add_sub_roundtrip() {
        let v = Vector3::new(1.5, -2.25, 10.0);
        let w = Vector3::new(0.25, 4.0, -3.5);
        let back = (v + w) - w;
        assert!((back.x - v.x).abs() < TOL);
        assert!((back.y - v.y).abs() < TOL);
        assert!((back.z - v.z).abs() < TOL);
    }

    #[test]
    fn test_to_degrees() {
        let v = Vector3::new(core::f32::consts::PI, 0.0, 0.0).to_degrees();
        assert!((v.x - 180.0).abs() < 1e-3);
        assert_eq!(v.y, 0.0);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn test_vector_indexing() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 3.0);
        assert_eq!(v.component(3), None);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "vector index out of range")]
    fn test_vector_index_out_of_range() {
        let v = Vector3::ZERO;
        let _ = v[3];
    }
}
