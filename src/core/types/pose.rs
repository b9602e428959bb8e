//! 6-DoF pose as raw translation and quaternion components.

use serde::{Deserialize, Serialize};

/// A 6-DoF pose: translation (x, y, z) plus orientation quaternion
/// (qx, qy, qz, qw).
///
/// All 7 components are treated as opaque numbers. No unit-norm constraint is
/// enforced on the quaternion, and [`Pose::lerp`] blends the orientation
/// components linearly just like the translation components, so a blended
/// pose generally carries a non-unit quaternion. Consumers that need a proper
/// rotation must renormalize themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position in meters
    pub x: f64,
    /// Y position in meters
    pub y: f64,
    /// Z position in meters
    pub z: f64,
    /// Quaternion X component
    pub qx: f64,
    /// Quaternion Y component
    pub qy: f64,
    /// Quaternion Z component
    pub qz: f64,
    /// Quaternion W component
    pub qw: f64,
}

impl Pose {
    /// Create a new pose from explicit components.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64, qx: f64, qy: f64, qz: f64, qw: f64) -> Self {
        Self {
            x,
            y,
            z,
            qx,
            qy,
            qz,
            qw,
        }
    }

    /// Pose at the origin with identity orientation.
    #[inline]
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0)
    }

    /// Pose at a position with identity orientation.
    #[inline]
    pub fn from_position(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0, 0.0, 0.0, 1.0)
    }

    /// Build a pose from `[x, y, z, qx, qy, qz, qw]`.
    #[inline]
    pub fn from_components(c: [f64; 7]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5], c[6])
    }

    /// Components as `[x, y, z, qx, qy, qz, qw]`.
    #[inline]
    pub fn components(&self) -> [f64; 7] {
        [self.x, self.y, self.z, self.qx, self.qy, self.qz, self.qw]
    }

    /// Euclidean distance between the translation parts.
    #[inline]
    pub fn translation_distance(&self, other: &Pose) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Component-wise linear blend of all 7 components.
    ///
    /// `alpha = 0` returns `a` exactly and `alpha = 1` returns `b` exactly.
    /// The orientation components participate in the same linear blend as the
    /// translation; the result is not renormalized.
    pub fn lerp(a: &Pose, b: &Pose, alpha: f64) -> Pose {
        let ca = a.components();
        let cb = b.components();
        let mut out = [0.0; 7];
        for i in 0..7 {
            out[i] = ca[i] * (1.0 - alpha) + cb[i] * alpha;
        }
        Pose::from_components(out)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}
