//! Cartesian vector and Euler-angle types.
//!
//! Coordinates are right-handed with z up: x to the listener's right, y ahead,
//! z overhead.  `f32` matches the precision of the control protocol (renderers
//! take single-precision floats); positions are in renderer units (metres for
//! every renderer we target).
//!
//! Rotation convention: `yaw` about +z, `pitch` about +y, `roll` about +x,
//! applied in that order (`Rz · Ry · Rx`).  Yaw therefore turns in the
//! horizontal XY plane, which is what azimuth-style panning expects.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// ── Vec3 ──────────────────────────────────────────────────────────────────────

/// A 3D position or displacement in renderer units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    /// `true` when every component is a normal finite float.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Scale so the length does not exceed `max`.  Zero-length vectors and
    /// non-positive `max` pass through unchanged.
    pub fn clamped_length(self, max: f32) -> Vec3 {
        if max <= 0.0 {
            return self;
        }
        let len = self.length();
        if len > max {
            self * (max / len)
        } else {
            self
        }
    }

    /// Rotate `self` about `center` by the Euler increment `angles`.
    ///
    /// Applies `Rz(yaw)`, then `Ry(pitch)`, then `Rx(roll)` to the offset
    /// from `center`.  Each axis rotation is exact, so repeated small steps
    /// about a fixed center preserve the radius (no incremental shrink).
    pub fn rotated_about(self, center: Vec3, angles: EulerAngles) -> Vec3 {
        let mut v = self - center;
        // Rz (yaw): xy plane
        let (sy, cy) = angles.yaw.sin_cos();
        v = Vec3::new(v.x * cy - v.y * sy, v.x * sy + v.y * cy, v.z);
        // Ry (pitch): xz plane
        let (sp, cp) = angles.pitch.sin_cos();
        v = Vec3::new(v.x * cp + v.z * sp, v.y, -v.x * sp + v.z * cp);
        // Rx (roll): yz plane
        let (sr, cr) = angles.roll.sin_cos();
        v = Vec3::new(v.x, v.y * cr - v.z * sr, v.y * sr + v.z * cr);
        v + center
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// ── EulerAngles ───────────────────────────────────────────────────────────────

/// An orientation (or an orientation increment) in radians.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EulerAngles {
    pub yaw:   f32,
    pub pitch: f32,
    pub roll:  f32,
}

impl EulerAngles {
    pub const ZERO: EulerAngles = EulerAngles { yaw: 0.0, pitch: 0.0, roll: 0.0 };

    #[inline]
    pub fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Largest absolute component — the magnitude used by divergence clamping.
    #[inline]
    pub fn max_abs(self) -> f32 {
        self.yaw.abs().max(self.pitch.abs()).max(self.roll.abs())
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite() && self.roll.is_finite()
    }

    /// Clamp each component to `[-max, max]`.  Non-positive `max` passes
    /// through unchanged.
    pub fn clamped_abs(self, max: f32) -> EulerAngles {
        if max <= 0.0 {
            return self;
        }
        EulerAngles::new(
            self.yaw.clamp(-max, max),
            self.pitch.clamp(-max, max),
            self.roll.clamp(-max, max),
        )
    }
}

impl Add for EulerAngles {
    type Output = EulerAngles;
    #[inline]
    fn add(self, rhs: EulerAngles) -> EulerAngles {
        EulerAngles::new(self.yaw + rhs.yaw, self.pitch + rhs.pitch, self.roll + rhs.roll)
    }
}

impl AddAssign for EulerAngles {
    #[inline]
    fn add_assign(&mut self, rhs: EulerAngles) {
        *self = *self + rhs;
    }
}

impl Sub for EulerAngles {
    type Output = EulerAngles;
    #[inline]
    fn sub(self, rhs: EulerAngles) -> EulerAngles {
        EulerAngles::new(self.yaw - rhs.yaw, self.pitch - rhs.pitch, self.roll - rhs.roll)
    }
}

impl Mul<f32> for EulerAngles {
    type Output = EulerAngles;
    #[inline]
    fn mul(self, rhs: f32) -> EulerAngles {
        EulerAngles::new(self.yaw * rhs, self.pitch * rhs, self.roll * rhs)
    }
}

impl fmt::Display for EulerAngles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(y {:.3}, p {:.3}, r {:.3})", self.yaw, self.pitch, self.roll)
    }
}
