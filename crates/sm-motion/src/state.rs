//! Per-source pose and the incremental delta type.

use sm_core::{EulerAngles, Vec3};

// ── MotionState ───────────────────────────────────────────────────────────────

/// The observable pose of one source.
///
/// Owned exclusively by its [`SourceMotion`][crate::SourceMotion] and mutated
/// only by the composition step, which guarantees every field stays finite.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionState {
    /// Position in renderer units.
    pub position: Vec3,

    /// Velocity in units/s.  Derived from the committed position change each
    /// frame unless a component contributes an explicit velocity delta.
    pub velocity: Vec3,

    /// Orientation in radians.
    pub orientation: EulerAngles,

    /// Source aperture (spread), renderer-defined scale, never negative.
    pub aperture: f32,

    /// Distance from the listener origin.  Derived from `position` each frame
    /// unless a component contributes an explicit distance delta.
    pub distance: f32,
}

impl MotionState {
    /// A source at rest at `position`, facing forward.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity:    Vec3::ZERO,
            orientation: EulerAngles::ZERO,
            aperture:    0.0,
            distance:    position.length(),
        }
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

// ── MotionDelta ───────────────────────────────────────────────────────────────

/// An incremental, additive change to a [`MotionState`], produced by one
/// component for one frame.
///
/// Every field is optional: `None` means "no contribution" and must not
/// suppress other components' contributions to that field, while
/// `Some(ZERO)` is an explicit zero contribution.  Deltas are created fresh
/// each frame and never persisted.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MotionDelta {
    pub position:    Option<Vec3>,
    pub velocity:    Option<Vec3>,
    pub orientation: Option<EulerAngles>,
    pub aperture:    Option<f32>,
    pub distance:    Option<f32>,
}

impl MotionDelta {
    /// A delta with no contributions at all.
    pub const NONE: MotionDelta = MotionDelta {
        position:    None,
        velocity:    None,
        orientation: None,
        aperture:    None,
        distance:    None,
    };

    /// A position-only delta.
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self { position: Some(position), ..Self::NONE }
    }

    /// A position + orientation delta, the shape every rotation effect emits.
    #[inline]
    pub fn from_pose(position: Vec3, orientation: EulerAngles) -> Self {
        Self {
            position:    Some(position),
            orientation: Some(orientation),
            ..Self::NONE
        }
    }

    /// `true` if no field carries a contribution.
    pub fn is_none(&self) -> bool {
        self.position.is_none()
            && self.velocity.is_none()
            && self.orientation.is_none()
            && self.aperture.is_none()
            && self.distance.is_none()
    }

    /// Accumulate `other`'s present fields into `self` by addition.
    ///
    /// An absent field on either side leaves the other side's value intact;
    /// two present fields sum.
    pub fn merge(&mut self, other: &MotionDelta) {
        merge_field(&mut self.position, other.position, |a, b| a + b);
        merge_field(&mut self.velocity, other.velocity, |a, b| a + b);
        merge_field(&mut self.orientation, other.orientation, |a, b| a + b);
        merge_field(&mut self.aperture, other.aperture, |a, b| a + b);
        merge_field(&mut self.distance, other.distance, |a, b| a + b);
    }

    /// `true` when every present field is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_none_or(Vec3::is_finite)
            && self.velocity.is_none_or(Vec3::is_finite)
            && self.orientation.is_none_or(EulerAngles::is_finite)
            && self.aperture.is_none_or(f32::is_finite)
            && self.distance.is_none_or(f32::is_finite)
    }
}

fn merge_field<T: Copy>(into: &mut Option<T>, from: Option<T>, add: impl Fn(T, T) -> T) {
    if let Some(b) = from {
        *into = Some(match *into {
            Some(a) => add(a, b),
            None    => b,
        });
    }
}
