//! Easing curves for animated parameter changes.

/// Shape of an animated interpolation from a start value to a target value.
///
/// Curves map normalized time `t ∈ [0, 1]` to a normalized progress in the
/// same range, with `apply(0) == 0` and `apply(1) == 1` exactly — an animation
/// always lands on its target at the end of its duration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EasingCurve {
    /// Constant-rate interpolation.
    #[default]
    Linear,
    /// Quadratic acceleration from rest.
    EaseIn,
    /// Quadratic deceleration into the target.
    EaseOut,
    /// Smoothstep: accelerate, cruise, decelerate.
    SmoothStep,
}

impl EasingCurve {
    /// Map normalized time to normalized progress.  `t` outside `[0, 1]` is
    /// clamped first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingCurve::Linear     => t,
            EasingCurve::EaseIn     => t * t,
            EasingCurve::EaseOut    => t * (2.0 - t),
            EasingCurve::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}
