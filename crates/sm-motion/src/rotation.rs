//! Rotation components: algorithmic macro rotation and manually-driven
//! interpolated rotation.
//!
//! Both rotate the source's *position* about a center and add the same
//! angular increment to its *orientation*, so a group turns like a rigid
//! body whose members keep facing the way they are spun.
//!
//! Deltas here are magnitude-independent: a member sitting exactly on the
//! rotation center gets a zero position step but is still reported every
//! frame, and its orientation still turns.  Skipping "too small" inputs is
//! how symmetric formations end up with stuck members.

use std::any::Any;

use sm_core::{EulerAngles, Vec3};

use crate::component::{ComponentKind, FrameContext, MotionComponent};
use crate::error::ComponentError;
use crate::state::{MotionDelta, MotionState};

/// Host update rate at which `speed` equals the per-frame interpolation
/// fraction.  The exponent below rescales the fraction for any actual `dt`,
/// so interpolation converges identically at 30 or 120 updates/sec.
const REFERENCE_RATE: f32 = 60.0;

// ── MacroRotation ─────────────────────────────────────────────────────────────

/// Constant angular velocity about the macro's live center.
pub struct MacroRotation {
    enabled: bool,
    /// Angular velocity per axis, rad/s.
    rates: EulerAngles,
}

impl MacroRotation {
    pub fn new(rates: EulerAngles) -> Self {
        Self { enabled: true, rates }
    }

    pub fn set_rates(&mut self, rates: EulerAngles) {
        self.rates = rates;
    }

    pub fn rates(&self) -> EulerAngles {
        self.rates
    }
}

impl MotionComponent for MacroRotation {
    fn kind(&self) -> ComponentKind {
        ComponentKind::MacroRotation
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn calculate_delta(
        &mut self,
        state: &MotionState,
        ctx:   &FrameContext,
    ) -> Result<MotionDelta, ComponentError> {
        if !self.rates.is_finite() {
            return Err(ComponentError::InvalidParameter {
                kind:   self.kind(),
                detail: "non-finite angular rates",
            });
        }

        if ctx.dt <= 0.0 {
            return Ok(MotionDelta::from_pose(Vec3::ZERO, EulerAngles::ZERO));
        }

        let step = self.rates * ctx.dt;
        // A source outside any macro spins in place about its own position.
        let center = ctx.macro_center.unwrap_or(state.position);
        let moved  = state.position.rotated_about(center, step) - state.position;

        if !moved.is_finite() || !step.is_finite() {
            return Err(ComponentError::NonFinite { kind: self.kind() });
        }
        Ok(MotionDelta::from_pose(moved, step))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── ManualRotation ────────────────────────────────────────────────────────────

/// Host-facing parameters for a manually-driven rotation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManualRotationSpec {
    /// Total rotation to perform, radians per axis.
    pub target: EulerAngles,
    /// Interpolation fraction per frame at the 60 Hz reference rate, in
    /// `(0, 1)`.  Values `>= 1` jump to the target in a single frame.
    pub speed: f32,
    /// Fixed center to rotate positions about.
    pub center: Vec3,
}

/// Interpolated rotation toward target Euler angles, macro- or
/// individual-scale depending on `kind`.
///
/// The angle already traveled is owned interpolation state, persisted across
/// frames and across disable/enable: pausing mid-turn and resuming continues
/// the turn instead of restarting it.  It is deliberately *not* recomputed
/// from the source's orientation, which other components mutate in the same
/// frame.
pub struct ManualRotation {
    kind:    ComponentKind,
    enabled: bool,
    target:  EulerAngles,
    speed:   f32,
    center:  Vec3,
    /// Rotation already applied, per axis.
    traveled: EulerAngles,
}

impl ManualRotation {
    /// A macro-scale manual rotation (installed on every member).
    pub fn for_macro(spec: ManualRotationSpec) -> Self {
        Self::with_kind(ComponentKind::ManualMacroRotation, spec)
    }

    /// An individual-scale manual rotation.
    pub fn individual(spec: ManualRotationSpec) -> Self {
        Self::with_kind(ComponentKind::ManualIndividualRotation, spec)
    }

    fn with_kind(kind: ComponentKind, spec: ManualRotationSpec) -> Self {
        Self {
            kind,
            enabled:  true,
            target:   spec.target,
            speed:    spec.speed.max(0.0),
            center:   spec.center,
            traveled: EulerAngles::ZERO,
        }
    }

    /// Retarget without losing progress: the remaining rotation becomes
    /// `target − traveled`.
    pub fn set_target(&mut self, target: EulerAngles) {
        self.target = target;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Move the rotation center.  Progress already traveled is kept; the
    /// remaining rotation orbits the new center.
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Discard interpolation progress so the full target rotation is applied
    /// again from here.
    pub fn reset(&mut self) {
        self.traveled = EulerAngles::ZERO;
    }

    pub fn traveled(&self) -> EulerAngles {
        self.traveled
    }

    /// Remaining rotation to perform.
    pub fn remaining(&self) -> EulerAngles {
        self.target - self.traveled
    }

    /// Frame-rate-compensated interpolation fraction for this frame's `dt`.
    fn alpha(&self, dt: f32) -> f32 {
        if self.speed >= 1.0 {
            1.0
        } else {
            1.0 - (1.0 - self.speed).powf(dt * REFERENCE_RATE)
        }
    }
}

impl MotionComponent for ManualRotation {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn calculate_delta(
        &mut self,
        state: &MotionState,
        ctx:   &FrameContext,
    ) -> Result<MotionDelta, ComponentError> {
        if !self.center.is_finite() || !self.target.is_finite() {
            return Err(ComponentError::InvalidParameter {
                kind:   self.kind,
                detail: "non-finite center or target angles",
            });
        }

        if ctx.dt <= 0.0 {
            return Ok(MotionDelta::from_pose(Vec3::ZERO, EulerAngles::ZERO));
        }

        let step  = self.remaining() * self.alpha(ctx.dt);
        let moved = state.position.rotated_about(self.center, step) - state.position;

        if !moved.is_finite() || !step.is_finite() {
            return Err(ComponentError::NonFinite { kind: self.kind });
        }

        self.traveled += step;
        Ok(MotionDelta::from_pose(moved, step))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
