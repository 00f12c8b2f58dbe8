//! Concentration / dispersion: pull sources toward a shared target point.
//!
//! # Model
//!
//! The factor runs from `1.0` (fully dispersed — sources sit at their own
//! poses) to `0.0` (fully concentrated — every source at the target point).
//! The pose commanded by a factor `f` is
//!
//!   pose(f) = target + (anchor − target) · f
//!
//! where `anchor` is the source's dispersed pose, captured the first time the
//! component evaluates.  The component emits the *increment* between the pose
//! for the previous applied factor and the pose for the current one:
//!
//!   Δposition = (anchor − target) · (f_now − f_applied)
//!
//! Because the increment never reads the live position, it composes additively
//! with trajectories and rotations: a source can orbit while its orbit drifts
//! into the target.  Animating the factor from 1 to 0 sums the increments to
//! exactly `target − anchor`, so convergence is exact, monotone in the factor,
//! and free of overshoot.

use std::any::Any;

use sm_core::Vec3;

use crate::component::{ComponentKind, FrameContext, MotionComponent};
use crate::easing::EasingCurve;
use crate::error::ComponentError;
use crate::state::{MotionDelta, MotionState};

// ── Animation ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct Animation {
    start:    f32,
    target:   f32,
    duration: f32,
    curve:    EasingCurve,
    elapsed:  f32,
}

impl Animation {
    /// Factor at the current elapsed time.
    fn factor(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.target;
        }
        let t = self.curve.apply(self.elapsed / self.duration);
        self.start + (self.target - self.start) * t
    }

    fn done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

// ── Concentration ─────────────────────────────────────────────────────────────

/// Read-only view of a concentration component, for host introspection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConcentrationState {
    /// The commanded factor (animation target if one is running).
    pub factor: f32,
    /// The factor currently reflected in the source's position.
    pub applied: f32,
    pub target: Vec3,
    pub animating: bool,
}

/// The concentration / dispersion component.
pub struct Concentration {
    enabled:   bool,
    target:    Vec3,
    /// Factor the host asked for.
    commanded: f32,
    /// Factor already reflected in position.  Starts at 1.0: whatever pose
    /// the source has when the component first evaluates is its dispersed
    /// pose.
    applied:   f32,
    /// Dispersed pose, captured on first evaluation.
    anchor:    Option<Vec3>,
    animation: Option<Animation>,
}

impl Concentration {
    /// Create a component that will converge to `factor` toward `target`.
    pub fn new(factor: f32, target: Vec3) -> Self {
        Self {
            enabled:   true,
            target,
            commanded: factor.clamp(0.0, 1.0),
            applied:   1.0,
            anchor:    None,
            animation: None,
        }
    }

    /// Command a new factor immediately (applied on the next moving frame).
    /// Cancels any running animation.
    pub fn set_factor(&mut self, factor: f32) {
        self.commanded = factor.clamp(0.0, 1.0);
        self.animation = None;
    }

    /// Animate the factor from its current commanded value to `factor` over
    /// `duration` seconds along `curve`.
    pub fn animate(&mut self, factor: f32, duration: f32, curve: EasingCurve) {
        self.animation = Some(Animation {
            start:    self.commanded,
            target:   factor.clamp(0.0, 1.0),
            duration: duration.max(0.0),
            curve,
            elapsed:  0.0,
        });
        self.commanded = factor.clamp(0.0, 1.0);
    }

    /// Change the target point.  The dispersed anchor is re-captured on the
    /// next evaluation so the factor scale stays meaningful for the new
    /// target.
    pub fn set_target(&mut self, target: Vec3) {
        if target != self.target {
            self.target  = target;
            self.anchor  = None;
            self.applied = 1.0;
        }
    }

    pub fn state(&self) -> ConcentrationState {
        ConcentrationState {
            factor:    self.commanded,
            applied:   self.applied,
            target:    self.target,
            animating: self.animation.is_some(),
        }
    }
}

impl MotionComponent for Concentration {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Concentration
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
        if !self.target.is_finite() {
            return Err(ComponentError::InvalidParameter {
                kind:   self.kind(),
                detail: "non-finite target point",
            });
        }

        // A zero-dt frame advances nothing: explicit zero contribution.
        if ctx.dt <= 0.0 {
            return Ok(MotionDelta::from_position(Vec3::ZERO));
        }

        let anchor = *self.anchor.get_or_insert(state.position);

        if let Some(anim) = &mut self.animation {
            anim.elapsed += ctx.dt;
            self.commanded = anim.factor().clamp(0.0, 1.0);
            if anim.done() {
                self.animation = None;
            }
        }

        let step = (anchor - self.target) * (self.commanded - self.applied);
        self.applied = self.commanded;

        if !step.is_finite() {
            return Err(ComponentError::NonFinite { kind: self.kind() });
        }
        Ok(MotionDelta::from_position(step))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
