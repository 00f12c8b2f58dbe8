//! Individual and macro trajectory components.
//!
//! A trajectory advances a phase along a parametric shape and emits the
//! *offset increment* `shape(φ_new) − shape(φ_old)` as its position delta.
//! Emitting increments rather than absolute shape points keeps trajectories
//! additive: the orbit rides on whatever concentration, rotation, or the
//! group's own trajectory are doing at the same time, and installing a
//! trajectory never teleports a source onto the shape.

use std::any::Any;

use sm_core::{EulerAngles, SourceRng, Vec3};

use crate::component::{ComponentKind, FrameContext, MotionComponent};
use crate::error::ComponentError;
use crate::shape::{PlaybackMode, TrajectoryShape};
use crate::state::{MotionDelta, MotionState};

// ── TrajectorySpec ────────────────────────────────────────────────────────────

/// Host-facing parameters for installing a trajectory.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectorySpec {
    pub shape: TrajectoryShape,
    pub mode:  PlaybackMode,
    /// Phase advance rate in rad/s (oscillation rate for vibration).
    pub speed: f32,
    /// Initial phase along the shape, radians.
    pub phase: f32,
}

// ── Trajectory ────────────────────────────────────────────────────────────────

/// A trajectory effect — individual (fixed reference center) or macro
/// (shared by all members of a group).
pub struct Trajectory {
    kind:    ComponentKind,
    enabled: bool,
    shape:   TrajectoryShape,
    mode:    PlaybackMode,
    speed:   f32,
    /// Reference center, for introspection and debugging; deltas are offset
    /// increments, so the path is center-free by construction.
    center:  Vec3,
    /// Current parameter along the shape.  Persisted across frames and
    /// across disable/enable.
    phase:         f32,
    initial_phase: f32,
    /// Shape offset at the previous evaluation, so the increment spans
    /// exactly one frame.
    last_offset: Option<Vec3>,
    /// Accumulated oscillation time for vibration mode.
    vib_time: f32,
    /// Jitter source for random-walk mode.
    rng: Option<SourceRng>,
}

impl Trajectory {
    /// An individual trajectory around `center`.
    pub fn individual(spec: TrajectorySpec, center: Vec3) -> Self {
        Self::with_kind(ComponentKind::IndividualTrajectory, spec, center)
    }

    /// A macro trajectory; `center` is the group's center at install time.
    pub fn for_macro(spec: TrajectorySpec, center: Vec3) -> Self {
        Self::with_kind(ComponentKind::MacroTrajectory, spec, center)
    }

    fn with_kind(kind: ComponentKind, spec: TrajectorySpec, center: Vec3) -> Self {
        Self {
            kind,
            enabled:       true,
            shape:         spec.shape,
            mode:          spec.mode,
            speed:         spec.speed,
            center,
            phase:         spec.phase,
            initial_phase: spec.phase,
            last_offset:   None,
            vib_time:      0.0,
            rng:           None,
        }
    }

    /// Attach a deterministic jitter source (required by random-walk mode).
    pub fn with_rng(mut self, rng: SourceRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Switch playback mode, keeping phase and interpolation state.
    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// The point the source would occupy if the shape were anchored at the
    /// reference center.
    pub fn reference_point(&self) -> Vec3 {
        self.center + self.shape.point_at(self.phase)
    }
}

impl MotionComponent for Trajectory {
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
        _state: &MotionState,
        ctx:    &FrameContext,
    ) -> Result<MotionDelta, ComponentError> {
        if ctx.dt <= 0.0 {
            return Ok(MotionDelta::from_position(Vec3::ZERO));
        }

        let prev = self
            .last_offset
            .unwrap_or_else(|| self.shape.point_at(self.phase));

        let mut yaw_rate = 0.0;
        match self.mode {
            PlaybackMode::Loop => {
                self.phase += self.speed * ctx.dt;
            }
            PlaybackMode::RandomWalk => {
                let jitter = match &mut self.rng {
                    Some(rng) => rng.jitter(),
                    None => {
                        return Err(ComponentError::InvalidParameter {
                            kind:   self.kind,
                            detail: "random-walk mode requires an RNG",
                        });
                    }
                };
                self.phase += jitter * self.speed * ctx.dt;
            }
            PlaybackMode::Vibration { amplitude } => {
                self.vib_time += ctx.dt;
                self.phase = self.initial_phase + amplitude * (self.speed * self.vib_time).sin();
            }
            PlaybackMode::Spin => {
                self.phase += self.speed * ctx.dt;
                yaw_rate = self.speed;
            }
            PlaybackMode::Freeze => {
                // Hold the current phase; resuming continues from here.
            }
            PlaybackMode::Stop => {
                // Rewind; resuming restarts the traversal.
                self.phase = self.initial_phase;
            }
        }

        let offset = self.shape.point_at(self.phase);
        self.last_offset = Some(offset);
        let step = offset - prev;

        if !step.is_finite() {
            return Err(ComponentError::NonFinite { kind: self.kind });
        }

        if yaw_rate != 0.0 {
            let spin = EulerAngles::new(yaw_rate * ctx.dt, 0.0, 0.0);
            Ok(MotionDelta::from_pose(step, spin))
        } else {
            Ok(MotionDelta::from_position(step))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
