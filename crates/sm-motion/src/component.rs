//! The `MotionComponent` trait and per-frame evaluation context.

use std::any::Any;
use std::fmt;

use sm_core::{DeltaLimits, Vec3};

use crate::error::ComponentError;
use crate::state::{MotionDelta, MotionState};

// ── ComponentKind ─────────────────────────────────────────────────────────────

/// The closed set of motion effect variants.
///
/// Declaration order is the fixed evaluation priority: a source's components
/// are stored in a `BTreeMap<ComponentKind, _>`, so iteration always visits
/// kinds in this order regardless of installation order.  The numeric result
/// of a frame does not depend on this order (deltas sum commutatively), but a
/// deterministic order keeps logs and float rounding reproducible.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentKind {
    /// Pull toward / release from a shared target point.
    Concentration,
    /// Per-source trajectory around a fixed center.
    IndividualTrajectory,
    /// Group trajectory shared by a macro's members.
    MacroTrajectory,
    /// Constant-rate algorithmic rotation about the macro's live center.
    MacroRotation,
    /// Interpolated rotation of a whole macro toward target angles.
    ManualMacroRotation,
    /// Interpolated rotation of one source toward target angles.
    ManualIndividualRotation,
}

impl ComponentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Concentration            => "concentration",
            ComponentKind::IndividualTrajectory     => "individual_trajectory",
            ComponentKind::MacroTrajectory          => "macro_trajectory",
            ComponentKind::MacroRotation            => "macro_rotation",
            ComponentKind::ManualMacroRotation      => "manual_macro_rotation",
            ComponentKind::ManualIndividualRotation => "manual_individual_rotation",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── FrameContext ──────────────────────────────────────────────────────────────

/// Read-only per-frame inputs shared by every component of one source.
///
/// Built once per source per `update()` by the engine.  `macro_center` is the
/// geometric mean of the source's macro at *frame start* — the engine computes
/// all centers from committed positions before any member advances, so every
/// center-relative component in a frame sees the same consistent value.
#[derive(Copy, Clone, Debug)]
pub struct FrameContext {
    /// Seconds since the previous frame (capped; `0.0` is legal and must
    /// produce no movement).
    pub dt: f32,

    /// Seconds since the engine started, for oscillating effects.
    pub elapsed: f32,

    /// Live center of the source's macro, if it belongs to one.
    pub macro_center: Option<Vec3>,

    /// Per-frame delta sanity bounds, from the engine configuration.
    pub limits: DeltaLimits,
}

impl FrameContext {
    /// A standalone context for tests and sources outside any macro.
    pub fn standalone(dt: f32, elapsed: f32) -> Self {
        Self {
            dt,
            elapsed,
            macro_center: None,
            limits: DeltaLimits::default(),
        }
    }
}

// ── MotionComponent ───────────────────────────────────────────────────────────

/// One motion effect attached to one source.
///
/// # Contract
///
/// `calculate_delta` is a pure function of `(state, ctx, internal state)`:
/// it may read the frame-start `state` but must not assume any other
/// component's delta has been applied.  It may advance its *own*
/// interpolation state (phase, traveled angle) exactly once per call, so the
/// engine calls each component exactly once per frame.
///
/// Components must be magnitude-independent: when enabled they always return
/// a delta, even a near-zero one.  An early "no contribution" return keyed on
/// input magnitude makes symmetric formations appear stuck (members near the
/// rotation center stop moving while the rest turn) — report zero explicitly
/// instead.
///
/// # Units
///
/// Radians, seconds, renderer units.  Never convert.
pub trait MotionComponent: Send + 'static {
    /// Which variant this is.  Also the key under which it is stored — a
    /// source holds at most one component per kind.
    fn kind(&self) -> ComponentKind;

    /// Disabled components are skipped by the composition step; their
    /// interpolation state is preserved so re-enabling resumes rather than
    /// restarts.
    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Compute this frame's incremental contribution.
    ///
    /// Errors are recovered by the caller: the contribution is dropped for
    /// this frame, logged, and the rest of the frame composes normally.
    fn calculate_delta(
        &mut self,
        state: &MotionState,
        ctx:   &FrameContext,
    ) -> Result<MotionDelta, ComponentError>;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
