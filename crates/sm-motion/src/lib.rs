//! `sm-motion` — motion state and additive delta composition.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                     |
//! |-------------------|--------------------------------------------------------------|
//! | [`state`]         | `MotionState`, `MotionDelta`                                 |
//! | [`component`]     | `MotionComponent` trait, `ComponentKind`, `FrameContext`     |
//! | [`easing`]        | `EasingCurve`                                                |
//! | [`shape`]         | `TrajectoryShape`, `PlaybackMode`                            |
//! | [`concentration`] | concentration / dispersion effect                            |
//! | [`trajectory`]    | individual and macro trajectory effects                      |
//! | [`rotation`]      | algorithmic and manually-driven rotation effects             |
//! | [`source`]        | `SourceMotion` — per-source component set + composition      |
//! | [`error`]         | `ComponentError`                                             |
//!
//! # Composition model
//!
//! Every effect is a [`MotionComponent`] that, once per frame, turns the
//! source's frame-start [`MotionState`] and a [`FrameContext`] into a
//! [`MotionDelta`] — an *incremental* contribution.  [`SourceMotion::advance`]
//! evaluates every enabled component against the same frame-start state, sums
//! the deltas field-wise, clamps the total against the configured sanity
//! bounds, and commits once.  Because each component reports an increment
//! rather than an absolute pose, a source can converge toward a concentration
//! point while orbiting an individual trajectory while its whole macro
//! rotates — no effect overwrites another.
//!
//! A component that fails is skipped for that frame (logged via `tracing`,
//! never fatal); the rest of the frame composes normally.

pub mod component;
pub mod concentration;
pub mod easing;
pub mod error;
pub mod rotation;
pub mod shape;
pub mod source;
pub mod state;
pub mod trajectory;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use component::{ComponentKind, FrameContext, MotionComponent};
pub use concentration::{Concentration, ConcentrationState};
pub use easing::EasingCurve;
pub use error::ComponentError;
pub use rotation::{MacroRotation, ManualRotation, ManualRotationSpec};
pub use shape::{PlaybackMode, TrajectoryShape};
pub use source::SourceMotion;
pub use state::{MotionDelta, MotionState};
pub use trajectory::{Trajectory, TrajectorySpec};
