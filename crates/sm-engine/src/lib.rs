//! `sm-engine` — the motion scheduler for the spatmotion framework.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`engine`]      | `MotionEngine` — sources, macros, the frame loop        |
//! | [`macro_group`] | `MacroGroup`, `MacroInfo`                               |
//! | [`formation`]   | initial spawn layouts                                   |
//! | [`sink`]        | `OutputSink` trait, `FrameSnapshot`, `NullSink`         |
//! | [`error`]       | `EngineError`, `EngineResult`                           |
//!
//! # Usage sketch
//!
//! ```no_run
//! use sm_core::{EngineConfig, Vec3};
//! use sm_engine::{Formation, MacroMembers, MotionEngine, Target};
//! use sm_motion::{EasingCurve, PlaybackMode, TrajectoryShape, TrajectorySpec};
//!
//! let mut engine = MotionEngine::headless(EngineConfig::default());
//! let choir = engine.create_macro("choir", MacroMembers::Spawn {
//!     count:     8,
//!     formation: Formation::Circle,
//!     origin:    Vec3::new(0.0, 4.0, 1.5),
//!     spacing:   1.0,
//! })?;
//! engine.set_trajectory(Target::Macro(choir), TrajectorySpec {
//!     shape: TrajectoryShape::Circle { radius: 0.5 },
//!     mode:  PlaybackMode::Loop,
//!     speed: 1.0,
//!     phase: 0.0,
//! })?;
//! engine.animate_concentration(Target::Macro(choir), 0.0, 4.0,
//!     EasingCurve::SmoothStep, Vec3::new(0.0, 2.0, 1.5))?;
//!
//! for _ in 0..600 {
//!     engine.update(); // once per host frame
//! }
//! # Ok::<(), sm_engine::EngineError>(())
//! ```

pub mod engine;
pub mod error;
pub mod formation;
pub mod macro_group;
pub mod sink;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::{MacroDeletion, MacroMembers, MotionEngine, Target};
pub use error::{EngineError, EngineResult};
pub use formation::Formation;
pub use macro_group::{MacroGroup, MacroInfo};
pub use sink::{FrameSnapshot, NullSink, OutputSink, SinkResult, SourcePose};
