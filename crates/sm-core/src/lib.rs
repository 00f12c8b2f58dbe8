//! `sm-core` — foundational types for the `spatmotion` source-motion framework.
//!
//! This crate is a dependency of every other `sm-*` crate.  It intentionally
//! has no `sm-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).  Fallible operations live in the crates above; nothing
//! here fails, so there is no error type at this layer.
//!
//! # What lives here
//!
//! | Module    | Contents                                                |
//! |-----------|---------------------------------------------------------|
//! | [`ids`]   | `SourceId`, `MacroId`                                   |
//! | [`math`]  | `Vec3`, `EulerAngles`, rotation about a center          |
//! | [`time`]  | `FrameClock`, `EngineConfig`, `DeltaLimits`             |
//! | [`rng`]   | `SourceRng` (per-source deterministic RNG)              |
//!
//! # Units
//!
//! All angles are **radians**, everywhere.  Degrees never cross a crate
//! boundary; convert at the outermost edge of the application if a front end
//! speaks degrees.  This is a hard rule: a value must never pass through
//! `to_radians()` twice.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod math;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{MacroId, SourceId};
pub use math::{EulerAngles, Vec3};
pub use rng::SourceRng;
pub use time::{DeltaLimits, EngineConfig, FrameClock};
