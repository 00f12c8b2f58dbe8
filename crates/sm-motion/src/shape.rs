//! Trajectory shapes and playback modes.

use std::f32::consts::TAU;
use std::fmt;

use sm_core::Vec3;

// ── TrajectoryShape ───────────────────────────────────────────────────────────

/// A parametric path, evaluated as an offset from the trajectory center.
///
/// The parameter (`phase`) is in radians: advancing phase by `τ` completes
/// one full traversal of a circle or figure-eight, or one turn of a spiral.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrajectoryShape {
    /// Circle of `radius` in the horizontal XY plane.
    Circle { radius: f32 },

    /// Helical spiral: a circle of `radius` climbing `pitch` units per turn.
    Spiral { radius: f32, pitch: f32 },

    /// Figure-eight (lemniscate of Gerono) of half-width `radius`, horizontal.
    FigureEight { radius: f32 },
}

impl TrajectoryShape {
    /// Offset from the trajectory center at parameter `phase`.
    pub fn point_at(self, phase: f32) -> Vec3 {
        match self {
            TrajectoryShape::Circle { radius } => {
                let (s, c) = phase.sin_cos();
                Vec3::new(radius * c, radius * s, 0.0)
            }
            TrajectoryShape::Spiral { radius, pitch } => {
                let (s, c) = phase.sin_cos();
                Vec3::new(radius * c, radius * s, pitch * phase / TAU)
            }
            TrajectoryShape::FigureEight { radius } => {
                let (s, c) = phase.sin_cos();
                Vec3::new(radius * s, radius * s * c, 0.0)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrajectoryShape::Circle { .. }      => "circle",
            TrajectoryShape::Spiral { .. }      => "spiral",
            TrajectoryShape::FigureEight { .. } => "figure8",
        }
    }
}

impl fmt::Display for TrajectoryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PlaybackMode ──────────────────────────────────────────────────────────────

/// How a trajectory's phase advances each frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaybackMode {
    /// Fixed-speed traversal; phase wraps naturally.
    Loop,

    /// Phase drifts by a uniform jitter scaled by speed and `dt`.
    RandomWalk,

    /// Phase oscillates sinusoidally around its initial value with the given
    /// amplitude (radians); speed sets the oscillation rate.
    Vibration { amplitude: f32 },

    /// Like [`Loop`][PlaybackMode::Loop], but the source also yaws at the
    /// traversal rate, facing along its path.
    Spin,

    /// Phase holds where it is; switching back to a moving mode resumes from
    /// the held phase.
    Freeze,

    /// Phase rewinds to its initial value and holds; switching back to a
    /// moving mode restarts the traversal from the beginning.
    Stop,
}

impl PlaybackMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackMode::Loop           => "loop",
            PlaybackMode::RandomWalk     => "random_walk",
            PlaybackMode::Vibration { .. } => "vibration",
            PlaybackMode::Spin           => "spin",
            PlaybackMode::Freeze         => "freeze",
            PlaybackMode::Stop           => "stop",
        }
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
