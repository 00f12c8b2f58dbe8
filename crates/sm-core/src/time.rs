//! Frame time model.
//!
//! # Design
//!
//! The engine is driven by an external host calling `update()` at whatever
//! rate it likes (typically a 60 Hz timer).  `FrameClock` measures the real
//! elapsed time between calls and hands the engine a `dt` in seconds:
//!
//! - The first call has no previous instant, so it uses the nominal
//!   `1 / fps` frame duration instead of a garbage interval.
//! - `dt` is capped at `max_dt_secs` so a debugger pause or a stalled host
//!   doesn't teleport every source across the room on the next frame.
//!
//! Components integrate against `dt`, so the same scene plays back
//! identically at 30, 60, or 120 updates per second.

use std::fmt;
use std::time::Instant;

// ── FrameClock ────────────────────────────────────────────────────────────────

/// Wall-clock frame timer.
///
/// Owned by the engine; `tick()` is called exactly once per `update()`.
#[derive(Debug)]
pub struct FrameClock {
    /// Nominal seconds per frame, used for the first tick.
    nominal_dt: f32,
    /// Upper bound applied to every measured interval.
    max_dt: f32,
    /// Instant of the previous tick; `None` before the first.
    last: Option<Instant>,
    /// Completed frame count.
    frame: u64,
    /// Accumulated (capped) seconds since the first tick.
    elapsed: f32,
}

impl FrameClock {
    /// Create a clock for a host updating at `fps`, capping gaps at
    /// `max_dt_secs`.
    pub fn new(fps: f32, max_dt_secs: f32) -> Self {
        Self {
            nominal_dt: 1.0 / fps.max(1.0),
            max_dt:     max_dt_secs.max(0.0),
            last:       None,
            frame:      0,
            elapsed:    0.0,
        }
    }

    /// Measure the interval since the previous tick and advance the clock.
    ///
    /// Returns the capped `dt` in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = match self.last {
            None       => self.nominal_dt,
            Some(prev) => (now - prev).as_secs_f32().min(self.max_dt),
        };
        self.last = Some(now);
        self.frame += 1;
        self.elapsed += dt;
        dt
    }

    /// Advance the clock by an exact `dt` without consulting the wall clock.
    ///
    /// Used by offline rendering and tests, where frame timing must be
    /// reproducible.
    pub fn tick_fixed(&mut self, dt: f32) -> f32 {
        let dt = dt.min(self.max_dt);
        self.last = Some(Instant::now());
        self.frame += 1;
        self.elapsed += dt;
        dt
    }

    /// Number of completed frames.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Accumulated (capped) seconds since the first tick.
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {} ({:.2} s)", self.frame, self.elapsed)
    }
}

// ── DeltaLimits ───────────────────────────────────────────────────────────────

/// Sanity bounds applied to the accumulated per-frame delta before commit.
///
/// A near-zero-distance singularity in rotation math (or a badly tuned
/// trajectory speed) can produce a step of absurd magnitude; rather than
/// applying it unbounded, the composition step clamps against these limits
/// and logs a warning.  Non-positive values disable the corresponding clamp.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaLimits {
    /// Maximum position step per frame, in renderer units.
    pub max_position_step: f32,
    /// Maximum per-axis orientation step per frame, in radians.
    pub max_angle_step: f32,
}

impl Default for DeltaLimits {
    fn default() -> Self {
        // 10 units in one frame is already an audible teleport; a full
        // half-turn per frame aliases anyway.
        Self {
            max_position_step: 10.0,
            max_angle_step:    std::f32::consts::PI,
        }
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Top-level engine configuration.
///
/// Constructed by the host application and passed into the engine once; no
/// process-wide configuration state exists anywhere in the framework.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Nominal host update rate.  Only used for the first frame's `dt` and
    /// for documentation; the real `dt` is measured per frame.
    pub fps: f32,

    /// Cap on a single frame's `dt` in seconds.  Bounds the effect of
    /// unexpectedly large gaps between `update()` calls.
    pub max_dt_secs: f32,

    /// Master RNG seed.  The same seed always produces identical random-walk
    /// trajectories.
    pub seed: u64,

    /// Per-frame delta sanity bounds.
    pub limits: DeltaLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fps:         60.0,
            max_dt_secs: 0.25,
            seed:        0,
            limits:      DeltaLimits::default(),
        }
    }
}

impl EngineConfig {
    /// Construct a `FrameClock` pre-configured for this run.
    pub fn make_clock(&self) -> FrameClock {
        FrameClock::new(self.fps, self.max_dt_secs)
    }
}
