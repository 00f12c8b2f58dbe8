//! Output sink abstraction.
//!
//! The engine knows nothing about wire formats: after every frame it hands
//! the complete set of committed poses to an [`OutputSink`], and the sink
//! decides how (and whether) to encode and deliver them.  Concrete sinks —
//! UDP/OSC, CSV trace, in-memory capture — live in `sm-output`.
//!
//! Sink failures never abort a frame.  The engine logs the error and carries
//! on; a renderer that went away mid-performance should cost packets, not
//! motion.

use sm_core::{EulerAngles, SourceId, Vec3};
use sm_motion::MotionState;

/// Sinks report failure with whatever error type suits their transport.
pub type SinkResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// One source's committed pose, as handed to sinks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SourcePose {
    pub id:    SourceId,
    pub state: MotionState,
}

/// Everything a sink sees about one completed frame.
///
/// Poses are ordered by ascending [`SourceId`], the same order the engine
/// advanced them in.
#[derive(Copy, Clone, Debug)]
pub struct FrameSnapshot<'a> {
    /// Completed frame count, 1-based after the first `update()`.
    pub frame: u64,
    /// Seconds since the engine started.
    pub elapsed: f32,
    /// This frame's time step in seconds.
    pub dt: f32,
    pub poses: &'a [SourcePose],
}

/// Destination for committed frames.
pub trait OutputSink: Send {
    /// Deliver one source's position.
    fn send_position(&mut self, id: SourceId, position: Vec3) -> SinkResult<()>;

    /// Deliver one source's orientation (radians).
    fn send_orientation(&mut self, id: SourceId, orientation: EulerAngles) -> SinkResult<()>;

    /// Deliver a whole frame.  The default forwards each pose through
    /// [`send_position`][OutputSink::send_position] and
    /// [`send_orientation`][OutputSink::send_orientation]; sinks with
    /// frame-level framing (bundles, CSV rows with a frame column) override
    /// this instead.
    fn send_frame(&mut self, frame: &FrameSnapshot<'_>) -> SinkResult<()> {
        for pose in frame.poses {
            self.send_position(pose.id, pose.state.position)?;
            self.send_orientation(pose.id, pose.state.orientation)?;
        }
        Ok(())
    }

    /// Flush any buffered output.  Called by the host at shutdown, not per
    /// frame.
    fn flush(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

/// A sink that discards everything.  Useful for tests and headless runs.
#[derive(Debug, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn send_position(&mut self, _id: SourceId, _position: Vec3) -> SinkResult<()> {
        Ok(())
    }

    fn send_orientation(&mut self, _id: SourceId, _orientation: EulerAngles) -> SinkResult<()> {
        Ok(())
    }
}
