//! In-memory capture sink, for tests and host-side scene inspection.

use sm_core::{EulerAngles, SourceId, Vec3};
use sm_engine::{FrameSnapshot, OutputSink, SinkResult, SourcePose};
use sm_motion::MotionState;

/// One captured frame.
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    pub frame:   u64,
    pub elapsed: f32,
    pub poses:   Vec<SourcePose>,
}

/// Retains every frame the engine emits.
///
/// Never evicts; intended for finite runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Vec<CapturedFrame>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&CapturedFrame> {
        self.frames.last()
    }

    /// Trajectory of one source across every captured frame.
    pub fn track_of(&self, id: SourceId) -> Vec<MotionState> {
        self.frames
            .iter()
            .filter_map(|f| f.poses.iter().find(|p| p.id == id).map(|p| p.state))
            .collect()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl OutputSink for MemorySink {
    fn send_position(&mut self, _id: SourceId, _position: Vec3) -> SinkResult<()> {
        Ok(())
    }

    fn send_orientation(&mut self, _id: SourceId, _orientation: EulerAngles) -> SinkResult<()> {
        Ok(())
    }

    fn send_frame(&mut self, frame: &FrameSnapshot<'_>) -> SinkResult<()> {
        self.frames.push(CapturedFrame {
            frame:   frame.frame,
            elapsed: frame.elapsed,
            poses:   frame.poses.to_vec(),
        });
        Ok(())
    }
}
